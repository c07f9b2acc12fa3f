use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web::Query,
    Error,
};
use serde::Deserialize;

/// Lets clients that can only send POST reach the other routes by naming the
/// intended method in the `_method` query parameter, e.g.
/// `POST /resources/companies_1?_method=PUT`.
pub struct MethodOverride;

impl<S, B> Transform<S, ServiceRequest> for MethodOverride
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MethodOverrideMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MethodOverrideMiddleware { service }))
    }
}

pub struct MethodOverrideMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for MethodOverrideMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        if *req.method() == Method::POST {
            if let Some(method) = requested_method(req.query_string()) {
                rp_log::debug(
                    None,
                    format!("MethodOverride: POST {} handled as {method}", req.path()),
                );
                req.head_mut().method = method;
            }
        }
        self.service.call(req)
    }
}

#[derive(Deserialize)]
struct MethodOverrideQuery {
    #[serde(rename = "_method")]
    method: Option<String>,
}

fn requested_method(query: &str) -> Option<Method> {
    let method = Query::<MethodOverrideQuery>::from_query(query)
        .ok()?
        .into_inner()
        .method?;
    Method::from_bytes(method.to_uppercase().as_bytes()).ok()
}
