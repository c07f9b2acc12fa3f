use actix_web::{
    middleware::{ErrorHandlers, Logger},
    web, App, HttpServer,
};
use anyhow::Result;
use configure::configure;
use context::ApiRestCtx;
use error_handler::default_error_handler;
use middleware::method_override::MethodOverride;

mod configure;
pub mod context;
mod error_handler;
mod middleware;
mod model;
mod service;

#[cfg(test)]
mod tests;

pub struct ApiRestServer {
    address: String,
    context: web::Data<ApiRestCtx>,
}

impl ApiRestServer {
    pub fn new(host: &str, port: &u16, ctx: ApiRestCtx) -> Self {
        rp_log::info(Some("⚡"), "ApiRestServer: Initializing component");

        let address = format!("{host}:{port}");
        let context = web::Data::new(ctx);

        Self { address, context }
    }

    pub async fn run(self) -> Result<()> {
        rp_log::info(
            Some("💫"),
            format!("ApiRestServer: Listening on {}", self.address),
        );

        Ok(HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .wrap(ErrorHandlers::new().default_handler(default_error_handler))
                .wrap(MethodOverride)
                .app_data(self.context.clone())
                .configure(configure)
        })
        .bind(self.address)?
        .run()
        .await?)
    }
}
