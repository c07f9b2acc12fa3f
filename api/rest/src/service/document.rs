use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::{
    context::ApiRestCtx,
    model::{
        document::{DocumentReqJson, InsertDocumentReqPath, UpdateDocumentReqPath},
        Response,
    },
};

pub fn document_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/{collection}", web::post().to(insert_one)).route(
        "/{collection}/{document_id:[a-zA-Z0-9]+}",
        web::put().to(update_one),
    );
}

async fn insert_one(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<InsertDocumentReqPath>,
    data: web::Json<DocumentReqJson>,
) -> HttpResponse {
    let body = Value::Object(data.into_inner());
    match ctx.forwarder().create(path.collection(), &body).await {
        Ok(response) => Response::relay(response.status(), response.body()),
        Err(err) => Response::error(&err),
    }
}

async fn update_one(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<UpdateDocumentReqPath>,
    data: web::Json<DocumentReqJson>,
) -> HttpResponse {
    let body = Value::Object(data.into_inner());
    match ctx
        .forwarder()
        .update(path.collection(), path.document_id(), &body)
        .await
    {
        Ok(response) => Response::relay(response.status(), response.body()),
        Err(err) => Response::error(&err),
    }
}
