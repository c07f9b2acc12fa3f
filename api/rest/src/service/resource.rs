use actix_web::{http::StatusCode, web, HttpResponse};
use indexmap::IndexMap;
use rp_descriptor::CollectionId;
use validator::Validate;

use crate::{
    context::ApiRestCtx,
    model::{
        resource::{
            AddPropertiesReqJson, CollectionReqPath, InsertCollectionReqJson,
            InsertCollectionResJson, RenameCollectionResJson, RenameCollectionsReqJson,
            RenameCollectionsResJson, RenamePropertiesReqJson,
        },
        status_code_of, Response,
    },
};

pub fn resource_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/resources", web::post().to(insert_one))
        .route("/resources", web::put().to(rename_many))
        .route("/resources/{collection}", web::get().to(find_one))
        .route("/resources/{collection}", web::put().to(add_properties))
        .route("/{collection}/rename", web::put().to(rename_properties));
}

async fn insert_one(
    ctx: web::Data<ApiRestCtx>,
    data: web::Json<InsertCollectionReqJson>,
) -> HttpResponse {
    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }

    match ctx
        .mirror()
        .create_collection(data.id(), data.kind(), data.properties().clone())
        .await
    {
        Ok((collection_id, _)) => Response::data(
            &StatusCode::CREATED,
            InsertCollectionResJson::new(collection_id.as_str()),
        ),
        Err(err) => Response::error(&err),
    }
}

async fn find_one(ctx: web::Data<ApiRestCtx>, path: web::Path<CollectionReqPath>) -> HttpResponse {
    let collection_id = match CollectionId::parse(path.collection()) {
        Ok(collection_id) => collection_id,
        Err(err) => return Response::error(&err),
    };

    match ctx.mirror().describe(&collection_id).await {
        Ok(descriptor) => Response::data(&StatusCode::OK, descriptor.to_value()),
        Err(err) => Response::error(&err),
    }
}

async fn rename_many(
    ctx: web::Data<ApiRestCtx>,
    data: web::Json<RenameCollectionsReqJson>,
) -> HttpResponse {
    if data.collections().is_empty() {
        return Response::error_raw(
            &StatusCode::BAD_REQUEST,
            "At least one collection rename is required",
        );
    }

    let mut status_code = StatusCode::OK;
    let mut collections = IndexMap::with_capacity(data.collections().len());
    for (old_id, outcome) in ctx.mirror().rename_collections(data.collections()).await {
        let (state, result) = outcome.into_parts();
        let res = match result {
            Ok(response) => RenameCollectionResJson::new(&state, Some(response), None),
            Err(err) => {
                if status_code == StatusCode::OK {
                    status_code = status_code_of(&err);
                }
                rp_log::error(None, format!("Renaming collection {old_id} failed: {err}"));
                let response = match &err {
                    rp_error::Error::BackendError { body, .. } => Some(body.clone()),
                    _ => None,
                };
                RenameCollectionResJson::new(&state, response, Some(err.to_string()))
            }
        };
        collections.insert(old_id, res);
    }

    Response::data(&status_code, RenameCollectionsResJson::new(collections))
}

async fn add_properties(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<CollectionReqPath>,
    data: web::Json<AddPropertiesReqJson>,
) -> HttpResponse {
    let collection_id = match CollectionId::parse(path.collection()) {
        Ok(collection_id) => collection_id,
        Err(err) => return Response::error(&err),
    };

    match ctx
        .mirror()
        .add_properties(&collection_id, data.into_inner())
        .await
    {
        Ok(_) => Response::ok(&StatusCode::OK),
        Err(err) => Response::error(&err),
    }
}

async fn rename_properties(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<CollectionReqPath>,
    data: web::Json<RenamePropertiesReqJson>,
) -> HttpResponse {
    let collection_id = match CollectionId::parse(path.collection()) {
        Ok(collection_id) => collection_id,
        Err(err) => return Response::error(&err),
    };

    let (state, result) = ctx
        .mirror()
        .rename_properties(&collection_id, data.properties())
        .await
        .into_parts();
    match result {
        Ok(_) => Response::ok(&StatusCode::OK),
        Err(err) => Response::sync_error(&state, &err),
    }
}
