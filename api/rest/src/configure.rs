use actix_web::{error::InternalError, web};
use rp_error::Error;

use crate::{
    model::Response,
    service::{document::document_api, resource::resource_api, root::root_api},
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let res = Response::error(&Error::validation(format!("Invalid request body: {err}")));
        InternalError::from_response(err, res).into()
    }))
    // Schema routes go first: `/{collection}/rename` would otherwise be taken
    // for a document id.
    .configure(root_api)
    .configure(resource_api)
    .configure(document_api);
}
