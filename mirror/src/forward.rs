use rp_backend::{BackendClient, BackendResponse};
use rp_descriptor::CollectionId;
use rp_error::{Error, Result};
use serde_json::Value;

/// Passes document writes straight to the backend.
///
/// The backend's status and body come back unchanged whether or not the
/// status is 2xx; only a backend that cannot be reached is an error.
pub struct DocumentForwarder {
    backend: BackendClient,
}

impl DocumentForwarder {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn create(&self, collection: &str, body: &Value) -> Result<BackendResponse> {
        let collection = CollectionId::parse(collection)?;
        relay(self.backend.create_document(collection.as_str(), body).await)
    }

    pub async fn update(
        &self,
        collection: &str,
        document_id: &str,
        body: &Value,
    ) -> Result<BackendResponse> {
        let collection = CollectionId::parse(collection)?;
        if document_id.is_empty() || !document_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::validation(format!(
                "Document identifier '{document_id}' must be alphanumeric"
            )));
        }
        relay(
            self.backend
                .update_document(collection.as_str(), document_id, body)
                .await,
        )
    }
}

fn relay(result: Result<BackendResponse>) -> Result<BackendResponse> {
    match result {
        Err(Error::BackendError { status, body }) => Ok(BackendResponse::new(&status, body)),
        other => other,
    }
}
