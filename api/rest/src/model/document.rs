use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
pub struct InsertDocumentReqPath {
    collection: String,
}

impl InsertDocumentReqPath {
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[derive(Deserialize)]
pub struct UpdateDocumentReqPath {
    collection: String,
    document_id: String,
}

impl UpdateDocumentReqPath {
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

pub type DocumentReqJson = Map<String, Value>;
