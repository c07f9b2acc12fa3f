use indexmap::IndexMap;
use rp_descriptor::PropertySpec;
use rp_mirror::SyncState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

#[derive(Deserialize)]
pub struct CollectionReqPath {
    collection: String,
}

impl CollectionReqPath {
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[derive(Deserialize, Validate)]
pub struct InsertCollectionReqJson {
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    kind: String,
    #[validate(length(min = 1))]
    id: String,
    #[serde(default)]
    properties: IndexMap<String, PropertySpec>,
}

impl InsertCollectionReqJson {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn properties(&self) -> &IndexMap<String, PropertySpec> {
        &self.properties
    }
}

#[derive(Serialize)]
pub struct InsertCollectionResJson {
    status: &'static str,
    #[serde(rename = "collectionId")]
    collection_id: String,
}

impl InsertCollectionResJson {
    pub fn new(collection_id: &str) -> Self {
        Self {
            status: "Ok",
            collection_id: collection_id.to_owned(),
        }
    }
}

#[derive(Deserialize)]
pub struct RenameCollectionsReqJson {
    collections: IndexMap<String, String>,
}

impl RenameCollectionsReqJson {
    pub fn collections(&self) -> &IndexMap<String, String> {
        &self.collections
    }
}

#[derive(Serialize)]
pub struct RenameCollectionsResJson {
    collections: IndexMap<String, RenameCollectionResJson>,
}

impl RenameCollectionsResJson {
    pub fn new(collections: IndexMap<String, RenameCollectionResJson>) -> Self {
        Self { collections }
    }
}

#[derive(Serialize)]
pub struct RenameCollectionResJson {
    #[serde(rename = "localApplied")]
    local_applied: bool,
    #[serde(rename = "remoteApplied")]
    remote_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl RenameCollectionResJson {
    pub fn new(state: &SyncState, response: Option<Value>, error: Option<String>) -> Self {
        Self {
            local_applied: *state.local_applied(),
            remote_applied: *state.remote_applied(),
            response,
            error,
        }
    }
}

pub type AddPropertiesReqJson = IndexMap<String, PropertySpec>;

#[derive(Deserialize)]
pub struct RenamePropertiesReqJson {
    properties: IndexMap<String, String>,
}

impl RenamePropertiesReqJson {
    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }
}
