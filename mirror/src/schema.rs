use indexmap::IndexMap;
use rp_backend::BackendClient;
use rp_descriptor::{CollectionId, Descriptor, DescriptorStore, PropertySpec};
use rp_error::{Error, Result};
use serde_json::Value;

use crate::{
    clock::IdClock,
    lock::CollectionLocks,
    outcome::{SyncState, Synced},
};

/// Keeps local descriptors and the backend schema in step.
///
/// Each operation re-reads the descriptor it works on and holds that
/// collection's lock until its last phase has finished.
pub struct SchemaMirror {
    store: DescriptorStore,
    backend: BackendClient,
    locks: CollectionLocks,
    clock: IdClock,
}

impl SchemaMirror {
    pub fn new(store: DescriptorStore, backend: BackendClient) -> Self {
        Self {
            store,
            backend,
            locks: CollectionLocks::new(),
            clock: IdClock::new(),
        }
    }

    pub fn store(&self) -> &DescriptorStore {
        &self.store
    }

    /// Creates the descriptor of a new collection under a fresh internal
    /// identifier `<name>_<timestamp>`.
    ///
    /// The backend is not called; it learns about the collection on the first
    /// document write.
    pub async fn create_collection(
        &self,
        name: &str,
        kind: &str,
        properties: IndexMap<String, PropertySpec>,
    ) -> Result<(CollectionId, Descriptor)> {
        let collection_id = CollectionId::synthesize(name, self.clock.next())?;
        let _guard = self.locks.lock(&collection_id).await;

        let descriptor = self.store.create(&collection_id, kind, properties).await?;
        rp_log::info(
            None,
            format!("SchemaMirror: Created collection {name} as {collection_id}"),
        );
        Ok((collection_id, descriptor))
    }

    pub async fn describe(&self, collection_id: &CollectionId) -> Result<Descriptor> {
        self.store.read(collection_id).await
    }

    /// Local only: the backend picks up new fields from the documents that
    /// carry them.
    pub async fn add_properties(
        &self,
        collection_id: &CollectionId,
        properties: IndexMap<String, PropertySpec>,
    ) -> Result<Descriptor> {
        if properties.is_empty() {
            return Err(Error::validation("At least one property is required"));
        }

        let _guard = self.locks.lock(collection_id).await;
        self.store.add_properties(collection_id, properties).await
    }

    /// Local first, then remote: the embedded `id` is persisted before the
    /// backend is asked to rename, and is kept even if that call fails.
    ///
    /// On success the backend's reply body is returned as-is.
    pub async fn rename_collection(
        &self,
        collection_id: &CollectionId,
        external_id: &str,
    ) -> Synced<Value> {
        if external_id.is_empty() {
            return Synced::untouched(Err(Error::validation(format!(
                "New name of collection {collection_id} must not be empty"
            ))));
        }

        let _guard = self.locks.lock(collection_id).await;

        let descriptor = match self.store.set_collection_id(collection_id, external_id).await {
            Ok(descriptor) => descriptor,
            Err(err) => return Synced::untouched(Err(err)),
        };

        match self
            .backend
            .rename_collection(collection_id.as_str(), &descriptor.to_value())
            .await
        {
            Ok(response) => {
                rp_log::info(
                    None,
                    format!("SchemaMirror: Renamed collection {collection_id} to {external_id}"),
                );
                Synced::new(SyncState::applied(), Ok(response.into_body()))
            }
            Err(err) => {
                rp_log::drift(format!(
                    "collection {collection_id} is named {external_id} locally but the backend rename failed: {err}"
                ));
                Synced::new(SyncState::new(&true, &false), Err(err))
            }
        }
    }

    /// Renames every `old -> new` pair independently, in order. A failing
    /// pair does not stop the ones after it.
    pub async fn rename_collections(
        &self,
        renames: &IndexMap<String, String>,
    ) -> Vec<(String, Synced<Value>)> {
        let mut outcomes = Vec::with_capacity(renames.len());
        for (old_id, new_id) in renames {
            let outcome = match CollectionId::parse(old_id) {
                Ok(collection_id) => self.rename_collection(&collection_id, new_id).await,
                Err(err) => Synced::untouched(Err(err)),
            };
            outcomes.push((old_id.to_owned(), outcome));
        }
        outcomes
    }

    /// Remote first, then local: stored documents get their fields renamed by
    /// the backend before the descriptor mirrors the same renames.
    ///
    /// The descriptor is checked up front so a rename that cannot be mirrored
    /// locally is never sent to the backend.
    pub async fn rename_properties(
        &self,
        collection_id: &CollectionId,
        renames: &IndexMap<String, String>,
    ) -> Synced<Descriptor> {
        if renames.is_empty() {
            return Synced::untouched(Err(Error::validation(
                "At least one property rename is required",
            )));
        }
        if let Some((old_name, _)) = renames.iter().find(|(_, new_name)| new_name.is_empty()) {
            return Synced::untouched(Err(Error::validation(format!(
                "New name of property {old_name} must not be empty"
            ))));
        }

        let _guard = self.locks.lock(collection_id).await;

        let result = self
            .store
            .read(collection_id)
            .await
            .and_then(|descriptor| descriptor.ensure_properties(collection_id, renames.keys()));
        if let Err(err) = result {
            return Synced::untouched(Err(err));
        }

        if let Err(err) = self
            .backend
            .rename_property(collection_id.as_str(), renames)
            .await
        {
            rp_log::error(
                None,
                format!("SchemaMirror: Backend refused property rename on {collection_id}: {err}"),
            );
            return Synced::untouched(Err(err));
        }

        match self.store.rename_properties(collection_id, renames).await {
            Ok(descriptor) => Synced::new(SyncState::applied(), Ok(descriptor)),
            Err(err) => {
                rp_log::drift(format!(
                    "backend renamed properties of {collection_id} but the descriptor was not updated: {err}"
                ));
                Synced::new(SyncState::new(&false, &true), Err(err))
            }
        }
    }
}
