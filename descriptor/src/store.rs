use std::{
    io::ErrorKind,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use indexmap::IndexMap;
use rp_error::{Error, Result};
use tokio::fs;

use crate::{collection_id::CollectionId, descriptor::Descriptor, property::PropertySpec};

pub const DESCRIPTOR_FILE: &str = "config.json";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// File-backed home of every collection descriptor.
///
/// Layout: `<root>/<collection id>/config.json`. Each call re-reads the file;
/// nothing is cached between calls.
pub struct DescriptorStore {
    root: PathBuf,
}

impl DescriptorStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn collection_dir(&self, collection_id: &CollectionId) -> PathBuf {
        self.root.join(collection_id.as_str())
    }

    fn descriptor_path(&self, collection_id: &CollectionId) -> PathBuf {
        self.collection_dir(collection_id).join(DESCRIPTOR_FILE)
    }

    /// Allocates the collection folder and writes its first descriptor.
    ///
    /// Properties are numbered from 0 in the order of `properties`. The folder
    /// is removed again if the descriptor cannot be written.
    pub async fn create(
        &self,
        collection_id: &CollectionId,
        kind: &str,
        properties: IndexMap<String, PropertySpec>,
    ) -> Result<Descriptor> {
        let descriptor = Descriptor::new(kind, properties)?;

        let dir = self.collection_dir(collection_id);
        if let Err(err) = fs::create_dir(&dir).await {
            return Err(match err.kind() {
                ErrorKind::AlreadyExists => Error::AlreadyExists(collection_id.to_string()),
                _ => err.into(),
            });
        }

        if let Err(err) = self.write(collection_id, &descriptor).await {
            if let Err(cleanup_err) = fs::remove_dir_all(&dir).await {
                rp_log::warn(
                    None,
                    format!("DescriptorStore: Leaving behind folder {dir:?}: {cleanup_err}"),
                );
            }
            return Err(err);
        }

        rp_log::debug(
            None,
            format!("DescriptorStore: Created collection {collection_id}"),
        );
        Ok(descriptor)
    }

    pub async fn read(&self, collection_id: &CollectionId) -> Result<Descriptor> {
        match fs::read(self.descriptor_path(collection_id)).await {
            Ok(bytes) => Descriptor::from_slice(collection_id, &bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(collection_id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the stored descriptor. The new content is written to a
    /// temporary sibling first and renamed over the old file.
    pub async fn write(&self, collection_id: &CollectionId, descriptor: &Descriptor) -> Result<()> {
        let dir = self.collection_dir(collection_id);
        if !fs::try_exists(&dir).await? {
            return Err(Error::NotFound(collection_id.to_string()));
        }

        let bytes = descriptor.to_pretty_json()?;
        let temp_path = dir.join(format!(
            "{DESCRIPTOR_FILE}.{}.tmp",
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&temp_path, &bytes).await?;
        if let Err(err) = fs::rename(&temp_path, self.descriptor_path(collection_id)).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }
        Ok(())
    }

    pub async fn add_property(
        &self,
        collection_id: &CollectionId,
        name: &str,
        spec: PropertySpec,
    ) -> Result<Descriptor> {
        self.add_properties(collection_id, IndexMap::from([(name.to_owned(), spec)]))
            .await
    }

    /// Appends every entry of `properties` with consecutive orders after the
    /// current maximum, then persists once.
    pub async fn add_properties(
        &self,
        collection_id: &CollectionId,
        properties: IndexMap<String, PropertySpec>,
    ) -> Result<Descriptor> {
        let mut descriptor = self.read(collection_id).await?;
        for (name, spec) in properties {
            let order = descriptor.add_property(collection_id, &name, spec)?;
            rp_log::debug(
                None,
                format!("DescriptorStore: Property {name} of {collection_id} gets order {order}"),
            );
        }
        self.write(collection_id, &descriptor).await?;
        Ok(descriptor)
    }

    /// Applies every `old -> new` rename, then persists once. Nothing is
    /// written if any old name is missing.
    pub async fn rename_properties(
        &self,
        collection_id: &CollectionId,
        renames: &IndexMap<String, String>,
    ) -> Result<Descriptor> {
        let mut descriptor = self.read(collection_id).await?;
        descriptor.rename_properties(collection_id, renames)?;
        self.write(collection_id, &descriptor).await?;
        Ok(descriptor)
    }

    /// Records the external name of the collection inside its descriptor.
    /// The folder keeps its internal identifier.
    pub async fn set_collection_id(
        &self,
        collection_id: &CollectionId,
        external_id: &str,
    ) -> Result<Descriptor> {
        let mut descriptor = self.read(collection_id).await?;
        descriptor.set_id(external_id);
        self.write(collection_id, &descriptor).await?;
        Ok(descriptor)
    }
}
