use std::sync::Arc;

use ahash::HashMap;
use rp_descriptor::CollectionId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per collection, so that read-modify-write sequences on the
/// same descriptor never interleave.
#[derive(Default)]
pub struct CollectionLocks {
    locks: Mutex<HashMap<CollectionId, Arc<Mutex<()>>>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, collection_id: &CollectionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries only referenced by the map are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(collection_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
