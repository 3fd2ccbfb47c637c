//! Latest-snapshot cache
//!
//! The snapshot is swapped as a whole behind a read/write lock. Readers clone
//! the `Arc` and release the lock immediately, so a writer only ever waits for
//! pointer copies, and no reader can see a half-replaced collection.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::trace;

use crate::Snapshot;

#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Replace the whole snapshot. Visible to every `get` issued after this returns.
    pub async fn set(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        trace!(
            "publishing cycle {} with {} readings",
            snapshot.cycle,
            snapshot.readings.len()
        );
        *self.current.write().await = snapshot;
    }
}
