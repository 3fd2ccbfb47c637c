//! API shared state

use crate::poller::Poller;
use crate::store::SnapshotStore;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Runs on-demand cycles for `GET /sfp`
    pub poller: Poller,

    /// Cache read by the snapshot endpoints
    pub store: SnapshotStore,
}

impl ApiState {
    pub fn new(poller: Poller) -> Self {
        let store = poller.store().clone();
        Self { poller, store }
    }
}
