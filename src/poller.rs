//! One complete poll cycle: aggregate, then publish
//!
//! Both the scheduler and the on-demand HTTP trigger call
//! [`Poller::poll_cycle`]. Nothing serialises them: two overlapping cycles
//! each publish their own snapshot and the last one to finish wins. Their
//! readings are never merged with each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, instrument, warn};

use crate::aggregator::{Aggregator, CycleReport, OutcomeKind};
use crate::config::SwitchConfig;
use crate::store::SnapshotStore;
use crate::Snapshot;

#[derive(Clone)]
pub struct Poller {
    aggregator: Arc<Aggregator>,
    hosts: Arc<[SwitchConfig]>,
    threshold: f64,
    store: SnapshotStore,
    cycles: Arc<AtomicU64>,
}

impl Poller {
    pub fn new(
        aggregator: Aggregator,
        hosts: Vec<SwitchConfig>,
        threshold: f64,
        store: SnapshotStore,
    ) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            hosts: hosts.into(),
            threshold,
            store,
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn hosts(&self) -> &[SwitchConfig] {
        &self.hosts
    }

    /// Poll every switch and publish the merged readings, even when every
    /// switch failed (the snapshot is then empty).
    #[instrument(skip(self))]
    pub async fn poll_cycle(&self) -> CycleReport {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        info!("starting poll cycle {cycle}");

        let report = self.aggregator.run(&self.hosts, self.threshold).await;

        for outcome in &report.outcomes {
            match &outcome.kind {
                OutcomeKind::NotFound => warn!("{}: no Rx Power data", outcome.host),
                OutcomeKind::Failed(e) => warn!("{}: {e}", outcome.host),
            }
        }

        self.store
            .set(Snapshot::new(cycle, report.readings.clone()))
            .await;

        report
    }
}
