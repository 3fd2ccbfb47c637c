//! Fork-join fan-out of one poll task per switch
//!
//! Each switch is polled by its own tokio task running
//! connect → command script → drain → extract → evaluate. Tasks never touch
//! shared state: each returns a [`HostReport`], and only [`Aggregator::run`]
//! merges them after every task has finished.
//!
//! A failing switch (connection, command, read, no data, even a panic) is
//! recorded as a [`HostOutcome`] and has no effect on its siblings.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, error, info, instrument, warn};

use crate::alerts::Notifier;
use crate::collector;
use crate::config::SwitchConfig;
use crate::error::PollError;
use crate::evaluator::Evaluator;
use crate::extractor::{self, Extraction};
use crate::sequencer::CommandScript;
use crate::session::Connector;
use crate::Reading;

/// Why a switch contributed fewer readings than expected
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeKind {
    /// Output arrived but held no readings (warning)
    NotFound,
    Failed(PollError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostOutcome {
    pub host: String,
    pub kind: OutcomeKind,
}

/// Result of a single poll task
#[derive(Debug, Clone, PartialEq)]
pub struct HostReport {
    pub host: String,
    /// Ordered by interface index
    pub readings: Vec<Reading>,
    pub outcome: Option<OutcomeKind>,
}

impl HostReport {
    fn failed(host: &SwitchConfig, error: PollError) -> Self {
        Self {
            host: host.host.clone(),
            readings: Vec::new(),
            outcome: Some(OutcomeKind::Failed(error)),
        }
    }
}

/// Merged result of one poll cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Readings of every switch; per-switch order is preserved
    pub readings: Vec<Reading>,

    /// One entry per switch that failed or warned
    pub outcomes: Vec<HostOutcome>,
}

#[derive(Clone)]
pub struct Aggregator {
    connector: Arc<dyn Connector>,
    script: CommandScript,
    read_deadline: Duration,
    notifier: Arc<dyn Notifier>,
}

impl Aggregator {
    pub fn new(
        connector: Arc<dyn Connector>,
        script: CommandScript,
        read_deadline: Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            connector,
            script,
            read_deadline,
            notifier,
        }
    }

    /// Poll every switch concurrently and wait for all of them
    #[instrument(skip_all, fields(switches = hosts.len()))]
    pub async fn run(&self, hosts: &[SwitchConfig], threshold: f64) -> CycleReport {
        let evaluator = Evaluator::new(threshold, self.notifier.clone());

        let tasks = hosts.iter().cloned().map(|host| {
            let name = host.host.clone();
            let task = PollTask {
                connector: self.connector.clone(),
                script: self.script.clone(),
                read_deadline: self.read_deadline,
                evaluator: evaluator.clone(),
            };
            (name, tokio::spawn(task.poll(host)))
        });

        let (names, handles): (Vec<_>, Vec<_>) = tasks.unzip();
        let joined = join_all(handles).await;

        let mut report = CycleReport::default();

        for (host, result) in names.into_iter().zip(joined) {
            let host_report = match result {
                Ok(host_report) => host_report,
                Err(e) => {
                    error!("poll task for {host} aborted: {e}");
                    HostReport {
                        host,
                        readings: Vec::new(),
                        outcome: Some(OutcomeKind::Failed(PollError::Task(e.to_string()))),
                    }
                }
            };

            report.readings.extend(host_report.readings);
            if let Some(kind) = host_report.outcome {
                report.outcomes.push(HostOutcome {
                    host: host_report.host,
                    kind,
                });
            }
        }

        info!(
            "poll cycle finished: {} readings, {} switches with issues",
            report.readings.len(),
            report.outcomes.len()
        );

        report
    }
}

/// Everything one poll task owns
struct PollTask {
    connector: Arc<dyn Connector>,
    script: CommandScript,
    read_deadline: Duration,
    evaluator: Evaluator,
}

impl PollTask {
    #[instrument(skip_all, fields(switch = %host.address()))]
    async fn poll(self, host: SwitchConfig) -> HostReport {
        let mut session = match self.connector.establish(&host).await {
            Ok(session) => session,
            Err(e) => {
                error!("cannot connect: {e}");
                return HostReport::failed(&host, e);
            }
        };

        let collected = match self.script.run(session.as_mut()).await {
            Ok(()) => Ok(collector::drain(session.as_mut(), self.read_deadline).await),
            Err(e) => Err(e),
        };

        session.close().await;

        let collected = match collected {
            Ok(collected) => collected,
            Err(e) => {
                error!("cannot send commands: {e}");
                return HostReport::failed(&host, e);
            }
        };

        debug!("collected {} bytes", collected.buffer.len());

        let readings = match extractor::extract(&collected.buffer) {
            Extraction::Found(matches) => self.evaluator.evaluate(&host, &matches),
            Extraction::NotFound => Vec::new(),
        };

        let outcome = match collected.error {
            Some(e) => {
                warn!("kept {} readings from partial output: {e}", readings.len());
                Some(OutcomeKind::Failed(e))
            }
            None if readings.is_empty() => {
                self.evaluator.report_missing(&host);
                Some(OutcomeKind::NotFound)
            }
            None => None,
        };

        HostReport {
            host: host.host,
            readings,
            outcome,
        }
    }
}
