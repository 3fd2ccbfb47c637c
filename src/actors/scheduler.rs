//! SchedulerActor - Runs poll cycles on a fixed period
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → Poller::poll_cycle → SnapshotStore::set
//!     ↑
//!     └─── Commands (Shutdown)
//! ```
//!
//! On-demand cycles (`GET /sfp`) call the poller directly and never pass
//! through this actor.
//!
//! The first tick fires immediately, so the fleet is polled once at startup.
//! Every cycle runs in its own task: if it panics the error is logged and the
//! next tick fires as usual.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, instrument, warn};

use crate::aggregator::CycleReport;
use crate::poller::Poller;

use super::messages::SchedulerCommand;

/// Actor that triggers poll cycles
pub struct SchedulerActor {
    poller: Poller,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<SchedulerCommand>,

    /// Period between cycles
    interval_duration: Duration,
}

impl SchedulerActor {
    pub fn new(
        poller: Poller,
        command_rx: mpsc::Receiver<SchedulerCommand>,
        interval_duration: Duration,
    ) -> Self {
        Self {
            poller,
            command_rx,
            interval_duration,
        }
    }

    /// Run the actor's main loop
    ///
    /// This is the entry point for the actor. It runs until:
    /// - A Shutdown command is received
    /// - The command channel is closed
    #[instrument(skip(self), fields(period = ?self.interval_duration))]
    pub async fn run(mut self) {
        debug!("starting scheduler actor");

        let mut ticker = interval(self.interval_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        error!("poll cycle failed: {:#}", e);
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        SchedulerCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("scheduler actor stopped");
    }

    async fn run_cycle(&self) -> Result<CycleReport> {
        let poller = self.poller.clone();
        tokio::spawn(async move { poller.poll_cycle().await })
            .await
            .context("poll cycle aborted")
    }
}

/// Handle for controlling a SchedulerActor
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    /// Spawn the scheduler. The first cycle starts right away.
    pub fn spawn(poller: Poller, period: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = SchedulerActor::new(poller, cmd_rx, period);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Gracefully shut down the scheduler
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(SchedulerCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }
}
