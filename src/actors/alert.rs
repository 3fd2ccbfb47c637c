//! AlertActor - Delivers alert events to notification channels
//!
//! Evaluators run inside per-host poll tasks and must never wait on a chat
//! API. They push [`AlertEvent`]s into an unbounded channel; this actor drains
//! it and performs the (slow, fallible) deliveries one by one.
//!
//! ```text
//! poll task ─┐
//! poll task ─┼─ AlertEvent ─→ AlertActor ─→ [Telegram, Discord, Webhook]
//! poll task ─┘
//! ```

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, trace, warn};

use crate::alerts::{AlertManager, Notifier};
use crate::config::Alert;

use super::messages::{AlertCommand, AlertEvent, AlertStats};

/// Actor that delivers alert events
pub struct AlertActor {
    manager: AlertManager,

    /// Command receiver
    command_rx: mpsc::Receiver<AlertCommand>,

    /// Alert events from evaluators
    event_rx: mpsc::UnboundedReceiver<AlertEvent>,

    stats: AlertStats,
}

impl AlertActor {
    pub fn new(
        manager: AlertManager,
        command_rx: mpsc::Receiver<AlertCommand>,
        event_rx: mpsc::UnboundedReceiver<AlertEvent>,
    ) -> Self {
        Self {
            manager,
            command_rx,
            event_rx,
            stats: AlertStats::default(),
        }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!(
            "starting alert actor with {} channels",
            self.manager.channel_count()
        );

        loop {
            tokio::select! {
                Some(event) = self.event_rx.recv() => {
                    self.stats.received += 1;
                    trace!("delivering: {event}");
                    let failed = self.manager.deliver(&event).await;
                    self.stats.failed_deliveries += failed as u64;
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AlertCommand::GetStats { respond_to } => {
                            let _ = respond_to.send(self.stats);
                        }

                        AlertCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("alert channels closed, shutting down");
                    break;
                }
            }
        }

        debug!("alert actor stopped");
    }
}

/// Handle for the AlertActor. Doubles as the [`Notifier`] given to evaluators.
#[derive(Clone)]
pub struct AlertHandle {
    sender: mpsc::Sender<AlertCommand>,
    events: mpsc::UnboundedSender<AlertEvent>,
}

impl AlertHandle {
    /// Spawn a new alert actor delivering to `channels`
    pub fn spawn(channels: Vec<Alert>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let actor = AlertActor::new(AlertManager::new(channels), cmd_rx, event_rx);

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            events: event_tx,
        }
    }

    /// Delivery counters. `None` once the actor is gone.
    pub async fn stats(&self) -> Option<AlertStats> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(AlertCommand::GetStats { respond_to: tx })
            .await
            .ok()?;

        rx.await.ok()
    }

    /// Shutdown the alert actor
    pub async fn shutdown(&self) {
        let _ = self.sender.send(AlertCommand::Shutdown).await;
    }
}

impl Notifier for AlertHandle {
    fn notify(&self, event: AlertEvent) {
        self.events.notify(event);
    }
}
