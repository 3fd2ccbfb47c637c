//! Message types for actor communication
//!
//! 1. **Commands**: request/response messages sent to one actor via mpsc
//! 2. **Events**: alert notifications fanned into the alert actor

use std::fmt;

use tokio::sync::oneshot;

/// Raised by the evaluator, delivered by the alert actor
#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
    /// One interface read below the threshold
    LowPower {
        host: String,
        interface: usize,
        rx_power: f64,
    },

    /// The switch answered but no reading could be extracted
    NoData { host: String },
}

impl AlertEvent {
    pub fn host(&self) -> &str {
        match self {
            AlertEvent::LowPower { host, .. } | AlertEvent::NoData { host } => host,
        }
    }
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertEvent::LowPower {
                host,
                interface,
                rx_power,
            } => write!(
                f,
                "[WARNING] On switch {host} (interface #{interface}) Rx Power below threshold: {rx_power:.2} dBm"
            ),
            AlertEvent::NoData { host } => write!(f, "No Rx Power data found on switch {host}"),
        }
    }
}

/// Commands that can be sent to the SchedulerActor
#[derive(Debug)]
pub enum SchedulerCommand {
    /// Gracefully shut down the scheduler
    ///
    /// A cycle already running finishes first.
    Shutdown,
}

/// Commands that can be sent to the AlertActor
#[derive(Debug)]
pub enum AlertCommand {
    /// Delivery counters
    GetStats {
        respond_to: oneshot::Sender<AlertStats>,
    },

    /// Gracefully shut down the alert actor
    Shutdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertStats {
    /// Events received from evaluators
    pub received: u64,

    /// Channel deliveries that failed
    pub failed_deliveries: u64,
}
