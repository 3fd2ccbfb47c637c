//! Threshold classification of extracted readings

use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::actors::messages::AlertEvent;
use crate::alerts::Notifier;
use crate::config::SwitchConfig;
use crate::extractor::PowerMatch;
use crate::{Reading, ReadingStatus};

/// `Low` iff `rx_power < threshold`
pub fn classify(rx_power: f64, threshold: f64) -> ReadingStatus {
    if rx_power < threshold {
        ReadingStatus::Low
    } else {
        ReadingStatus::Ok
    }
}

/// Turns matches into readings and raises one alert per LOW reading.
///
/// Alerts are not deduplicated: a port that stays low alerts every cycle.
#[derive(Clone)]
pub struct Evaluator {
    threshold: f64,
    notifier: Arc<dyn Notifier>,
}

impl Evaluator {
    pub fn new(threshold: f64, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            threshold,
            notifier,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluate(&self, switch: &SwitchConfig, matches: &[PowerMatch]) -> Vec<Reading> {
        matches
            .iter()
            .map(|m| {
                let status = classify(m.rx_power, self.threshold);
                let reading = Reading {
                    timestamp: Local::now(),
                    host: switch.host.clone(),
                    interface: m.interface,
                    rx_power: m.rx_power,
                    status,
                    comment: switch.comment.clone(),
                };

                if status == ReadingStatus::Low {
                    let event = AlertEvent::LowPower {
                        host: reading.host.clone(),
                        interface: reading.interface,
                        rx_power: reading.rx_power,
                    };
                    warn!("{event}");
                    self.notifier.notify(event);
                } else {
                    info!(
                        "switch {} (interface #{}) Rx Power: {:.2} dBm",
                        reading.host, reading.interface, reading.rx_power
                    );
                }

                reading
            })
            .collect()
    }

    /// The switch answered but its output held no readings
    pub fn report_missing(&self, switch: &SwitchConfig) {
        let event = AlertEvent::NoData {
            host: switch.host.clone(),
        };
        warn!("{event}");
        self.notifier.notify(event);
    }
}
