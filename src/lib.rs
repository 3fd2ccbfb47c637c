pub mod actors;
pub mod aggregator;
pub mod alerts;
pub mod api;
pub mod collector;
pub mod config;
pub mod discord;
pub mod error;
pub mod evaluator;
pub mod extractor;
pub mod poller;
pub mod sequencer;
pub mod session;
pub mod store;
pub mod telegram;
pub mod util;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Classification of a single receive-power reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReadingStatus {
    Ok,
    Low,
}

/// One extracted and classified receive-power measurement
///
/// `interface` is the 1-based position of the match in the raw diagnostic
/// dump, not an interface identifier reported by the switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(with = "local_timestamp")]
    pub timestamp: DateTime<Local>,
    pub host: String,
    pub interface: usize,
    pub rx_power: f64,
    pub status: ReadingStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

/// The latest completed poll cycle across all switches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Sequence number of the cycle that produced this snapshot (0 = nothing polled yet)
    pub cycle: u64,
    pub completed_at: Option<DateTime<Local>>,
    pub readings: Vec<Reading>,
}

impl Snapshot {
    pub fn new(cycle: u64, readings: Vec<Reading>) -> Self {
        Self {
            cycle,
            completed_at: Some(Local::now()),
            readings,
        }
    }
}

/// `YYYY/MM/DD HH:MM:SS` in local time
pub mod local_timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%Y/%m/%d %H:%M:%S";

    pub fn serialize<S>(timestamp: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&timestamp.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| D::Error::custom(format!("ambiguous local time: {raw}")))
    }
}
