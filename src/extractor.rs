//! Pulls receive-power values out of unstructured CLI output
//!
//! The pattern is "`rx`, later `power`, then a number", case-insensitive and
//! bounded to one line. Matches are collected left to right without overlap,
//! and the n-th match becomes interface #n.
//!
//! The index reflects match order only. If a firmware omits an interface from
//! the dump or lists them out of order, readings are attributed to the wrong
//! physical port. This is not corrected here.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

static RX_POWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rx.*power.*?(-?\d+(?:\.\d+)?)").expect("rx power pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerMatch {
    /// 1-based position in scan order
    pub interface: usize,
    /// dBm
    pub rx_power: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found(Vec<PowerMatch>),
    /// No reading in the output. A warning, not a transport failure.
    NotFound,
}

pub fn extract(buffer: &str) -> Extraction {
    let matches: Vec<PowerMatch> = RX_POWER
        .captures_iter(buffer)
        .filter_map(|captures| {
            let value = captures.get(1)?.as_str();
            value
                .parse::<f64>()
                .inspect_err(|e| warn!("skipping unparsable power value {value:?}: {e}"))
                .ok()
        })
        .enumerate()
        .map(|(index, rx_power)| PowerMatch {
            interface: index + 1,
            rx_power,
        })
        .collect();

    if matches.is_empty() {
        Extraction::NotFound
    } else {
        Extraction::Found(matches)
    }
}
