//! API response types

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,

    /// Cycle number of the cached snapshot (0 before the first cycle completes)
    pub cycle: u64,

    /// Number of cached readings
    pub readings: usize,

    /// Number of cached readings below the threshold
    pub low: usize,

    /// Completion time of the cached cycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_poll: Option<String>,
}
