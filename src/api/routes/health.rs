//! Health check endpoint

use axum::{Json, extract::State};

use crate::api::{state::ApiState, types::HealthResponse};
use crate::{ReadingStatus, local_timestamp};

/// GET /api/v1/health
///
/// Reports liveness plus the state of the snapshot cache
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    let snapshot = state.store.get().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        cycle: snapshot.cycle,
        readings: snapshot.readings.len(),
        low: snapshot
            .readings
            .iter()
            .filter(|r| r.status == ReadingStatus::Low)
            .count(),
        last_poll: snapshot
            .completed_at
            .map(|at| at.format(local_timestamp::FORMAT).to_string()),
    })
}
