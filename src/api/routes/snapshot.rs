//! Snapshot endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{debug, instrument};

use crate::Reading;
use crate::api::{
    error::{ApiError, ApiResult},
    state::ApiState,
};

/// GET /sfp
///
/// Runs a poll cycle on the request path, publishes it and returns its readings
#[instrument(skip(state))]
pub async fn poll_now(State(state): State<ApiState>) -> Json<Vec<Reading>> {
    debug!("on-demand poll requested");
    let report = state.poller.poll_cycle().await;
    Json(report.readings)
}

/// GET /api/v1/snapshot
pub async fn get_snapshot(State(state): State<ApiState>) -> Json<Vec<Reading>> {
    let snapshot = state.store.get().await;
    Json(snapshot.readings.clone())
}

/// GET /api/v1/snapshot/:host
///
/// 404 when the host is not a configured switch. A configured switch without
/// readings in the cache yields an empty array.
pub async fn get_host_snapshot(
    State(state): State<ApiState>,
    Path(host): Path<String>,
) -> ApiResult<Json<Vec<Reading>>> {
    if !state.poller.hosts().iter().any(|switch| switch.host == host) {
        return Err(ApiError::NotFound(format!("unknown switch: {host}")));
    }

    let snapshot = state.store.get().await;
    let readings = snapshot
        .readings
        .iter()
        .filter(|reading| reading.host == host)
        .cloned()
        .collect();

    Ok(Json(readings))
}
