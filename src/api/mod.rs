//! HTTP surface for the snapshot cache
//!
//! ## Endpoints
//!
//! - `GET /sfp` - Poll every switch now, publish and return the readings
//! - `GET /api/v1/snapshot` - Cached readings of the last completed cycle
//! - `GET /api/v1/snapshot/:host` - Cached readings of one switch
//! - `GET /api/v1/health` - Health check with cache status
//!
//! `/sfp` runs a full cycle on the request path and is not coordinated with
//! the scheduler. A concurrent scheduled cycle may overwrite its snapshot.

#[cfg(feature = "api")]
pub mod error;
#[cfg(feature = "api")]
pub mod middleware;
#[cfg(feature = "api")]
pub mod routes;
#[cfg(feature = "api")]
pub mod state;
#[cfg(feature = "api")]
pub mod types;

#[cfg(feature = "api")]
pub use error::{ApiError, ApiResult};
#[cfg(feature = "api")]
pub use state::ApiState;
#[cfg(feature = "api")]
pub use types::HealthResponse;

#[cfg(feature = "api")]
use axum::{Router, routing::get};
use std::net::SocketAddr;
#[cfg(feature = "api")]
use tracing::info;

use crate::config::ApiSettings;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:8080")
    pub bind_addr: SocketAddr,

    /// Optional authentication token
    pub auth_token: Option<String>,

    /// Enable CORS for dashboards
    pub enable_cors: bool,
}

impl ApiConfig {
    /// Settings from the config file, falling back to the environment for the bind address
    pub fn from_settings(settings: Option<&ApiSettings>) -> Self {
        let mut config = Self::default();

        if let Some(settings) = settings {
            if let Some(bind) = settings.bind {
                config.bind_addr = bind;
            }
            config.auth_token = settings.auth_token.clone();
        }

        config
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: crate::util::get_bind_addr(),
            auth_token: None,
            enable_cors: true,
        }
    }
}

#[cfg(feature = "api")]
pub fn router(state: ApiState) -> Router {
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/sfp", get(routes::snapshot::poll_now))
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/snapshot", get(routes::snapshot::get_snapshot))
        .route(
            "/api/v1/snapshot/:host",
            get(routes::snapshot::get_host_snapshot),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
#[cfg(feature = "api")]
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    use tower_http::cors::{Any, CorsLayer};

    info!("starting API server on {}", config.bind_addr);

    let mut app = router(state);

    if let Some(token) = config.auth_token {
        app = app.layer(axum::middleware::from_fn_with_state(
            token,
            middleware::auth::auth_middleware,
        ));
    }

    // outermost, so preflight requests are answered without a token
    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
