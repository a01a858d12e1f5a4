//! Health check HTTP route handlers
//!
//! Provides endpoints for checking the health of the API and its dependencies:
//! - `GET /health` - Simple liveness check (returns 200 OK)
//! - `GET /health/ready` - Readiness check (verifies the database answers)
//! - `GET /health/live` - Kubernetes-style liveness probe

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use sqlx::SqlitePool;

use crate::db;
use crate::error::ApiError;

/// Shared application state for health check handlers
#[derive(Clone)]
pub struct HealthState {
    pool: SqlitePool,
}

impl HealthState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Create health check router
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(simple_health))
        .route("/live", get(liveness_probe))
        .route("/ready", get(readiness_probe))
        .with_state(state)
}

/// Simple health check - always returns OK if the server is running
async fn simple_health() -> &'static str {
    "OK"
}

/// Liveness probe
///
/// Does not touch the database; that is what readiness is for.
async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe
///
/// # Response
/// - 200 OK if the database answers
/// - 503 Service Unavailable with a `DATABASE_UNAVAILABLE` body otherwise
async fn readiness_probe(State(state): State<HealthState>) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = db::ping(&state.pool).await {
        tracing::warn!(error = %e, "Readiness check failed");
        return Err(ApiError::DatabaseUnavailable);
    }

    Ok(Json(serde_json::json!({
        "status": "ready",
        "database": "ok",
    })))
}
