use crate::api::AppState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: pings the message store and reports `ok` or `error`.
///
/// Failure detail is logged but never surfaced to the caller.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.health_service.check_store().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok".to_string() })),
        Err(e) => {
            tracing::warn!(error = %e, component = "store", "Health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(HealthResponse { status: "error".to_string() }))
        }
    }
}
