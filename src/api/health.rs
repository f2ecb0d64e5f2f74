use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::json;

use crate::app_state::AppState;

/// Defines health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
}

/// **Liveness Check (Basic Check)**
/// - Verifies that the API is running
/// - Does NOT check the database
async fn liveness_check() -> Json<serde_json::Value> {
    Json(json!({ "success": true, "message": "API is live" }))
}

/// **Readiness Check (Database Connectivity Check)**
/// - Ensures the database answers, when one is configured
/// - Returns `503` if the database is down
async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let Some(pool) = &state.pool else {
        return Ok(Json(json!({ "success": true, "message": "API is ready", "store": "memory" })));
    };

    sqlx::query("SELECT 1")
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Readiness check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "error": "Database unavailable", "details": e.to_string() })),
            )
        })?;

    Ok(Json(json!({ "success": true, "message": "API is ready", "store": "postgres" })))
}
