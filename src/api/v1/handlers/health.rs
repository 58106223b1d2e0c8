/*
 * Responsibility
 * - GET /health (liveness)
 * - exempt from the gate in the default configuration
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
