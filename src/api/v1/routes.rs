/*
 * Responsibility
 * - URL layout of v1
 * - Authentication is not decided here: the gate wraps the whole app in app.rs
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::me::me;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
