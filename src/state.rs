/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone-cheap: everything inside is behind an Arc and read-only after startup
 */
use std::sync::Arc;

use crate::services::auth::AuthGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(gate: Arc<AuthGate>) -> Self {
        Self { gate }
    }
}
