/*
 * Responsibility
 * - Response DTO for GET /api/v1/me
 */
use serde::Serialize;

use crate::api::v1::extractors::Identity;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub authorities: Vec<String>,
}

impl From<Identity> for MeResponse {
    fn from(identity: Identity) -> Self {
        Self {
            subject: identity.subject,
            authorities: identity.authorities,
        }
    }
}
