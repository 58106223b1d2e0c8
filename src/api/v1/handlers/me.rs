use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::CurrentIdentity};

pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<MeResponse> {
    Json(identity.into())
}
