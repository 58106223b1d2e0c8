//! Authentication gate as an axum middleware.
//!
//! Runs once per request, before any handler (and before the 404 fallback):
//! - exempt requests are forwarded untouched
//! - otherwise the bearer token is checked against the deny-list, then verified
//! - on success an `Identity` is put into the request extensions, the request is
//!   forwarded, and the token is echoed on the response `Authorization` header
//! - any failure ends the request with a uniform 401

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{
    Identity, Verdict,
    bearer::{self, BEARER_PREFIX},
    gate::fingerprint,
};
use crate::state::AppState;

/// Put the gate in front of every route of `router`.
///
/// ```ignore
/// let app = middleware::auth::gate::apply(routes, state.clone()).with_state(state);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    // An identity can only come from this gate, never from upstream.
    parts.extensions.remove::<Identity>();

    let verdict = state
        .gate
        .check(&parts.method, parts.uri.path(), &parts.headers)
        .await;

    match verdict {
        Ok(Verdict::Exempt) => {
            tracing::debug!(
                method = %parts.method,
                path = %parts.uri.path(),
                "authentication not required"
            );
            Ok(next.run(Request::from_parts(parts, body)).await)
        }
        Ok(Verdict::Authenticated {
            identity,
            claims,
            token,
        }) => {
            tracing::debug!(
                subject = %identity.subject,
                issuer = ?claims.iss,
                jti = ?claims.jti,
                issued_at = ?claims.issued_at(),
                expires_at = ?claims.expires_at(),
                "request authenticated"
            );

            // middleware -> extractor hand-off
            parts.extensions.insert(identity);

            let mut response = next.run(Request::from_parts(parts, body)).await;

            if state.gate.echo_token()
                && let Ok(value) = HeaderValue::from_str(&format!("{BEARER_PREFIX}{token}"))
            {
                response.headers_mut().insert(header::AUTHORIZATION, value);
            }

            Ok(response)
        }
        Err(err) => {
            let token = bearer::extract(&parts.headers).map(fingerprint);
            tracing::warn!(
                kind = err.kind(),
                reason = err.reason(),
                error = %err,
                method = %parts.method,
                path = %parts.uri.path(),
                token = token.as_deref().unwrap_or("-"),
                "request rejected"
            );
            Err(err.into())
        }
    }
}
