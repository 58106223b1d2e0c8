/// Factory: build the `AuthGate` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    AuthGate,
    revocation::{RevocationError, ValkeyRevocationStore},
    verifier::JwtVerifier,
};

pub async fn build_auth_gate(config: &Config) -> Result<Arc<AuthGate>, RevocationError> {
    let verifier = JwtVerifier::new(&config.jwt_secret, &config.verifier_options);

    let revocation = ValkeyRevocationStore::connect(
        config.revocation_store_url.as_str(),
        config.revocation_key_prefix.clone(),
        config.revocation_timeout,
    )
    .await?;

    tracing::info!(
        exempt_rules = config.exemptions.len(),
        echo_token = config.echo_token,
        "authentication gate ready"
    );

    Ok(Arc::new(AuthGate::new(
        config.exemptions.clone(),
        Arc::new(verifier),
        Arc::new(revocation),
        config.echo_token,
    )))
}
