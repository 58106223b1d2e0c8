/*
 * Responsibility
 * - Read settings from the environment (.env supported): secret, exemption rules,
 *   revocation store, HTTP limits, CORS
 * - Validate them up front (anything missing or malformed stops startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use url::Url;

use crate::services::auth::exemption::ExemptionMatcher;
use crate::services::auth::verifier::VerifierOptions;

/// Used when `AUTH_EXEMPT_PATHS` is not set.
pub const DEFAULT_EXEMPT_PATHS: &[&str] = &[
    // API docs
    "/swagger-ui/**",
    "/v3/api-docs/**",
    // Auth bootstrap
    "/member/save",
    "/member/reissue-token",
    "/member/logout",
    "/health",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Raw HMAC key bytes (already decoded)
    pub jwt_secret: Vec<u8>,
    pub verifier_options: VerifierOptions,

    pub exemptions: ExemptionMatcher,
    pub echo_token: bool,

    pub revocation_store_url: Url,
    pub revocation_key_prefix: String,
    // Always shorter than `request_timeout`, so a stalled store ends in a 401.
    pub revocation_timeout: Duration,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_source<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = split_list(&var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let jwt_secret = decode_secret(
            &var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            var("JWT_SECRET_ENCODING").as_deref(),
        )?;

        let verifier_options = VerifierOptions {
            issuer: var("AUTH_ISSUER").filter(|s| !s.trim().is_empty()),
            audience: var("AUTH_AUDIENCE").filter(|s| !s.trim().is_empty()),
            leeway_seconds: parse_or(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?,
        };

        let exemptions = match var("AUTH_EXEMPT_PATHS") {
            Some(list) => ExemptionMatcher::parse(split_list(&list)),
            None => ExemptionMatcher::parse(DEFAULT_EXEMPT_PATHS.iter().copied()),
        }
        .map_err(|_| ConfigError::Invalid("AUTH_EXEMPT_PATHS"))?;

        let echo_token = match var("AUTH_ECHO_TOKEN") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTH_ECHO_TOKEN"))?,
            None => true,
        };

        let revocation_store_url = var("REVOCATION_STORE_URL")
            .ok_or(ConfigError::Missing("REVOCATION_STORE_URL"))?;
        let revocation_store_url = Url::parse(&revocation_store_url)
            .ok()
            .filter(|u| matches!(u.scheme(), "redis" | "rediss" | "redis+unix" | "unix"))
            .ok_or(ConfigError::Invalid("REVOCATION_STORE_URL"))?;

        let revocation_key_prefix = var("REVOCATION_KEY_PREFIX").unwrap_or_default();

        let request_timeout =
            Duration::from_secs(parse_or(&var, "REQUEST_TIMEOUT_SECONDS", 30)?);

        let revocation_timeout =
            Duration::from_millis(parse_or(&var, "REVOCATION_TIMEOUT_MS", 2000)?);
        if revocation_timeout.is_zero() || revocation_timeout >= request_timeout {
            return Err(ConfigError::Invalid("REVOCATION_TIMEOUT_MS"));
        }

        let request_body_limit_bytes = parse_or(&var, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            verifier_options,
            exemptions,
            echo_token,
            revocation_store_url,
            revocation_key_prefix,
            revocation_timeout,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// String secrets are base64 unless told otherwise.
fn decode_secret(secret: &str, encoding: Option<&str>) -> Result<Vec<u8>, ConfigError> {
    let secret = secret.trim();
    if secret.is_empty() {
        return Err(ConfigError::Invalid("JWT_SECRET"));
    }

    match encoding.map(str::to_ascii_lowercase).as_deref() {
        None | Some("base64") => STANDARD
            .decode(secret)
            .map_err(|_| ConfigError::Invalid("JWT_SECRET")),
        Some("raw") => Ok(secret.as_bytes().to_vec()),
        Some(_) => Err(ConfigError::Invalid("JWT_SECRET_ENCODING")),
    }
}
