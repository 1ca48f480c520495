//! Server configuration parsed from environment variables.
//!
//! `main` loads `.env` through `dotenvy` before calling [`AppConfig::from_env`].
//! Parsing goes through a lookup function so tests never touch process env.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use wafer_client::net::types::ClientConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_IMAGE_BUCKET: &str = "chip-wafer-new-images";
pub const DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing config: env var {var} not set")]
    Missing { var: &'static str },

    /// An environment variable is set but cannot be parsed.
    #[error("invalid config: {var}={value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// User-pool settings for the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CognitoConfig {
    pub user_pool_id: String,
    pub app_client_id: String,
    /// JSON 1.1 endpoint for the pool's region, unless overridden.
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Region the fab API is deployed in.
    pub region: String,
    /// Fab API base URL without a trailing slash.
    pub api_url: String,
    pub cognito: CognitoConfig,
    /// Values handed to the browser for building image URLs.
    pub client: ClientConfig,
    pub cookie_secure: bool,
    pub timeouts: UpstreamTimeouts,
}

impl AppConfig {
    /// Build typed config from the process environment.
    ///
    /// Required:
    /// - `WAFER_API_URL`
    /// - `COGNITO_USER_POOL_ID` (`<region>_<id>`)
    /// - `COGNITO_APP_CLIENT_ID`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `WAFER_REGION`: default `us-west-2`
    /// - `COGNITO_ENDPOINT`: default derived from the user pool region
    /// - `WAFER_IMAGE_BUCKET`: default `chip-wafer-new-images`
    /// - `WAFER_STORAGE_REGION`: default `WAFER_REGION`
    /// - `COOKIE_SECURE`: default false
    /// - `UPSTREAM_REQUEST_TIMEOUT_SECS`: default 30
    /// - `UPSTREAM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &'static str| lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing { var });

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let region = get("WAFER_REGION").unwrap_or_else(|| DEFAULT_REGION.to_owned());
        let api_url = require("WAFER_API_URL")?.trim_end_matches('/').to_owned();

        let user_pool_id = require("COGNITO_USER_POOL_ID")?;
        let pool_region = pool_region(&user_pool_id)
            .ok_or_else(|| ConfigError::Invalid { var: "COGNITO_USER_POOL_ID", value: user_pool_id.clone() })?;
        let endpoint = get("COGNITO_ENDPOINT").unwrap_or_else(|| cognito_endpoint(pool_region));
        let cognito = CognitoConfig { app_client_id: require("COGNITO_APP_CLIENT_ID")?, endpoint, user_pool_id };

        let client = ClientConfig {
            region: get("WAFER_STORAGE_REGION").unwrap_or_else(|| region.clone()),
            bucket: get("WAFER_IMAGE_BUCKET").unwrap_or_else(|| DEFAULT_IMAGE_BUCKET.to_owned()),
        };

        let cookie_secure = match get("COOKIE_SECURE") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "COOKIE_SECURE", value: raw })?,
        };

        let timeouts = UpstreamTimeouts {
            request_secs: parse_or(
                get("UPSTREAM_REQUEST_TIMEOUT_SECS"),
                "UPSTREAM_REQUEST_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS,
            )?,
            connect_secs: parse_or(
                get("UPSTREAM_CONNECT_TIMEOUT_SECS"),
                "UPSTREAM_CONNECT_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self { port, region, api_url, cognito, client, cookie_secure, timeouts })
    }
}

/// Bool-ish flag parsing: `1/true/yes/on` and `0/false/no/off`, any case.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value }),
    }
}

/// Region prefix of a user pool id such as `us-west-2_AbCdEf`.
fn pool_region(user_pool_id: &str) -> Option<&str> {
    let (region, id) = user_pool_id.split_once('_')?;
    (!region.is_empty() && !id.is_empty()).then_some(region)
}

fn cognito_endpoint(region: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com/")
}
