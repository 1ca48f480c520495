//! Cognito user-pool client over the JSON 1.1 protocol.
//!
//! Thin HTTP wrapper for `InitiateAuth` and `GlobalSignOut`. Pure parsing in
//! `parse_auth_result` and `parse_error` for testability.

#[cfg(test)]
#[path = "cognito_test.rs"]
mod cognito_test;

use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::types::{AuthTokens, IdentityError, IdentityProvider};
use crate::config::{CognitoConfig, UpstreamTimeouts};

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";

// =============================================================================
// CLIENT
// =============================================================================

pub struct CognitoClient {
    http: reqwest::Client,
    endpoint: String,
    app_client_id: String,
}

impl CognitoClient {
    /// Build a client for the configured user pool.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &CognitoConfig, timeouts: UpstreamTimeouts) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(timeouts.request_secs))
            .connect_timeout(StdDuration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| IdentityError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: config.endpoint.clone(), app_client_id: config.app_client_id.clone() })
    }

    async fn call<B: Serialize + Sync>(&self, action: &str, body: &B) -> Result<String, IdentityError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{action}"))
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(parse_error(status, &text));
        }
        Ok(text)
    }

    async fn initiate_auth(&self, request: InitiateAuthRequest<'_>) -> Result<ApiAuthResult, IdentityError> {
        let text = self.call("InitiateAuth", &request).await?;
        parse_auth_result(&text)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for CognitoClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError> {
        let request = InitiateAuthRequest {
            auth_flow: "USER_PASSWORD_AUTH",
            client_id: &self.app_client_id,
            auth_parameters: AuthParameters { username: Some(email), password: Some(password), refresh_token: None },
        };
        let result = self.initiate_auth(request).await?;
        into_tokens(result, None, OffsetDateTime::now_utc())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, IdentityError> {
        let request = InitiateAuthRequest {
            auth_flow: "REFRESH_TOKEN_AUTH",
            client_id: &self.app_client_id,
            auth_parameters: AuthParameters { username: None, password: None, refresh_token: Some(refresh_token) },
        };
        let result = self.initiate_auth(request).await?;
        into_tokens(result, Some(refresh_token), OffsetDateTime::now_utc())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.call("GlobalSignOut", &GlobalSignOutRequest { access_token }).await?;
        Ok(())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'static str,
    client_id: &'a str,
    auth_parameters: AuthParameters<'a>,
}

#[derive(Serialize)]
struct AuthParameters<'a> {
    #[serde(rename = "USERNAME", skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(rename = "PASSWORD", skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(rename = "REFRESH_TOKEN", skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GlobalSignOutRequest<'a> {
    access_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<ApiAuthResult>,
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiAuthResult {
    id_token: String,
    access_token: String,
    /// Absent on refresh.
    refresh_token: Option<String>,
    expires_in: i64,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(rename = "__type")]
    kind: String,
    #[serde(alias = "Message", default)]
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_auth_result(json: &str) -> Result<ApiAuthResult, IdentityError> {
    let response: InitiateAuthResponse = serde_json::from_str(json).map_err(|e| IdentityError::Parse(e.to_string()))?;
    match (response.authentication_result, response.challenge_name) {
        (Some(result), _) => Ok(result),
        (None, Some(challenge)) => Err(IdentityError::Challenge(challenge)),
        (None, None) => Err(IdentityError::Parse("response has neither tokens nor a challenge".to_owned())),
    }
}

fn into_tokens(
    result: ApiAuthResult,
    previous_refresh: Option<&str>,
    now: OffsetDateTime,
) -> Result<AuthTokens, IdentityError> {
    let refresh_token = result
        .refresh_token
        .or_else(|| previous_refresh.map(str::to_owned))
        .ok_or_else(|| IdentityError::Parse("missing refresh token".to_owned()))?;
    Ok(AuthTokens {
        id_token: result.id_token,
        access_token: result.access_token,
        refresh_token,
        expires_at: now + Duration::seconds(result.expires_in),
    })
}

/// Error types that mean the credentials or tokens themselves were refused.
const REJECTION_KINDS: &[&str] = &[
    "NotAuthorizedException",
    "UserNotFoundException",
    "UserNotConfirmedException",
    "PasswordResetRequiredException",
];

/// Map a non-success response to an error. Client errors carrying a
/// `__type` are either rejections of the user's credentials or provider
/// errors (throttling, bad configuration); anything else is a protocol
/// failure.
fn parse_error(status: u16, body: &str) -> IdentityError {
    if !(400..500).contains(&status) {
        return IdentityError::Response { status, body: body.to_owned() };
    }
    match serde_json::from_str::<ApiError>(body) {
        Ok(api) => {
            // `__type` may be namespaced, e.g. `com.amazonaws...#NotAuthorizedException`.
            let kind = api.kind.rsplit('#').next().unwrap_or_default().to_owned();
            let message = if api.message.is_empty() { kind.clone() } else { api.message };
            if REJECTION_KINDS.contains(&kind.as_str()) {
                IdentityError::Rejected { kind, message }
            } else {
                IdentityError::Provider { kind, message }
            }
        }
        Err(_) => IdentityError::Response { status, body: body.to_owned() },
    }
}
