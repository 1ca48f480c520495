//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning [`ApiError::Unavailable`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns a `Result` whose error keeps the server's raw message,
//! so pages decide per call whether a failure is alerted, toasted, logged, or
//! treated as an empty collection.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{ClientConfig, FabCameraMap, GroundTruth, ImageQuery, ImageRecord, SessionInfo};
#[cfg(any(test, feature = "hydrate"))]
use super::types::ErrorBody;
#[cfg(feature = "hydrate")]
use super::types::LoginRequest;

/// Failure of a browser → server call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Called during server rendering.
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// The raw message suitable for showing to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("request failed: {status}"));
    ApiError::Status { status, message }
}

#[cfg(feature = "hydrate")]
async fn read_json<T: serde::de::DeserializeOwned>(resp: gloo_net::http::Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(feature = "hydrate")]
async fn read_empty(resp: gloo_net::http::Response) -> Result<(), ApiError> {
    if resp.ok() {
        return Ok(());
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

#[cfg(feature = "hydrate")]
fn network(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

/// Look up the current session via `GET /api/auth/session`.
///
/// # Errors
///
/// A 401 carrying `"No current user"` means no session exists; anything else
/// is a real failure.
pub async fn fetch_session() -> Result<SessionInfo, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/session")
            .send()
            .await
            .map_err(network)?;
        read_json(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Sign in via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns the identity provider's message when the credentials are refused.
pub async fn login(email: &str, password: &str) -> Result<SessionInfo, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let payload = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        let resp = gloo_net::http::Request::post("/api/auth/login")
            .json(&payload)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_json(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password);
        Err(ApiError::Unavailable)
    }
}

/// Sign out via `POST /api/auth/logout`.
///
/// # Errors
///
/// Returns an error if the server could not be reached.
pub async fn logout() -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/logout")
            .send()
            .await
            .map_err(network)?;
        read_empty(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Fetch storage settings from `GET /api/config`.
///
/// # Errors
///
/// Returns an error if the request fails or the body is malformed.
pub async fn fetch_config() -> Result<ClientConfig, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/config")
            .send()
            .await
            .map_err(network)?;
        read_json(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Fetch the fab → camera mapping from `GET /api/devices`.
///
/// # Errors
///
/// Returns an error if the request fails or the body is malformed.
pub async fn fetch_devices() -> Result<FabCameraMap, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/devices")
            .send()
            .await
            .map_err(network)?;
        read_json(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Fetch the image list for a filter from `GET /api/images`.
///
/// # Errors
///
/// Returns an error if the request fails or the body is malformed.
pub async fn fetch_images(query: &ImageQuery) -> Result<Vec<ImageRecord>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let pairs = query.query_pairs();
        let resp = gloo_net::http::Request::get("/api/images")
            .query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .send()
            .await
            .map_err(network)?;
        read_json(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = query;
        Err(ApiError::Unavailable)
    }
}

/// Persist a corrected label via `POST /api/groundtruth`.
///
/// # Errors
///
/// Returns an error if the request fails or the server rejects it.
pub async fn submit_ground_truth(truth: &GroundTruth) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/groundtruth")
            .json(truth)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_empty(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = truth;
        Err(ApiError::Unavailable)
    }
}
