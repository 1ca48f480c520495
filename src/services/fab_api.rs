//! Fab API client: devices, image lists, and ground-truth submissions.
//!
//! Every call carries the signed-in user's identity token as
//! `Authorization`. Pure parsing in `parse_devices` / `parse_images` for
//! testability.

#[cfg(test)]
#[path = "fab_api_test.rs"]
mod fab_api_test;

use std::time::Duration;

use wafer_client::net::types::{FabCameraMap, GroundTruth, ImageQuery, ImageRecord};

use crate::config::UpstreamTimeouts;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request to the fab API failed.
    #[error("fab API request failed: {0}")]
    Request(String),

    /// The fab API returned a non-success HTTP status.
    #[error("fab API response error: status {status}")]
    Status { status: u16, body: String },

    /// The fab API response body could not be deserialized.
    #[error("fab API response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Fab API operations, each performed on behalf of one user.
#[async_trait::async_trait]
pub trait FabApi: Send + Sync {
    /// Fab → cameras mapping.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] if the call fails or the body is malformed.
    async fn list_devices(&self, id_token: &str) -> Result<FabCameraMap, UpstreamError>;

    /// Images for one fab/camera pair between two instants.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] if the call fails or the body is malformed.
    async fn list_images(&self, id_token: &str, query: &ImageQuery) -> Result<Vec<ImageRecord>, UpstreamError>;

    /// Record a reviewer's corrected label.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] if the call fails.
    async fn submit_ground_truth(&self, id_token: &str, truth: &GroundTruth) -> Result<(), UpstreamError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct FabApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl FabApiClient {
    /// # Errors
    ///
    /// Returns [`UpstreamError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: UpstreamTimeouts) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| UpstreamError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, id_token: &str) -> Result<String, UpstreamError> {
        let response = request
            .header(reqwest::header::AUTHORIZATION, id_token)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(UpstreamError::Status { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl FabApi for FabApiClient {
    async fn list_devices(&self, id_token: &str) -> Result<FabCameraMap, UpstreamError> {
        let text = self.send(self.http.get(self.url("/devices")), id_token).await?;
        parse_devices(&text)
    }

    async fn list_images(&self, id_token: &str, query: &ImageQuery) -> Result<Vec<ImageRecord>, UpstreamError> {
        let request = self.http.get(self.url("/images")).query(&query.query_pairs());
        let text = self.send(request, id_token).await?;
        parse_images(&text)
    }

    async fn submit_ground_truth(&self, id_token: &str, truth: &GroundTruth) -> Result<(), UpstreamError> {
        let request = self.http.post(self.url("/groundtruth")).json(truth);
        self.send(request, id_token).await?;
        Ok(())
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_devices(json: &str) -> Result<FabCameraMap, UpstreamError> {
    serde_json::from_str(json).map_err(|e| UpstreamError::Parse(e.to_string()))
}

fn parse_images(json: &str) -> Result<Vec<ImageRecord>, UpstreamError> {
    serde_json::from_str(json).map_err(|e| UpstreamError::Parse(e.to_string()))
}
