//! Fab data routes: client config plus authenticated fab API proxies.

#[cfg(test)]
#[path = "fabs_test.rs"]
mod fabs_test;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use wafer_client::net::types::{ClientConfig, GroundTruth, ImageQuery};

use super::auth::{AuthUser, error_response};
use crate::services::fab_api::UpstreamError;
use crate::state::AppState;

/// Upstream client errors pass through; anything else is a gateway failure.
pub(crate) fn upstream_error_to_status(err: &UpstreamError) -> StatusCode {
    match err {
        UpstreamError::Status { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn upstream_error_response(err: &UpstreamError) -> Response {
    let status = upstream_error_to_status(err);
    let message = match err {
        UpstreamError::Status { body, .. } if status != StatusCode::BAD_GATEWAY && !body.trim().is_empty() => {
            body.trim().to_owned()
        }
        _ if status == StatusCode::BAD_GATEWAY => "fab API unavailable".to_owned(),
        _ => "request rejected by fab API".to_owned(),
    };
    error_response(status, message)
}

/// `GET /api/config`: values the browser needs to build image URLs.
pub async fn client_config(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.config.client.clone())
}

/// `GET /api/devices`: fab → cameras mapping.
pub async fn devices(State(state): State<AppState>, auth: AuthUser) -> Response {
    match state.fab_api.list_devices(&auth.session.tokens.id_token).await {
        Ok(map) => Json(map).into_response(),
        Err(e) => {
            tracing::error!(email = %auth.session.email, error = %e, "device list failed");
            upstream_error_response(&e)
        }
    }
}

/// `GET /api/images?fab&camera&fromts&tots`: images for one camera and window.
pub async fn images(State(state): State<AppState>, auth: AuthUser, Query(query): Query<ImageQuery>) -> Response {
    tracing::debug!(
        fab = %query.fab,
        camera = %query.camera,
        fromts = query.fromts,
        tots = query.tots,
        "image list requested"
    );
    match state.fab_api.list_images(&auth.session.tokens.id_token, &query).await {
        Ok(images) => Json(images).into_response(),
        Err(e) => {
            tracing::error!(fab = %query.fab, camera = %query.camera, error = %e, "image list failed");
            upstream_error_response(&e)
        }
    }
}

/// `POST /api/groundtruth`: record a reviewer's corrected label.
pub async fn ground_truth(State(state): State<AppState>, auth: AuthUser, Json(truth): Json<GroundTruth>) -> Response {
    match state.fab_api.submit_ground_truth(&auth.session.tokens.id_token, &truth).await {
        Ok(()) => {
            tracing::info!(
                email = %auth.session.email,
                imgid = %truth.imgid,
                truth = %truth.truth,
                "ground truth recorded"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!(imgid = %truth.imgid, error = %e, "ground truth submit failed");
            upstream_error_response(&e)
        }
    }
}
