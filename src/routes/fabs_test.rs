use std::sync::Arc;

use axum::body::to_bytes;
use time::{Duration, OffsetDateTime};
use wafer_client::net::types::FabCameraMap;

use super::*;
use crate::services::session::Session;
use crate::state::test_helpers::{MockFabApi, MockIdentity, image, seed_session, test_config};

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn signed_in(fab_api: Arc<MockFabApi>) -> (AppState, AuthUser) {
    let state = AppState::new(test_config(), Arc::new(MockIdentity::accepting("pw")), fab_api);
    let token = seed_session(&state, "qa@fab.example", Duration::hours(1)).await;
    let session: Session = state.sessions.get(&token, OffsetDateTime::now_utc()).await.unwrap();
    (state, AuthUser { session })
}

fn query() -> ImageQuery {
    ImageQuery { fab: "fab-a".to_owned(), camera: "cam-1".to_owned(), fromts: 1_700_000_000, tots: 1_700_086_400 }
}

// =============================================================================
// upstream_error_to_status
// =============================================================================

#[test]
fn client_errors_pass_through() {
    let err = UpstreamError::Status { status: 404, body: String::new() };
    assert_eq!(upstream_error_to_status(&err), StatusCode::NOT_FOUND);
    let err = UpstreamError::Status { status: 403, body: String::new() };
    assert_eq!(upstream_error_to_status(&err), StatusCode::FORBIDDEN);
}

#[test]
fn server_and_transport_errors_are_bad_gateway() {
    let err = UpstreamError::Status { status: 503, body: "busy".to_owned() };
    assert_eq!(upstream_error_to_status(&err), StatusCode::BAD_GATEWAY);
    assert_eq!(upstream_error_to_status(&UpstreamError::Request("timeout".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(upstream_error_to_status(&UpstreamError::Parse("eof".into())), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn client_error_body_is_forwarded() {
    let err = UpstreamError::Status { status: 400, body: " missing camera \n".to_owned() };
    let response = upstream_error_response(&err);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, serde_json::json!({ "error": "missing camera" }));
}

#[tokio::test]
async fn server_error_body_is_not_forwarded() {
    let err = UpstreamError::Status { status: 500, body: "stack trace".to_owned() };
    let response = upstream_error_response(&err);
    assert_eq!(body_json(response).await, serde_json::json!({ "error": "fab API unavailable" }));
}

// =============================================================================
// handlers
// =============================================================================

#[tokio::test]
async fn client_config_returns_storage_settings() {
    let state = AppState::new(
        test_config(),
        Arc::new(MockIdentity::accepting("pw")),
        Arc::new(MockFabApi::default()),
    );
    let Json(config) = client_config(State(state)).await;
    assert_eq!(config.bucket, "chip-wafer-new-images");
    assert_eq!(config.region, "us-west-2");
}

#[tokio::test]
async fn devices_forwards_id_token_and_mapping() {
    let fab_api = Arc::new(MockFabApi {
        devices: FabCameraMap::new(vec![("fab-a".to_owned(), vec!["cam-1".to_owned()])]),
        ..MockFabApi::default()
    });
    let (state, auth) = signed_in(fab_api.clone()).await;

    let response = devices(State(state), auth).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "fab-a": ["cam-1"] }));
    assert_eq!(*fab_api.tokens.lock().unwrap(), vec!["id-qa@fab.example".to_owned()]);
}

#[tokio::test]
async fn devices_upstream_failure_is_bad_gateway() {
    let fab_api = Arc::new(MockFabApi { fail_status: Some(502), ..MockFabApi::default() });
    let (state, auth) = signed_in(fab_api).await;
    let response = devices(State(state), auth).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn images_passes_query_through() {
    let fab_api = Arc::new(MockFabApi {
        images: vec![image("w1", "Donut", 0.9), image("w2", "none", 0.4)],
        ..MockFabApi::default()
    });
    let (state, auth) = signed_in(fab_api.clone()).await;

    let response = images(State(state), auth, Query(query())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["imgid"], "w1");
    assert_eq!(*fab_api.queries.lock().unwrap(), vec![query()]);
}

#[tokio::test]
async fn images_upstream_forbidden_passes_through() {
    let fab_api = Arc::new(MockFabApi { fail_status: Some(403), ..MockFabApi::default() });
    let (state, auth) = signed_in(fab_api).await;
    let response = images(State(state), auth, Query(query())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, serde_json::json!({ "error": "upstream refused" }));
}

#[tokio::test]
async fn ground_truth_is_recorded() {
    let fab_api = Arc::new(MockFabApi::default());
    let (state, auth) = signed_in(fab_api.clone()).await;
    let truth = GroundTruth {
        imgid: "w1".to_owned(),
        fab: "fab-a".to_owned(),
        camera: "cam-1".to_owned(),
        truth: "Edge-Ring".to_owned(),
    };

    let response = ground_truth(State(state), auth, Json(truth.clone())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(*fab_api.submitted.lock().unwrap(), vec![truth]);
}

#[tokio::test]
async fn ground_truth_upstream_failure_is_reported() {
    let fab_api = Arc::new(MockFabApi { fail_status: Some(500), ..MockFabApi::default() });
    let (state, auth) = signed_in(fab_api.clone()).await;
    let truth = GroundTruth {
        imgid: "w1".to_owned(),
        fab: "fab-a".to_owned(),
        camera: "cam-1".to_owned(),
        truth: "none".to_owned(),
    };

    let response = ground_truth(State(state), auth, Json(truth)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(fab_api.submitted.lock().unwrap().is_empty());
}
