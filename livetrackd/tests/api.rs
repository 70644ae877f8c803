//! Update API integration tests, driven through the axum handlers.
//!
//! Covers cursor filtering, the tiered privacy window, cache headers and
//! client-error handling for malformed cursors.

use std::collections::HashMap;

use axum::body::to_bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;
use trackmerge::{GpsCoords, Waypoint};

use livetrackd::server::{handle_updates, ServerState, ViewParams};
use livetrackd::state::AppState;

/// Helper: server state holding the given track, codes and images.
async fn server_state(
    waypoints: Vec<Waypoint>,
    codes: &[&str],
    images: HashMap<String, GpsCoords>,
) -> (ServerState, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let app = AppState::new();

    app.track.write().await.install(waypoints);
    *app.images.write().await = images;
    {
        let mut code_set = app.codes.write().await;
        for code in codes {
            code_set.insert(code.to_string());
        }
    }

    (
        ServerState {
            app,
            images_dir: dir.path().to_path_buf(),
        },
        dir,
    )
}

fn wp(lat: f64, lng: f64, secs: i64) -> Waypoint {
    Waypoint::new(GpsCoords::new(lat, lng), Utc.timestamp_opt(secs, 0).unwrap())
}

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn params(since: Option<&str>, code: Option<&str>) -> Query<ViewParams> {
    Query(ViewParams {
        since: since.map(str::to_string),
        code: code.map(str::to_string),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

// ============================================================================
// Cursor filtering
// ============================================================================

#[tokio::test]
async fn test_since_between_two_waypoints_returns_later_one() {
    let (state, _dir) = server_state(
        vec![wp(40.00, -74.0, 1000), wp(40.01, -74.0, 2000)],
        &["sesame"],
        HashMap::new(),
    )
    .await;

    let since = ts(1500).to_rfc3339();
    let response = handle_updates(State(state), params(Some(&since), Some("sesame"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["waypoints"].as_array().unwrap().len(), 1);
    assert_eq!(body["waypoints"][0][0].as_f64().unwrap(), 40.01);
    // The cursor can always advance to the newest visible point.
    assert_eq!(
        body["lastModified"].as_str().unwrap().parse::<DateTime<Utc>>().unwrap(),
        ts(2000)
    );
}

#[tokio::test]
async fn test_since_before_all_waypoints_returns_both() {
    let (state, _dir) = server_state(
        vec![wp(40.00, -74.0, 1000), wp(40.01, -74.0, 2000)],
        &["sesame"],
        HashMap::new(),
    )
    .await;

    let since = ts(500).to_rfc3339();
    let response = handle_updates(State(state), params(Some(&since), Some("sesame"))).await;
    let body = body_json(response).await;
    assert_eq!(body["waypoints"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_since_is_a_client_error_without_json_body() {
    let (state, _dir) = server_state(vec![wp(40.0, -74.0, 1000)], &[], HashMap::new()).await;

    let response = handle_updates(State(state), params(Some("not-a-timestamp"), None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

// ============================================================================
// Tiering
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_caller_gets_geofenced_window() {
    // Departure area ~55 km from the current position, then a tight run.
    let track = vec![
        wp(40.00, -74.0, 1000),
        wp(40.50, -74.0, 2000),
        wp(40.51, -74.0, 3000),
    ];
    let (state, _dir) = server_state(track, &["sesame"], HashMap::new()).await;

    let response = handle_updates(State(state), params(None, None)).await;
    let body = body_json(response).await;

    let waypoints = body["waypoints"].as_array().unwrap();
    assert_eq!(waypoints.len(), 2);
    assert_eq!(waypoints[0][0].as_f64().unwrap(), 40.50);
}

#[tokio::test]
async fn test_valid_code_sees_full_history() {
    let track = vec![
        wp(40.00, -74.0, 1000),
        wp(40.50, -74.0, 2000),
        wp(40.51, -74.0, 3000),
    ];
    let (state, _dir) = server_state(track, &["sesame"], HashMap::new()).await;

    let response = handle_updates(State(state), params(None, Some("sesame"))).await;
    let body = body_json(response).await;
    assert_eq!(body["waypoints"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_no_configured_codes_restricts_any_secret() {
    // Zero configured codes: presenting a secret behaves exactly like
    // presenting an invalid one.
    let track = vec![
        wp(40.00, -74.0, 1000),
        wp(40.50, -74.0, 2000),
        wp(40.51, -74.0, 3000),
    ];
    let (state, _dir) = server_state(track, &[], HashMap::new()).await;

    let response = handle_updates(State(state), params(None, Some("anything"))).await;
    let body = body_json(response).await;
    assert_eq!(body["waypoints"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_restricted_cursor_stays_inside_window() {
    // A restricted caller rewinding its cursor to zero still sees only
    // the geofenced window.
    let track = vec![
        wp(40.00, -74.0, 1000),
        wp(40.50, -74.0, 2000),
        wp(40.51, -74.0, 3000),
    ];
    let (state, _dir) = server_state(track, &[], HashMap::new()).await;

    let since = ts(0).to_rfc3339();
    let response = handle_updates(State(state), params(Some(&since), None)).await;
    let body = body_json(response).await;
    assert_eq!(body["waypoints"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Envelope
// ============================================================================

#[tokio::test]
async fn test_response_disables_caching() {
    let (state, _dir) = server_state(vec![wp(40.0, -74.0, 1000)], &[], HashMap::new()).await;

    let response = handle_updates(State(state), params(None, None)).await;
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache, no-store, must-revalidate"
    );
}

#[tokio::test]
async fn test_images_are_returned_unfiltered() {
    let mut images = HashMap::new();
    images.insert("summit.jpg".to_string(), GpsCoords::new(45.8, 6.8));

    // No waypoints at all; the image index still comes back whole.
    let (state, _dir) = server_state(Vec::new(), &[], images).await;

    let response = handle_updates(State(state), params(None, None)).await;
    let body = body_json(response).await;

    assert!(body["waypoints"].as_array().unwrap().is_empty());
    assert!(body["lastModified"].is_null());
    assert_eq!(body["images"]["summit.jpg"][0].as_f64().unwrap(), 45.8);
}
