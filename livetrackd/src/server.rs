//! HTTP surface: incremental update API, map page, static images.
//!
//! The map page and the update API resolve the caller's tier and apply
//! the geofence through the same code path, so both views always agree on
//! what a given caller may see.

use std::collections::HashMap;
use std::path::PathBuf;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use trackmerge::{query_track, AccessTier, Waypoint};

use crate::access::resolve_tier;
use crate::config::{Config, GEOFENCE_RADIUS_KM};
use crate::state::AppState;

/// Map page template, embedded at build time.
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Handler state: the shared app state plus the static image root.
#[derive(Clone)]
pub struct ServerState {
    pub app: AppState,
    pub images_dir: PathBuf,
}

/// Query parameters accepted by the update API and the map page.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub since: Option<String>,
    pub code: Option<String>,
}

/// Incremental update response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub waypoints: Vec<[f64; 2]>,
    pub images: HashMap<String, [f64; 2]>,
    pub last_modified: Option<DateTime<Utc>>,
}

pub fn router(state: AppState, config: &Config) -> Router {
    let server_state = ServerState {
        app: state,
        images_dir: config.images_dir.clone(),
    };

    Router::new()
        .route("/api/updates", get(handle_updates))
        .route("/", get(handle_index))
        .route("/images/{*path}", get(handle_image))
        .with_state(server_state)
}

/// `GET /api/updates?since=&code=`: waypoints and image locations
/// visible to this caller, incrementally filtered by the `since` cursor.
pub async fn handle_updates(
    State(state): State<ServerState>,
    Query(params): Query<ViewParams>,
) -> Response {
    // A malformed cursor is rejected before any lock is taken.
    let since = match parse_since(params.since.as_deref()) {
        Ok(since) => since,
        Err(response) => return response,
    };

    let tier = caller_tier(&state.app, params.code.as_deref()).await;

    let update = {
        let track = state.app.track.read().await;
        query_track(track.waypoints(), tier, since, GEOFENCE_RADIUS_KM)
    };

    let response = UpdateResponse {
        waypoints: to_lat_lng_pairs(&update.waypoints),
        images: image_locations(&state.app).await,
        last_modified: update.last_modified,
    };

    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")],
        Json(response),
    )
        .into_response()
}

/// `GET /?code=`: map page with the caller-visible datasets inlined.
pub async fn handle_index(
    State(state): State<ServerState>,
    Query(params): Query<ViewParams>,
) -> Response {
    let tier = caller_tier(&state.app, params.code.as_deref()).await;

    let update = {
        let track = state.app.track.read().await;
        query_track(track.waypoints(), tier, None, GEOFENCE_RADIUS_KM)
    };

    let waypoints_json = match serde_json::to_string(&to_lat_lng_pairs(&update.waypoints)) {
        Ok(json) => json,
        Err(e) => return encoding_error(e),
    };
    let images_json = match serde_json::to_string(&image_locations(&state.app).await) {
        Ok(json) => json,
        Err(e) => return encoding_error(e),
    };

    let page = INDEX_TEMPLATE
        .replace("{{WAYPOINTS}}", &waypoints_json)
        .replace("{{IMAGES}}", &images_json);

    Html(page).into_response()
}

/// `GET /images/{*path}`: read-only static image serving.
pub async fn handle_image(
    State(state): State<ServerState>,
    UrlPath(path): UrlPath<String>,
) -> Response {
    // The image root is the only filesystem this endpoint may touch.
    if path.split('/').any(|component| component == "..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let full_path = state.images_dir.join(&path);
    match tokio::fs::read(&full_path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=259200"),
                ),
                (header::CONTENT_TYPE, content_type_for(&path)),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn caller_tier(app: &AppState, code: Option<&str>) -> AccessTier {
    let codes = app.codes.read().await;
    resolve_tier(&codes, code)
}

async fn image_locations(app: &AppState) -> HashMap<String, [f64; 2]> {
    let images = app.images.read().await;
    images
        .iter()
        .map(|(name, coords)| (name.clone(), [coords.lat, coords.lng]))
        .collect()
}

fn to_lat_lng_pairs(waypoints: &[Waypoint]) -> Vec<[f64; 2]> {
    waypoints
        .iter()
        .map(|wp| [wp.coords.lat, wp.coords.lng])
        .collect()
}

/// Parse the optional `since` cursor. An empty parameter counts as
/// absent; anything else must be RFC3339.
fn parse_since(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, Response> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Ok(Some(ts.with_timezone(&Utc))),
            Err(_) => Err((
                StatusCode::BAD_REQUEST,
                "Invalid 'since' timestamp format, use RFC3339",
            )
                .into_response()),
        },
    }
}

fn encoding_error(e: serde_json::Error) -> Response {
    error!("Error encoding JSON response: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

fn content_type_for(path: &str) -> HeaderValue {
    let lower = path.to_ascii_lowercase();
    let mime = if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".tif") || lower.ends_with(".tiff") {
        "image/tiff"
    } else if lower.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    };
    HeaderValue::from_static(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_since_accepts_rfc3339() {
        let parsed = parse_since(Some("2025-06-01T10:00:00Z")).unwrap();
        assert!(parsed.is_some());
    }

    #[test]
    fn test_parse_since_treats_empty_as_absent() {
        assert_eq!(parse_since(Some("")).unwrap(), None);
        assert_eq!(parse_since(None).unwrap(), None);
    }

    #[test]
    fn test_parse_since_rejects_garbage() {
        assert!(parse_since(Some("yesterday")).is_err());
        assert!(parse_since(Some("1717236000")).is_err());
    }

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for("a/b.JPG"), "image/jpeg");
        assert_eq!(content_type_for("scan.tiff"), "image/tiff");
        assert_eq!(content_type_for("unknown.bin"), "application/octet-stream");
    }
}
