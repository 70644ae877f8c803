//! Archived waypoint JSON files.
//!
//! The archive directory holds one JSON record per accepted live
//! position, written by the feed integrator and read back at startup.
//! Records without a location never become waypoints.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use trackmerge::{GpsCoords, Waypoint};

use super::{has_extension, visit_files};

/// Wire shape of a waypoint record: a possibly missing location plus an
/// update timestamp. Shared by the archived files and the live feed
/// response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GpsCoords>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl WaypointRecord {
    /// Convert into a validated waypoint, or `None` when the record
    /// carries no location.
    pub fn into_waypoint(self) -> Option<Waypoint> {
        self.location
            .map(|coords| Waypoint::new(coords, self.updated_at))
    }
}

/// Load every parseable waypoint from `*.json` files under `dir`.
///
/// Unreadable or unparsable files are logged and skipped; records without
/// a location are dropped silently.
pub fn load_archived_waypoints(dir: &Path) -> Vec<Waypoint> {
    let mut waypoints = Vec::new();
    let mut file_count = 0usize;

    visit_files(dir, &mut |path| {
        if !has_extension(path, &["json"]) {
            return;
        }
        file_count += 1;

        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Error reading JSON file {}: {}", path.display(), e);
                return;
            }
        };

        let record: WaypointRecord = match serde_json::from_slice(&data) {
            Ok(record) => record,
            Err(e) => {
                warn!("Error parsing JSON file {}: {}", path.display(), e);
                return;
            }
        };

        if let Some(waypoint) = record.into_waypoint() {
            waypoints.push(waypoint);
        }
    });

    info!(
        "Loaded {} archived waypoints from {} JSON files under {}",
        waypoints.len(),
        file_count,
        dir.display()
    );
    waypoints
}

/// Persist a newly accepted live record next to the archived files.
///
/// Best-effort: a failed write is logged and never retried; the in-memory
/// track already holds the waypoint and remains authoritative.
pub fn persist_live_record(dir: &Path, body: &[u8], timestamp: DateTime<Utc>) {
    let filename = format!("tracking_{}.json", timestamp.format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);
    if let Err(e) = fs::write(&path, body) {
        warn!("Error persisting live waypoint to {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_without_location_yields_no_waypoint() {
        let record: WaypointRecord =
            serde_json::from_str(r#"{"updatedAt":"2025-06-01T10:00:00Z"}"#).unwrap();
        assert!(record.into_waypoint().is_none());
    }

    #[test]
    fn test_record_with_location_parses() {
        let record: WaypointRecord = serde_json::from_str(
            r#"{"location":{"lat":46.2,"lng":6.1},"updatedAt":"2025-06-01T10:00:00Z"}"#,
        )
        .unwrap();

        let waypoint = record.into_waypoint().unwrap();
        assert_eq!(waypoint.coords.lat, 46.2);
        assert_eq!(waypoint.coords.lng, 6.1);
        assert_eq!(
            waypoint.timestamp,
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_record_round_trips_wire_field_names() {
        let record = WaypointRecord {
            location: Some(GpsCoords::new(46.2, 6.1)),
            updated_at: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"lat\":46.2"));
    }
}
