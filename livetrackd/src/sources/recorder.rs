//! Activity-recorder (FIT) file ingestion.
//!
//! Record messages carry positions as 32-bit semicircles and a device
//! timestamp. Only records with both position fields and a timestamp
//! become waypoints; a file that fails to decode is skipped.

use std::fs;
use std::path::Path;

use chrono::Utc;
use fitparser::de::from_bytes;
use fitparser::profile::MesgNum;
use fitparser::Value;
use log::{info, warn};
use trackmerge::{GpsCoords, Waypoint};

use crate::error::{LivetrackError, Result};

use super::{has_extension, visit_files};

/// Degrees per FIT semicircle.
const SEMICIRCLES_TO_DEGREES: f64 = 180.0 / 2_147_483_648.0;

/// Load every track point from `*.fit` files under `dir`.
///
/// A missing directory yields an empty set; a file that fails to decode
/// is logged and skipped.
pub fn load_recorder_waypoints(dir: &Path) -> Vec<Waypoint> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut waypoints = Vec::new();
    visit_files(dir, &mut |path| {
        if !has_extension(path, &["fit"]) {
            return;
        }
        match parse_fit_file(path) {
            Ok(mut parsed) => waypoints.append(&mut parsed),
            Err(e) => warn!("Error parsing FIT file: {}", e),
        }
    });

    info!(
        "Loaded {} recorder waypoints from {}",
        waypoints.len(),
        dir.display()
    );
    waypoints
}

/// Parse a single FIT file into waypoints.
fn parse_fit_file(path: &Path) -> Result<Vec<Waypoint>> {
    let data = fs::read(path).map_err(|source| LivetrackError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = from_bytes(&data).map_err(|e| LivetrackError::FitDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut waypoints = Vec::new();
    for record in records {
        if record.kind() != MesgNum::Record {
            continue;
        }

        let mut lat = None;
        let mut lng = None;
        let mut timestamp = None;

        for field in record.fields() {
            match field.name() {
                "position_lat" => lat = semicircles_to_degrees(field.value()),
                "position_long" => lng = semicircles_to_degrees(field.value()),
                "timestamp" => {
                    if let Value::Timestamp(ts) = field.value() {
                        timestamp = Some(ts.with_timezone(&Utc));
                    }
                }
                _ => {}
            }
        }

        if let (Some(lat), Some(lng), Some(timestamp)) = (lat, lng, timestamp) {
            waypoints.push(Waypoint::new(GpsCoords::new(lat, lng), timestamp));
        }
    }

    Ok(waypoints)
}

fn semicircles_to_degrees(value: &Value) -> Option<f64> {
    match value {
        Value::SInt32(v) => Some(*v as f64 * SEMICIRCLES_TO_DEGREES),
        _ => None,
    }
}
