//! Waypoint types, local pruning and source merging.
//!
//! A track is an ordered sequence of validated waypoints. Two operations
//! establish it: [`merge_waypoints`] combines archived and
//! activity-recorder positions into one timestamp-ordered sequence, and
//! [`prune_waypoints`] collapses runs of near-stationary points.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::geo::haversine_km;

/// A geographic coordinate in decimal degrees.
///
/// Values are carried as opaque floats; no range validation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsCoords {
    pub lat: f64,
    pub lng: f64,
}

impl GpsCoords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A timestamped position. Immutable once merged into a track.
///
/// A waypoint always carries a coordinate; source records with a missing
/// location are dropped before they can become waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub coords: GpsCoords,
    pub timestamp: DateTime<Utc>,
}

impl Waypoint {
    pub fn new(coords: GpsCoords, timestamp: DateTime<Utc>) -> Self {
        Self { coords, timestamp }
    }
}

/// Collapse a timestamp-ordered sequence by dropping points closer than
/// `min_km` to the last retained point.
///
/// The first element is always retained. Every later element is compared
/// against the most recently *retained* element rather than its immediate
/// predecessor, so a dropped point never anchors later decisions. A
/// distance exactly at the threshold is retained.
///
/// This is a single O(n) forward pass giving a local sparseness
/// guarantee; it is not a shape-preserving simplification, and two
/// non-consecutive retained points may still be arbitrarily close.
///
/// The input must already be ordered by timestamp; this is not re-checked.
pub fn prune_waypoints(waypoints: &[Waypoint], min_km: f64) -> Vec<Waypoint> {
    if waypoints.len() <= 1 {
        return waypoints.to_vec();
    }

    let mut pruned = Vec::with_capacity(waypoints.len());
    pruned.push(waypoints[0]);

    for wp in &waypoints[1..] {
        let last_kept = pruned[pruned.len() - 1];
        if haversine_km(last_kept.coords, wp.coords) >= min_km {
            pruned.push(*wp);
        }
    }

    pruned
}

/// Merge archived positions with activity-recorder positions into the
/// canonical startup track.
///
/// Recorder positions are authoritative for the time range they cover:
/// any archived position whose timestamp is not strictly after the latest
/// recorder timestamp is dropped. The survivors are concatenated with the
/// recorder positions, sorted by timestamp and pruned with `min_km`.
/// Without recorder positions the archived set is sorted and pruned alone.
///
/// The comparison is against the single latest recorder timestamp, not
/// per overlap window, so an archived point dated between two recorder
/// files is dropped even when no recorder point is near it.
pub fn merge_waypoints(
    archived: Vec<Waypoint>,
    recorder: Vec<Waypoint>,
    min_km: f64,
) -> Vec<Waypoint> {
    let archived_count = archived.len();
    let recorder_count = recorder.len();

    let mut combined = if recorder.is_empty() {
        archived
    } else {
        let mut recorder = recorder;
        recorder.sort_by_key(|wp| wp.timestamp);
        let latest_recorder = recorder[recorder.len() - 1].timestamp;

        let mut combined: Vec<Waypoint> = archived
            .into_iter()
            .filter(|wp| wp.timestamp > latest_recorder)
            .collect();
        combined.extend(recorder);
        combined
    };

    combined.sort_by_key(|wp| wp.timestamp);
    let pruned = prune_waypoints(&combined, min_km);

    info!(
        "Merged {} archived and {} recorder positions: {} combined, {} after pruning",
        archived_count,
        recorder_count,
        combined.len(),
        pruned.len()
    );

    pruned
}
