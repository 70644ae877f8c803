//! Process-wide shared state.
//!
//! Three independently locked cells behind one explicit handle that is
//! threaded into every component: the track with its admission watermark
//! (a single unit of consistency), the image location index, and the
//! access-code set. No operation holds two of these locks at once, so no
//! lock ordering is needed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use trackmerge::{GpsCoords, Waypoint};

/// The canonical track and its admission watermark, guarded as one unit.
///
/// The watermark always equals the last waypoint's timestamp while the
/// track is non-empty; both fields change only together under the
/// exclusive lock.
#[derive(Debug, Default)]
pub struct TrackState {
    waypoints: Vec<Waypoint>,
    watermark: Option<DateTime<Utc>>,
}

impl TrackState {
    /// Install the startup merge result and derive the watermark from its
    /// last element. Called once; later mutation is single-point appends.
    pub fn install(&mut self, waypoints: Vec<Waypoint>) {
        self.watermark = waypoints.last().map(|wp| wp.timestamp);
        self.waypoints = waypoints;
    }

    /// Append a live candidate if it is strictly newer than the watermark.
    ///
    /// Returns `true` when the candidate was admitted. The append and the
    /// watermark update happen together, so no reader can observe the
    /// pair out of sync. Stale and duplicate candidates are the expected
    /// steady state between genuinely new positions.
    pub fn try_append(&mut self, waypoint: Waypoint) -> bool {
        if let Some(watermark) = self.watermark {
            if waypoint.timestamp <= watermark {
                return false;
            }
        }
        self.watermark = Some(waypoint.timestamp);
        self.waypoints.push(waypoint);
        true
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn watermark(&self) -> Option<DateTime<Utc>> {
        self.watermark
    }
}

/// Shared application state handle.
#[derive(Clone, Default)]
pub struct AppState {
    /// Track + watermark, one lock for both.
    pub track: Arc<RwLock<TrackState>>,
    /// Image name -> coordinates, replaced wholesale on each rescan.
    pub images: Arc<RwLock<HashMap<String, GpsCoords>>>,
    /// Access codes, grown additively, never shrunk at runtime.
    pub codes: Arc<RwLock<HashSet<String>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
