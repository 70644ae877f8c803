//! Tier-aware incremental track queries.
//!
//! Combines the caller's access tier, the geofence window and a `since`
//! cursor into one answer to "what changed since time T".

use chrono::{DateTime, Utc};

use crate::geofence::visible_suffix;
use crate::track::Waypoint;

/// Binary trust level for a caller. There is no partial trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    /// Full track history.
    Full,
    /// Geofenced trailing window only.
    Restricted,
}

/// Result of an incremental query.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackUpdate {
    /// Eligible waypoints newer than the caller's cursor, oldest first.
    pub waypoints: Vec<Waypoint>,
    /// Timestamp of the newest point visible to this caller, independent
    /// of the `since` filter; `None` when nothing is visible.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Answer an update query for a caller at the given tier.
///
/// Restricted callers are confined to the geofenced suffix *before* the
/// `since` filter is applied, so no cursor value can expose a point
/// outside their window. Points are returned only when strictly newer
/// than `since`. `last_modified` always reflects the newest eligible
/// point, letting a caller advance its cursor even when nothing new was
/// returned this call.
pub fn query_track(
    track: &[Waypoint],
    tier: AccessTier,
    since: Option<DateTime<Utc>>,
    radius_km: f64,
) -> TrackUpdate {
    let eligible = match tier {
        AccessTier::Full => track,
        AccessTier::Restricted => visible_suffix(track, radius_km),
    };

    let waypoints = match since {
        Some(since) => eligible
            .iter()
            .filter(|wp| wp.timestamp > since)
            .copied()
            .collect(),
        None => eligible.to_vec(),
    };

    TrackUpdate {
        waypoints,
        last_modified: eligible.last().map(|wp| wp.timestamp),
    }
}
