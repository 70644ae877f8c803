//! # Trackmerge
//!
//! GPS track merging, pruning and geofenced incremental queries.
//!
//! This library provides:
//! - Great-circle distance on a fixed-radius sphere
//! - Local track pruning (consecutive-point deduplication)
//! - Recorder-authoritative merging of heterogeneous position sources
//! - Trailing geofence windows and tier-aware incremental queries
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use trackmerge::{merge_waypoints, query_track, AccessTier, GpsCoords, Waypoint};
//!
//! let archived = vec![
//!     Waypoint::new(GpsCoords::new(51.5074, -0.1278), Utc.timestamp_opt(1000, 0).unwrap()),
//!     Waypoint::new(GpsCoords::new(51.5174, -0.1278), Utc.timestamp_opt(2000, 0).unwrap()),
//! ];
//!
//! let track = merge_waypoints(archived, Vec::new(), 0.02);
//! let update = query_track(&track, AccessTier::Full, None, 10.0);
//! assert_eq!(update.waypoints.len(), 2);
//! ```

// Distance primitive (all thresholds in this crate are kilometres)
pub mod geo;
pub use geo::haversine_km;

// Waypoint types, pruning and source merging
pub mod track;
pub use track::{merge_waypoints, prune_waypoints, GpsCoords, Waypoint};

// Trailing geofence window
pub mod geofence;
pub use geofence::visible_suffix;

// Tier-aware incremental queries
pub mod query;
pub use query::{query_track, AccessTier, TrackUpdate};
