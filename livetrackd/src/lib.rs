//! # Livetrackd
//!
//! Privacy-filtered live GPS track server.
//!
//! This crate provides:
//! - Source ingestion (archived JSON positions, FIT recorder files,
//!   geotagged images, a polled live-tracking feed, an access-code file)
//! - Lock-guarded shared state for the merged track and its watermark
//! - Periodic background refresh tasks under a supervisor
//! - The HTTP surface (incremental update API, map page, static images)
//!
//! Track algorithms (distance, pruning, merging, geofencing, incremental
//! queries) live in the `trackmerge` crate.

pub mod access;
pub mod config;
pub mod error;
pub mod server;
pub mod sources;
pub mod state;
pub mod tasks;

pub use config::{Config, GEOFENCE_RADIUS_KM, MIN_RETENTION_KM};
pub use error::{LivetrackError, Result};
pub use state::{AppState, TrackState};
