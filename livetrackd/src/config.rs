//! Daemon configuration.
//!
//! Every path, URL and interval is a CLI flag with a default matching the
//! deployment layout. Distance thresholds are fixed named constants so
//! the map page and the update API can never disagree on them.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Minimum distance in kilometres between consecutive retained track
/// points (20 m).
pub const MIN_RETENTION_KM: f64 = 0.02;

/// Radius in kilometres of the trailing window visible to restricted
/// callers. Shared by the map page and the update API.
pub const GEOFENCE_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "livetrackd",
    about = "Privacy-filtered live GPS track server",
    version
)]
pub struct Config {
    /// Directory of archived waypoint JSON files
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Directory of activity-recorder FIT files
    #[arg(long, default_value = "./fit")]
    pub fit_dir: PathBuf,

    /// Directory of geotagged images served under /images
    #[arg(long, default_value = "./images")]
    pub images_dir: PathBuf,

    /// File holding the live-tracking share token
    #[arg(long, default_value = "./tracking_token.txt")]
    pub token_file: PathBuf,

    /// Newline-delimited access-code file
    #[arg(long, default_value = "./codes.txt")]
    pub codes_file: PathBuf,

    /// Base URL of the live-tracking share endpoint
    #[arg(
        long,
        default_value = "https://dashboard.hammerhead.io/v1/shares/tracking"
    )]
    pub feed_url: String,

    /// Live feed poll and code refresh interval in seconds
    #[arg(long, default_value_t = 15)]
    pub poll_interval_secs: u64,

    /// Image rescan interval in seconds
    #[arg(long, default_value_t = 300)]
    pub image_scan_interval_secs: u64,

    /// Address to serve HTTP on
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,
}
