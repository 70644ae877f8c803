//! Unified error handling for the livetrack daemon.
//!
//! Ingestion errors (unreadable files, undecodable records) are recovered
//! locally by the sources that raise them: logged, the offending unit
//! skipped, never fatal. The variants here exist so those sites and the
//! startup path propagate one consistent type.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for daemon operations.
#[derive(Debug, Error)]
pub enum LivetrackError {
    /// Filesystem failure on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An activity-recorder file failed to decode
    #[error("failed to decode FIT file {path}: {message}")]
    FitDecode { path: PathBuf, message: String },

    /// Image metadata could not be read
    #[error("failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    /// Live feed client construction or request failure
    #[error("live feed error: {0}")]
    Feed(#[from] reqwest::Error),

    /// Server socket or accept-loop failure
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Result type alias for daemon operations.
pub type Result<T> = std::result::Result<T, LivetrackError>;
