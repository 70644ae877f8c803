//! Live tracking feed polling.
//!
//! Fetches at most one candidate waypoint per poll tick from the
//! third-party share endpoint. The share token is re-read from disk every
//! tick so a rotation needs no restart; a token the endpoint reports as
//! not found is suppressed until the file contents change.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use reqwest::{Client, StatusCode};

use crate::error::Result;
use crate::sources::archive::WaypointRecord;

/// Upper bound on a single feed request. A stalled fetch must not stall
/// the poll loop past this budget.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Polls the third-party live-tracking share endpoint.
pub struct FeedPoller {
    client: Client,
    base_url: String,
    token_file: PathBuf,
    last_token: String,
    token_dead: bool,
}

impl FeedPoller {
    pub fn new(base_url: String, token_file: PathBuf) -> Result<Self> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            token_file,
            last_token: String::new(),
            token_dead: false,
        })
    }

    /// Fetch the current live position, or `None` when the token is
    /// missing, suppressed, or the fetch failed.
    ///
    /// Returns the parsed record together with the raw response body so
    /// the caller can persist exactly what the feed sent. Failures are
    /// logged here and naturally retried on the next tick.
    pub async fn poll(&mut self) -> Option<(WaypointRecord, Vec<u8>)> {
        let token = match fs::read_to_string(&self.token_file) {
            Ok(contents) => contents.trim().to_string(),
            Err(e) => {
                warn!(
                    "Error reading tracking token file {}: {}",
                    self.token_file.display(),
                    e
                );
                return None;
            }
        };

        if token != self.last_token {
            info!("Using new tracking token: {}", token);
            self.last_token = token.clone();
            self.token_dead = false;
        } else if self.token_dead {
            return None;
        }

        if token.is_empty() {
            warn!(
                "Tracking token file {} is empty",
                self.token_file.display()
            );
            self.token_dead = true;
            return None;
        }

        let url = format!("{}/{}", self.base_url, token);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error fetching tracking data: {}", e);
                return None;
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND => {
                warn!(
                    "Tracking token {} not found, stopping further requests",
                    token
                );
                self.token_dead = true;
                None
            }
            status if !status.is_success() => {
                warn!("Non-OK HTTP status from live feed: {}", status);
                None
            }
            _ => {
                let body = match response.bytes().await {
                    Ok(body) => body,
                    Err(e) => {
                        warn!("Error reading tracking response body: {}", e);
                        return None;
                    }
                };

                match serde_json::from_slice::<WaypointRecord>(&body) {
                    Ok(record) => Some((record, body.to_vec())),
                    Err(e) => {
                        warn!("Error decoding tracking JSON: {}", e);
                        None
                    }
                }
            }
        }
    }
}
