//! Background task supervisor.
//!
//! One long-lived task per periodic refresh, running independently on a
//! fixed interval and coordinating only through the shared-state locks.
//! The supervisor retains the join handles so a shutdown signal can be
//! added later without restructuring; the current design has none and the
//! loops run for the process lifetime.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::Config;
use crate::sources::{archive, codes, feed::FeedPoller, images};
use crate::state::AppState;

pub struct Supervisor {
    handles: Vec<JoinHandle<()>>,
}

impl Supervisor {
    /// Spawn the image-rescan loop and the live-feed/code-refresh loop.
    pub fn spawn(state: AppState, config: &Config, poller: FeedPoller) -> Self {
        let handles = vec![
            tokio::spawn(image_scan_loop(
                state.clone(),
                config.images_dir.clone(),
                Duration::from_secs(config.image_scan_interval_secs),
            )),
            tokio::spawn(feed_loop(state, config.clone(), poller)),
        ];
        Self { handles }
    }

    /// Handles of the spawned loops, in spawn order.
    pub fn handles(&self) -> &[JoinHandle<()>] {
        &self.handles
    }
}

/// Rebuild the image location index on a fixed interval.
///
/// The scan runs on the blocking pool and produces a fresh map that is
/// swapped in under the images lock, so readers never see a partial
/// rebuild.
async fn image_scan_loop(state: AppState, images_dir: PathBuf, period: Duration) {
    let mut ticker = time::interval(period);
    // The initial scan already ran at startup; consume the immediate tick.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let dir = images_dir.clone();
        let index = match tokio::task::spawn_blocking(move || images::scan_images(&dir)).await {
            Ok(index) => index,
            Err(e) => {
                warn!("Image scan task failed: {}", e);
                continue;
            }
        };

        *state.images.write().await = index;
    }
}

/// Poll the live feed and refresh the access codes on a fixed interval.
///
/// The code refresh is purely additive and has no ordering dependency on
/// waypoint admission; both happen on the same tick for simplicity.
async fn feed_loop(state: AppState, config: Config, mut poller: FeedPoller) {
    let mut ticker = time::interval(Duration::from_secs(config.poll_interval_secs));
    ticker.tick().await;

    loop {
        ticker.tick().await;

        {
            let mut code_set = state.codes.write().await;
            codes::refresh_codes(&config.codes_file, &mut code_set);
        }

        let Some((record, body)) = poller.poll().await else {
            continue;
        };
        // Candidates without a location never reach the admission gate.
        let Some(waypoint) = record.into_waypoint() else {
            continue;
        };

        let admitted = {
            let mut track = state.track.write().await;
            track.try_append(waypoint)
        };

        if admitted {
            info!("Accepted live waypoint at {}", waypoint.timestamp);
            archive::persist_live_record(&config.data_dir, &body, waypoint.timestamp);
        } else {
            // Expected steady state between genuinely new positions.
            debug!("Dropped stale live waypoint at {}", waypoint.timestamp);
        }
    }
}
