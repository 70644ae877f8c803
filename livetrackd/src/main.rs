//! Daemon entry point: load sources, spawn the periodic tasks, serve.

use clap::Parser;
use log::{info, warn};
use trackmerge::merge_waypoints;

use livetrackd::config::{Config, MIN_RETENTION_KM};
use livetrackd::error::Result;
use livetrackd::sources::{archive, feed::FeedPoller, images, recorder};
use livetrackd::state::AppState;
use livetrackd::tasks::Supervisor;
use livetrackd::server;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();

    for dir in [&config.data_dir, &config.fit_dir] {
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Error creating directory {}: {}", dir.display(), e);
        }
    }

    let state = AppState::new();

    // Startup merge: archived positions + recorder files, once. The track
    // is only appended to from here on.
    let archived = archive::load_archived_waypoints(&config.data_dir);
    let recorded = recorder::load_recorder_waypoints(&config.fit_dir);
    let track = merge_waypoints(archived, recorded, MIN_RETENTION_KM);
    state.track.write().await.install(track);

    *state.images.write().await = images::scan_images(&config.images_dir);

    let poller = FeedPoller::new(config.feed_url.clone(), config.token_file.clone())?;
    let _supervisor = Supervisor::spawn(state.clone(), &config, poller);

    let app = server::router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("Server starting on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
