//! Desktop simulator for the watch face.
//!
//! Runs the face against the local clock and exposes the companion channel
//! over HTTP, so configuration changes can be tried without a watch:
//!
//! ```sh
//! cargo run --example desktop_face --features web
//! curl localhost:8080/api/state
//! curl -X POST localhost:8080/api/config -d '{"seconds":"off","invert":"on"}'
//! curl -X POST localhost:8080/api/message -d '[{"key":0,"value":"on"}]'
//! ```
//!
//! Pass `noon-down` or `classic` as the first argument to pick another
//! variant, and `--no-api` to run the face without the companion API.
//! Set `RUST_LOG=debug` to see every tick and rebuild.
//!
//! Preferences are persisted to `aviator-face-settings.json` in the working
//! directory and survive restarts.

use std::sync::Arc;

use anyhow::Context;
use log::info;

use aviator_face::hal::{FileStore, MockSurface};
use aviator_face::services::{run_server_with_state, run_ticker, LocalClock, SharedFace, WebServerConfig};
use aviator_face::traits::WallClock;
use aviator_face::{Config, FaceVariant, WatchFace};

fn variant_from_args() -> FaceVariant {
    match std::env::args().nth(1).as_deref() {
        Some("noon-down") => FaceVariant::noon_down_24h(),
        Some("classic") => FaceVariant::classic_12h(),
        _ => FaceVariant::aviator_24h(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Central configuration - modify this for your setup
    let config = Config::default().with_face(variant_from_args());
    let config = if std::env::args().any(|arg| arg == "--no-api") {
        let web = config.web.clone().with_enabled(false);
        config.with_web(web)
    } else {
        config
    };
    // Example of customization:
    // let config = Config::default()
    //     .with_face(FaceVariant::classic_12h().with_name("Desk"))
    //     .with_web(aviator_face::WebConfig::default()
    //         .with_port(3000)
    //         .with_settings_path("/tmp/face.json"));

    let store = FileStore::open(config.web.settings_path.as_str())?;
    let clock = LocalClock;
    let face = WatchFace::load(MockSurface::new(), store, config.face.clone(), clock.now())
        .map_err(|e| anyhow::anyhow!("face failed to load: {}", e))?;

    let state = Arc::new(SharedFace::new(face, clock));
    info!("face '{}' running", config.face.name);

    if !config.web.enabled {
        info!("companion API disabled, ticking only");
        run_ticker(state, config.web.tick_interval_ms).await;
        return Ok(());
    }

    let web_config = WebServerConfig::from_config(&config.web);
    info!("  API: http://{}/api/state", web_config.addr);

    tokio::spawn(run_ticker(Arc::clone(&state), config.web.tick_interval_ms));

    run_server_with_state(state, web_config)
        .await
        .context("web server stopped")
}
