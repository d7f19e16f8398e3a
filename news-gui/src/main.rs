mod app;

use std::sync::Arc;

use eframe::{egui, NativeOptions};
use news_core::{spawn_fetch, AppConfig, AppState, FetchConfig, FetchHandle};
use reqwest::{redirect, ClientBuilder};
use tokio::runtime::Runtime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::{AppInit, NewsApp};

fn main() -> eframe::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let runtime = Arc::new(Runtime::new().expect("failed to initialise Tokio runtime"));
    let state = Arc::new(init_state(&config));
    let fetch = launch_fetch(&runtime, &state, &config);

    let init = AppInit {
        runtime: runtime.clone(),
        state,
        fetch,
        config: config.clone(),
    };

    eframe::run_native(
        "News Viewer",
        NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([config.ui.window_width, config.ui.window_height])
                .with_min_inner_size([600.0, 400.0]),
            ..Default::default()
        },
        Box::new(move |cc| Box::new(NewsApp::new(&cc.egui_ctx, init))),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn init_state(config: &AppConfig) -> AppState {
    // Fall back to the working directory like the favorites file always has.
    let base = AppConfig::config_dir()
        .or_else(|_| std::env::current_dir())
        .unwrap_or_default();
    let path = config.favorites_path(base);
    info!(path = %path.display(), "favorites file");
    AppState::init(path, config.favorites.clear_on_start)
}

/// Starts the single background fetch. Without a usable endpoint or
/// credential nothing is launched and the viewer shows no data.
fn launch_fetch(runtime: &Runtime, state: &Arc<AppState>, config: &AppConfig) -> Option<FetchHandle> {
    let fetch_config = match FetchConfig::from_feed_config(&config.feed) {
        Ok(fetch_config) => fetch_config,
        Err(err) => {
            error!(%err, "news fetch not started");
            return None;
        }
    };
    let client = match ClientBuilder::new()
        .redirect(redirect::Policy::limited(5))
        .user_agent("NewsViewer/0.1")
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            error!(%err, "failed to build HTTP client");
            return None;
        }
    };

    let _guard = runtime.enter();
    Some(spawn_fetch(state.clone(), client, fetch_config))
}
