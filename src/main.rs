//! Newswire Relay — Binary Entrypoint
//! Boots the Axum HTTP server: config, Slack notifier, metrics, routes.
//!
//! See `README.md` for quickstart.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newswire_relay::api::{self, AppState};
use newswire_relay::config::RelayConfig;
use newswire_relay::metrics::Metrics;
use newswire_relay::notify::slack::SlackNotifier;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - RELAY_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("RELAY_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("newswire_relay=debug,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = RelayConfig::load().expect("Failed to load relay config");
    let notifier = Arc::new(SlackNotifier::new(config.slack_webhook.clone()));

    let metrics = Metrics::init();
    let state = AppState::new(config, notifier);
    let router = api::create_router(state).merge(metrics.router());

    Ok(router.into())
}
