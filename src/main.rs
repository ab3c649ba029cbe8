//! Portfolio backend — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

mod api;
mod config;
mod contact;
mod metrics;
mod ratelimit;
mod videos;

use std::time::Duration;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - PORTFOLIO_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("PORTFOLIO_DEV_LOG")
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
        .unwrap_or_else(|_| EnvFilter::new("portfolio_api=info,warn"));

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

    let config = AppConfig::from_env();
    if config.youtube_api_key.is_none() {
        tracing::warn!("YOUTUBE_API_KEY not set; /videos will report a configuration error");
    }
    if config.resend_api_key.is_none() {
        tracing::warn!("RESEND_API_KEY not set; /contact will report a configuration error");
    }

    let metrics_router = metrics::install(config.cache_ttl.as_secs());

    let state = api::AppState::from_config(&config);

    // Hourly housekeeping for the rate-limit map.
    ratelimit::spawn_sweeper(state.limiter.clone(), Duration::from_secs(3_600));

    let router = api::create_router(state).merge(metrics_router);

    Ok(router.into())
}
