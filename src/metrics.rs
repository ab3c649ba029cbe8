//! Prometheus wiring: recorder install, series registration, `/metrics` route.

use axum::{routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Register the service's series up front so they show up on `/metrics`
/// before their first increment.
fn describe_series() {
    describe_counter!(
        "videos_fetched_total",
        "Records projected from playlist sources."
    );
    describe_counter!(
        "videos_cache_hits_total",
        "Aggregation calls answered from the cache slot."
    );
    describe_counter!(
        "videos_provider_errors_total",
        "Playlist source fetch/parse failures."
    );
    describe_counter!("contact_sent_total", "Contact messages delivered.");
    describe_counter!(
        "rate_limited_total",
        "Requests denied by the fixed-window limiter."
    );
}

/// Install the Prometheus recorder and return the `/metrics` router. Called
/// once at boot, before any handler can record.
pub fn install(cache_ttl_secs: u64) -> Router {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("prometheus: install recorder");

    describe_series();

    // Static gauge so dashboards can see the configured TTL.
    gauge!("videos_cache_ttl_secs").set(cache_ttl_secs as f64);

    Router::new().route(
        "/metrics",
        get(move || {
            let h = handle.clone();
            async move { h.render() }
        }),
    )
}
