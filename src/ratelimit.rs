//! Fixed-window rate limiting keyed by a best-effort client identifier.
//!
//! One counter per identifier: first request (or first after the window
//! elapses) opens a fresh window; inside the window requests increment up to
//! the limit and are denied past it. A background sweep drops expired
//! counters so the map does not grow without bound — a stale entry is
//! harmless either way, its next request resets it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use metrics::counter;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    count: u32,
    window_resets_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    counters: Mutex<HashMap<String, WindowCounter>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the request is within quota. Always answers; there
    /// is no error path.
    pub fn allow(&self, identifier: &str, limit: u32, window: Duration) -> bool {
        self.allow_at(Utc::now(), identifier, limit, window)
    }

    /// Clock-injected variant used by `allow` and by tests.
    pub fn allow_at(
        &self,
        now: DateTime<Utc>,
        identifier: &str,
        limit: u32,
        window: Duration,
    ) -> bool {
        let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::zero());
        let mut counters = self.counters.lock().expect("rate limit mutex poisoned");

        match counters.get_mut(identifier) {
            // Arriving exactly at the reset instant opens a fresh window.
            Some(entry) if now < entry.window_resets_at => {
                if entry.count < limit {
                    entry.count += 1;
                    true
                } else {
                    counter!("rate_limited_total").increment(1);
                    false
                }
            }
            _ => {
                counters.insert(
                    identifier.to_string(),
                    WindowCounter {
                        count: 1,
                        window_resets_at: now + window,
                    },
                );
                true
            }
        }
    }

    /// Drops every counter whose window has already elapsed.
    pub fn sweep_at(&self, now: DateTime<Utc>) {
        let mut counters = self.counters.lock().expect("rate limit mutex poisoned");
        counters.retain(|_, entry| now < entry.window_resets_at);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.counters.lock().unwrap().len()
    }
}

/// Spawn the hourly housekeeping sweep. Best-effort: correctness never
/// depends on it having run.
pub fn spawn_sweeper(
    limiter: std::sync::Arc<RateLimiter>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // First tick fires immediately; skip it so boot is quiet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.sweep_at(Utc::now());
            tracing::debug!(target: "ratelimit", "swept expired rate limit windows");
        }
    })
}

/// Best-effort client identifier: first hop of `x-forwarded-for`, trimmed.
/// Spoofable and coarse behind shared NATs; accepted behavior for a public
/// portfolio site.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
