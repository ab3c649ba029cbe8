//! Runtime configuration, resolved once at startup from the environment.
//!
//! Secrets stay `Option<String>`: a missing credential must not prevent the
//! process from booting, it surfaces as a configuration error on the endpoint
//! that needs it. `.env` loading happens in `main` via dotenvy before this
//! module is consulted.

use std::time::Duration;

pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_RESEND_API_KEY: &str = "RESEND_API_KEY";
pub const ENV_CONTACT_TO: &str = "CONTACT_EMAIL_TO";
pub const ENV_CACHE_TTL_SECS: &str = "VIDEO_CACHE_TTL_SECS";

const DEFAULT_CONTACT_TO: &str = "contact@portfolio.jeanlanot.com";
const DEFAULT_CONTACT_FROM: &str = "Jean Lanot Portfolio <contact@portfolio.jeanlanot.com>";
const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;

/// Per-route fixed-window quotas.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub videos_limit: u32,
    pub contact_limit: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            videos_limit: 30,
            contact_limit: 5,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub resend_api_key: Option<String>,
    pub contact_to: String,
    pub contact_from: String,
    pub cache_ttl: Duration,
    pub limits: RateLimitPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let limits = RateLimitPolicy {
            videos_limit: env_parse("RATE_LIMIT_VIDEOS", 30),
            contact_limit: env_parse("RATE_LIMIT_CONTACT", 5),
            window: Duration::from_secs(env_parse("RATE_LIMIT_WINDOW_SECS", 60)),
        };

        Self {
            youtube_api_key: env_non_empty(ENV_YOUTUBE_API_KEY),
            resend_api_key: env_non_empty(ENV_RESEND_API_KEY),
            contact_to: env_non_empty(ENV_CONTACT_TO)
                .unwrap_or_else(|| DEFAULT_CONTACT_TO.to_string()),
            contact_from: env_non_empty("CONTACT_EMAIL_FROM")
                .unwrap_or_else(|| DEFAULT_CONTACT_FROM.to_string()),
            cache_ttl: Duration::from_secs(env_parse(
                ENV_CACHE_TTL_SECS,
                DEFAULT_CACHE_TTL_SECS,
            )),
            limits,
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// The fixed set of curated playlist collections served by the aggregator.
/// Label doubles as the category tag on every record the source yields.
pub fn playlist_collections() -> Vec<(crate::videos::types::Category, &'static str)> {
    use crate::videos::types::Category;
    vec![
        (Category::Brand, "PLikZKcR_ooRCVFgNcJ-f8GDN-rO8HYM0F"),
        (Category::Docs, "PLikZKcR_ooRAYr18pyDSFHFhBUUN9kQOf"),
        (Category::Trailers, "PLikZKcR_ooRBcDzII69qz11FoZOk5-Lh8"),
        (Category::Fiction, "PLikZKcR_ooRBvbYlqu2rHz4-oge2Qps4a"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[serial_test::serial]
    #[test]
    fn missing_secrets_become_none_not_errors() {
        std::env::remove_var(ENV_YOUTUBE_API_KEY);
        std::env::remove_var(ENV_RESEND_API_KEY);
        std::env::remove_var(ENV_CONTACT_TO);
        let cfg = AppConfig::from_env();
        assert!(cfg.youtube_api_key.is_none());
        assert!(cfg.resend_api_key.is_none());
        assert_eq!(cfg.contact_to, DEFAULT_CONTACT_TO);
    }

    #[serial_test::serial]
    #[test]
    fn blank_env_values_are_treated_as_absent() {
        std::env::set_var(ENV_YOUTUBE_API_KEY, "   ");
        let cfg = AppConfig::from_env();
        assert!(cfg.youtube_api_key.is_none());
        std::env::remove_var(ENV_YOUTUBE_API_KEY);
    }

    #[serial_test::serial]
    #[test]
    fn ttl_and_limits_parse_with_defaults() {
        std::env::remove_var(ENV_CACHE_TTL_SECS);
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.cache_ttl, Duration::from_secs(3_600));

        std::env::set_var(ENV_CACHE_TTL_SECS, "21600");
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.cache_ttl, Duration::from_secs(21_600));
        std::env::remove_var(ENV_CACHE_TTL_SECS);
    }
}
