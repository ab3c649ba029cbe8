// src/videos/mod.rs
//! Playlist aggregation: fan out to every configured source, fold the
//! successes into one batch sorted by publish date, serve it from a
//! single-slot TTL cache.

pub mod cache;
pub mod providers;
pub mod types;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use tokio::task::JoinSet;

use cache::VideoCache;
use types::VideoRecord;

/// One external playlist collection. The aggregator depends only on this
/// seam; adding a source means adding an adapter, not touching the merge.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<VideoRecord>>;
    fn name(&self) -> &'static str;
}

/// Whether a call was answered from the cache or by a fresh fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    Cache,
    Fresh,
}

#[derive(Debug)]
pub enum AggregateError {
    /// Feed credential absent; reported before any upstream call.
    MissingApiKey,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateError::MissingApiKey => write!(f, "video feed API key not configured"),
        }
    }
}

impl std::error::Error for AggregateError {}

pub struct Aggregator {
    sources: Vec<Arc<dyn PlaylistSource>>,
    cache: VideoCache,
    configured: bool,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn PlaylistSource>>, cache_ttl: Duration) -> Self {
        Self {
            sources,
            cache: VideoCache::new(cache_ttl),
            configured: true,
        }
    }

    /// Builds the production source set: one YouTube adapter per configured
    /// collection. Without a credential the aggregator still constructs, but
    /// every call reports `MissingApiKey` until the process restarts with one.
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        let Some(api_key) = config.youtube_api_key.clone() else {
            return Self {
                sources: Vec::new(),
                cache: VideoCache::new(config.cache_ttl),
                configured: false,
            };
        };

        let client = reqwest::Client::new();
        let sources: Vec<Arc<dyn PlaylistSource>> = crate::config::playlist_collections()
            .into_iter()
            .map(|(category, playlist_id)| {
                Arc::new(providers::youtube::YoutubePlaylistSource::new(
                    client.clone(),
                    api_key.clone(),
                    playlist_id.to_string(),
                    category,
                )) as Arc<dyn PlaylistSource>
            })
            .collect();

        Self::new(sources, config.cache_ttl)
    }

    pub async fn get_videos(&self) -> Result<(Vec<VideoRecord>, FetchOrigin), AggregateError> {
        self.get_videos_at(Utc::now()).await
    }

    /// Clock-injected variant: tests drive TTL expiry without sleeping.
    pub async fn get_videos_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(Vec<VideoRecord>, FetchOrigin), AggregateError> {
        if let Some(videos) = self.cache.get_if_fresh(now) {
            counter!("videos_cache_hits_total").increment(1);
            return Ok((videos, FetchOrigin::Cache));
        }

        // Missing credential must not disturb a still-valid cache entry, so
        // the check sits after the cache lookup.
        if !self.configured {
            return Err(AggregateError::MissingApiKey);
        }

        let videos = self.fan_out_and_merge().await;
        self.cache.store(videos.clone(), now);
        Ok((videos, FetchOrigin::Fresh))
    }

    /// Gather every source's outcome concurrently, fold only the successes.
    /// One broken upstream degrades coverage, never the whole listing.
    async fn fan_out_and_merge(&self) -> Vec<VideoRecord> {
        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            tasks.spawn(async move {
                let name = source.name();
                (name, source.fetch_latest().await)
            });
        }

        let mut merged = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(mut records))) => merged.append(&mut records),
                Ok((name, Err(e))) => {
                    tracing::warn!(source = name, error = ?e, "playlist source failed");
                    counter!("videos_provider_errors_total").increment(1);
                }
                Err(e) => {
                    tracing::warn!(error = ?e, "playlist fetch task panicked");
                    counter!("videos_provider_errors_total").increment(1);
                }
            }
        }

        sort_by_publish_date(&mut merged);
        merged
    }
}

/// Most recent first. Ties keep no particular order; upstream gives no
/// tie-break semantics.
pub fn sort_by_publish_date(videos: &mut [VideoRecord]) {
    videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
