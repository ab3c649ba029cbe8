// src/videos/cache.rs
//
// Single-slot TTL cache for the aggregated batch. The slot is replaced
// wholesale on every successful aggregation; racing refreshes are
// last-write-wins, which is harmless for idempotent inputs.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::types::VideoRecord;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub videos: Vec<VideoRecord>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct VideoCache {
    slot: Mutex<Option<CacheEntry>>,
    ttl: chrono::Duration,
}

impl VideoCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
        }
    }

    /// Returns the cached batch while its age is strictly below the TTL.
    pub fn get_if_fresh(&self, now: DateTime<Utc>) -> Option<Vec<VideoRecord>> {
        let slot = self.slot.lock().expect("video cache mutex poisoned");
        slot.as_ref()
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| entry.videos.clone())
    }

    /// Overwrites the slot with a new full batch.
    pub fn store(&self, videos: Vec<VideoRecord>, now: DateTime<Utc>) {
        let mut slot = self.slot.lock().expect("video cache mutex poisoned");
        *slot = Some(CacheEntry {
            videos,
            fetched_at: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::videos::types::{Category, SourceOrigin};

    fn record(id: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: "t".into(),
            category: Category::Fiction,
            thumbnail: String::new(),
            link: format!("https://www.youtube.com/watch?v={id}"),
            published_at: Utc::now(),
            source: SourceOrigin::Youtube,
        }
    }

    #[test]
    fn empty_slot_misses() {
        let cache = VideoCache::new(Duration::from_secs(3600));
        assert!(cache.get_if_fresh(Utc::now()).is_none());
    }

    #[test]
    fn fresh_entry_hits_until_ttl_elapses() {
        let cache = VideoCache::new(Duration::from_secs(3600));
        let t0 = Utc::now();
        cache.store(vec![record("a")], t0);

        let hit = cache.get_if_fresh(t0 + chrono::Duration::seconds(3599));
        assert_eq!(hit.unwrap().len(), 1);

        assert!(cache
            .get_if_fresh(t0 + chrono::Duration::seconds(3600))
            .is_none());
    }

    #[test]
    fn store_replaces_rather_than_merges() {
        let cache = VideoCache::new(Duration::from_secs(3600));
        let t0 = Utc::now();
        cache.store(vec![record("a"), record("b")], t0);
        cache.store(vec![record("c")], t0);

        let batch = cache.get_if_fresh(t0).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "c");
    }
}
