pub mod youtube;

use anyhow::Result;
use async_trait::async_trait;

use super::types::VideoRecord;
use super::PlaylistSource;

/// Manually curated entries (external hosts, client deliveries that never hit
/// the platform). Records are built ahead of time; fetching is a no-op copy.
pub struct CuratedListSource {
    records: Vec<VideoRecord>,
}

impl CuratedListSource {
    pub fn new(records: Vec<VideoRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl PlaylistSource for CuratedListSource {
    async fn fetch_latest(&self) -> Result<Vec<VideoRecord>> {
        Ok(self.records.clone())
    }

    fn name(&self) -> &'static str {
        "curated"
    }
}
