use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Deserialize;

use crate::videos::types::{Category, SourceOrigin, VideoRecord};
use crate::videos::PlaylistSource;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3/playlistItems";
const MAX_RESULTS: u32 = 50;

// Only the slice of the playlistItems payload we project from.
#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    snippet: Snippet,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(rename = "resourceId")]
    resource_id: ResourceId,
    title: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(rename = "videoPublishedAt")]
    video_published_at: Option<String>,
}

/// One configured playlist collection. Every record it yields is tagged with
/// the collection's category.
pub struct YoutubePlaylistSource {
    client: reqwest::Client,
    api_key: String,
    playlist_id: String,
    category: Category,
}

impl YoutubePlaylistSource {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        playlist_id: String,
        category: Category,
    ) -> Self {
        Self {
            client,
            api_key,
            playlist_id,
            category,
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{API_BASE}?part=snippet,contentDetails&maxResults={MAX_RESULTS}\
             &playlistId={}&key={}",
            self.playlist_id, self.api_key
        )
    }
}

/// Parse one playlistItems body into records. Pure so fixtures can exercise
/// it without HTTP. A malformed publish timestamp never drops the batch, the
/// record falls back to the epoch and sorts last.
pub fn parse_playlist_response(body: &str, category: Category) -> Result<Vec<VideoRecord>> {
    let resp: PlaylistResponse =
        serde_json::from_str(body).context("parsing youtube playlistItems json")?;

    let mut out = Vec::with_capacity(resp.items.len());
    for item in resp.items {
        let video_id = item.snippet.resource_id.video_id;
        if video_id.is_empty() {
            continue;
        }

        // Prefer the high-resolution variant, fall back, then empty.
        let thumbnail = item
            .snippet
            .thumbnails
            .as_ref()
            .and_then(|t| t.maxres.as_ref().or(t.high.as_ref()))
            .map(|t| t.url.clone())
            .unwrap_or_default();

        let published_at = item
            .content_details
            .as_ref()
            .and_then(|cd| cd.video_published_at.as_deref())
            .map(parse_rfc3339_or_epoch)
            .unwrap_or(DateTime::UNIX_EPOCH);

        out.push(VideoRecord {
            link: format!("https://www.youtube.com/watch?v={video_id}"),
            id: video_id,
            title: item.snippet.title,
            category,
            thumbnail,
            published_at,
            source: SourceOrigin::Youtube,
        });
    }

    counter!("videos_fetched_total").increment(out.len() as u64);
    Ok(out)
}

fn parse_rfc3339_or_epoch(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[async_trait]
impl PlaylistSource for YoutubePlaylistSource {
    async fn fetch_latest(&self) -> Result<Vec<VideoRecord>> {
        let resp = self
            .client
            .get(self.request_url())
            .send()
            .await
            .context("youtube playlistItems get()")?;
        let resp = resp
            .error_for_status()
            .context("youtube playlistItems status")?;
        let body = resp.text().await.context("youtube playlistItems .text()")?;
        parse_playlist_response(&body, self.category)
    }

    fn name(&self) -> &'static str {
        self.category.label()
    }
}
