// src/videos/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of portfolio categories. Labels the aggregator does not know
/// land in `Uncategorized`: they stay visible in the "all" view and filter as
/// their own bucket instead of silently disappearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "PUBS & BRAND CONTENT")]
    Brand,
    #[serde(rename = "EMISSIONS & DOCS")]
    Docs,
    #[serde(rename = "BANDES-ANNONCES")]
    Trailers,
    #[serde(rename = "FICTIONS")]
    Fiction,
    #[serde(other, rename = "UNCATEGORIZED")]
    Uncategorized,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Brand => "PUBS & BRAND CONTENT",
            Category::Docs => "EMISSIONS & DOCS",
            Category::Trailers => "BANDES-ANNONCES",
            Category::Fiction => "FICTIONS",
            Category::Uncategorized => "UNCATEGORIZED",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "PUBS & BRAND CONTENT" => Category::Brand,
            "EMISSIONS & DOCS" => Category::Docs,
            "BANDES-ANNONCES" => Category::Trailers,
            "FICTIONS" => Category::Fiction,
            _ => Category::Uncategorized,
        }
    }
}

/// Where a record came from: the aggregated video platform, or a manually
/// curated external entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Youtube,
    Curated,
}

/// The unit the aggregator produces and the UI consumes. Immutable once
/// built; a whole batch is replaced atomically when the cache refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub category: Category,
    /// Empty string when the source has no usable thumbnail variant.
    pub thumbnail: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub source: SourceOrigin,
}
