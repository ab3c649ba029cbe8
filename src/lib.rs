// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod contact;
pub mod metrics;
pub mod ratelimit;
pub mod videos;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::videos::types::{Category, SourceOrigin, VideoRecord};
pub use crate::videos::{Aggregator, FetchOrigin, PlaylistSource};
