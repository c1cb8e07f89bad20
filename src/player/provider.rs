//! Media provider boundary
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use anyhow::Result;
use async_trait::async_trait;

use super::track::Track;

/// Video search/stream provider.
///
/// `search` returns the best match for a free-text query, or `None` when
/// the provider has no result. Network-bound; no timeout is applied here.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Option<Track>>;
}
