//! Track metadata and lazy stream acquisition
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A playable audio resource: a resolved direct stream URL the transport
/// can feed to its decoder.
#[derive(Debug, Clone)]
pub struct AudioStream {
    pub url: String,
}

/// Lazily-invoked stream acquisition for one track.
///
/// Acquisition is a single attempt; a failure terminates the current track
/// attempt only and is never retried automatically.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn acquire(&self) -> Result<AudioStream>;
}

/// One searchable, playable track.
#[derive(Clone)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel: String,
    pub thumbnail: String,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_secs: u64,
    pub source: Arc<dyn StreamSource>,
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("channel", &self.channel)
            .field("duration_secs", &self.duration_secs)
            .finish()
    }
}
