//! Audio transport boundary
//!
//! The voice connection and audio encoding live behind these traits; the
//! playback engine only sees status events and control calls.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::track::AudioStream;

/// Playback status notifications emitted by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// No resource is playing (also fired when a track ends)
    Idle,
    /// Waiting for a resource to become playable
    Buffering,
    /// Actively playing
    Playing,
    /// Paused by the user
    Paused,
}

/// Control surface of one guild's voice output.
#[async_trait]
pub trait AudioTransport: Send + Sync {
    /// Begin output of a new stream, replacing any current one.
    async fn play(&self, stream: AudioStream) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn resume(&self) -> Result<()>;

    /// Halt output. A track halted while playing is reported as ended
    /// through the event sink, the same as a natural end. Does not cancel
    /// an in-flight stream acquisition.
    async fn stop(&self) -> Result<()>;

    /// Adjust output gain. `factor` is normalized: 1.0 is 100%.
    async fn set_volume(&self, factor: f32) -> Result<()>;
}

/// Creates a transport bound to one guild's voice channel.
///
/// Status events for the connection are delivered through `events`; the
/// player registry forwards them into the owning player.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn connect(
        &self,
        guild_id: u64,
        channel_id: u64,
        events: UnboundedSender<TransportEvent>,
    ) -> Result<Arc<dyn AudioTransport>>;
}
