//! Songbird-backed audio transport
//!
//! Production implementation of the transport boundary: joins the guild's
//! voice channel through songbird and maps its track events back into
//! [`TransportEvent`]s.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::tracks::TrackHandle;
use songbird::{Call, Event, EventContext, Songbird, TrackEvent};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;

use super::track::AudioStream;
use super::transport::{AudioTransport, TransportEvent, TransportFactory};

/// Creates songbird transports bound to guild voice channels.
pub struct VoiceTransportFactory {
    manager: Arc<Songbird>,
}

impl VoiceTransportFactory {
    pub fn new(manager: Arc<Songbird>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl TransportFactory for VoiceTransportFactory {
    async fn connect(
        &self,
        guild_id: u64,
        channel_id: u64,
        events: UnboundedSender<TransportEvent>,
    ) -> Result<Arc<dyn AudioTransport>> {
        let (call, join) = self
            .manager
            .join(GuildId(guild_id), ChannelId(channel_id))
            .await;
        join.map_err(|e| anyhow!("failed to join voice channel {channel_id}: {e}"))?;

        Ok(Arc::new(SongbirdTransport {
            call,
            handle: Mutex::new(None),
            volume: Mutex::new(1.0),
            events,
        }))
    }
}

struct SongbirdTransport {
    call: Arc<Mutex<Call>>,
    /// Handle of the track currently owned by the driver, if any
    handle: Mutex<Option<TrackHandle>>,
    /// Last requested gain, applied to each new track
    volume: Mutex<f32>,
    events: UnboundedSender<TransportEvent>,
}

#[async_trait]
impl AudioTransport for SongbirdTransport {
    async fn play(&self, stream: AudioStream) -> Result<()> {
        // The driver has no explicit buffering event; report it while the
        // decoder spins up, the Play track event follows once audio flows.
        let _ = self.events.send(TransportEvent::Buffering);

        let source = songbird::input::ffmpeg(&stream.url)
            .await
            .map_err(|e| anyhow!("failed to open audio stream: {e:?}"))?;

        let new_handle = {
            let mut call = self.call.lock().await;
            call.play_only_source(source)
        };

        new_handle
            .set_volume(*self.volume.lock().await)
            .map_err(|e| anyhow!("failed to set initial volume: {e:?}"))?;

        for (track_event, transport_event) in [
            (TrackEvent::Play, TransportEvent::Playing),
            (TrackEvent::Pause, TransportEvent::Paused),
            (TrackEvent::End, TransportEvent::Idle),
        ] {
            new_handle
                .add_event(
                    Event::Track(track_event),
                    TrackNotifier {
                        events: self.events.clone(),
                        event: transport_event,
                    },
                )
                .map_err(|e| anyhow!("failed to attach track event: {e:?}"))?;
        }

        *self.handle.lock().await = Some(new_handle);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        if let Some(handle) = self.handle.lock().await.as_ref() {
            handle
                .pause()
                .map_err(|e| anyhow!("failed to pause track: {e:?}"))?;
        }
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        if let Some(handle) = self.handle.lock().await.as_ref() {
            handle
                .play()
                .map_err(|e| anyhow!("failed to resume track: {e:?}"))?;
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        if let Some(handle) = self.handle.lock().await.take() {
            handle
                .stop()
                .map_err(|e| anyhow!("failed to stop track: {e:?}"))?;
        }
        Ok(())
    }

    async fn set_volume(&self, factor: f32) -> Result<()> {
        *self.volume.lock().await = factor;
        if let Some(handle) = self.handle.lock().await.as_ref() {
            handle
                .set_volume(factor)
                .map_err(|e| anyhow!("failed to set volume: {e:?}"))?;
        }
        Ok(())
    }
}

/// Forwards one songbird track event as a transport event.
struct TrackNotifier {
    events: UnboundedSender<TransportEvent>,
    event: TransportEvent,
}

#[async_trait]
impl songbird::EventHandler for TrackNotifier {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        let _ = self.events.send(self.event);
        None
    }
}
