//! # Playback Engine
//!
//! Per-guild audio playback queue and status state machine, driven by
//! transport status events and mutated by the music command handlers.
//!
//! All mutations of one guild's state go through a single async mutex, so
//! `enqueue`, the idle callback and `skip`/`stop` never interleave
//! inconsistently. Different guilds are fully independent.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.2.0: skip discards the idle event its own transport stop generates
//! - 1.1.0: Queue is strictly FIFO; stop suppresses racing idle auto-advance
//! - 1.0.0: Initial implementation

pub mod discord;
pub mod provider;
pub mod track;
pub mod transport;
pub mod youtube;

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use log::{debug, error};
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use track::Track;
use transport::{AudioTransport, TransportEvent, TransportFactory};

/// Playback status of one guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// No resource to play (initial state)
    Idle,
    /// Waiting for the resource to become playable
    Buffering,
    Playing,
    Paused,
    /// Stopped by the user; suppresses auto-advance on a racing idle event
    Stopped,
}

struct PlayerState {
    queue: VecDeque<Track>,
    current: Option<Track>,
    status: PlayerStatus,
    /// Idle events owed to skip-issued transport stops. The transport
    /// reports a halted track as ended; skip has already advanced past it,
    /// so that idle event must be discarded instead of advancing again.
    suppressed_idles: u32,
}

/// One guild's playback state machine.
pub struct Player {
    guild_id: u64,
    transport: Arc<dyn AudioTransport>,
    state: Mutex<PlayerState>,
}

impl Player {
    pub fn new(guild_id: u64, transport: Arc<dyn AudioTransport>) -> Self {
        Self {
            guild_id,
            transport,
            state: Mutex::new(PlayerState {
                queue: VecDeque::new(),
                current: None,
                status: PlayerStatus::Idle,
                suppressed_idles: 0,
            }),
        }
    }

    pub fn guild_id(&self) -> u64 {
        self.guild_id
    }

    /// Append a track; start it immediately if nothing is playing.
    ///
    /// Arrival order is preserved: the oldest queued track always plays
    /// first.
    pub async fn enqueue(&self, track: Track) {
        let mut state = self.state.lock().await;
        state.queue.push_back(track);
        if state.current.is_none() {
            if let Some(next) = state.queue.pop_front() {
                self.start_track(&mut state, next).await;
            }
        }
    }

    /// Single playback attempt for one track.
    ///
    /// Stream-acquisition or output failures clear the current track and
    /// leave the queue intact; there is no retry.
    async fn start_track(&self, state: &mut PlayerState, track: Track) {
        let stream = match track.source.acquire().await {
            Ok(stream) => stream,
            Err(e) => {
                error!(
                    "Failed to acquire stream for \"{}\" in guild {}: {e}",
                    track.title, self.guild_id
                );
                state.current = None;
                return;
            }
        };

        match self.transport.play(stream).await {
            Ok(()) => {
                debug!("Now playing \"{}\" in guild {}", track.title, self.guild_id);
                state.current = Some(track);
            }
            Err(e) => {
                error!(
                    "Transport failed to play \"{}\" in guild {}: {e}",
                    track.title, self.guild_id
                );
                state.current = None;
            }
        }
    }

    /// Entry point for transport status callbacks.
    pub async fn handle_transport_event(&self, event: TransportEvent) {
        let mut state = self.state.lock().await;
        match event {
            TransportEvent::Buffering => state.status = PlayerStatus::Buffering,
            TransportEvent::Playing => state.status = PlayerStatus::Playing,
            TransportEvent::Paused => state.status = PlayerStatus::Paused,
            TransportEvent::Idle => {
                // End report for a track skip already advanced past.
                if state.suppressed_idles > 0 {
                    state.suppressed_idles -= 1;
                    return;
                }
                // Nothing was ever played; ignore.
                if state.current.is_none() {
                    return;
                }
                // The Stopped check keeps an in-flight idle event that races
                // a user-issued stop from resurrecting playback.
                if !state.queue.is_empty() && state.status != PlayerStatus::Stopped {
                    if let Some(next) = state.queue.pop_front() {
                        self.start_track(&mut state, next).await;
                    }
                } else {
                    state.current = None;
                    state.status = PlayerStatus::Idle;
                }
            }
        }
    }

    pub async fn pause(&self) -> Result<()> {
        self.transport.pause().await
    }

    pub async fn resume(&self) -> Result<()> {
        self.transport.resume().await
    }

    /// Stop output and suppress any subsequent auto-advance.
    pub async fn stop(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.status = PlayerStatus::Stopped;
        self.transport.stop().await
    }

    /// Force the transition a track-end would cause: halt current output
    /// and advance to the next queued track, or go idle.
    pub async fn skip(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let was_playing = state.current.take().is_some();
        self.transport.stop().await?;
        if state.status != PlayerStatus::Stopped {
            if let Some(next) = state.queue.pop_front() {
                self.start_track(&mut state, next).await;
                // The stop above makes the transport report the old track
                // as ended. That idle event arrives after this lock is
                // released, when the new track is already current, so it
                // must be discarded or it would advance a second time.
                if was_playing && state.current.is_some() {
                    state.suppressed_idles += 1;
                }
            } else {
                state.status = PlayerStatus::Idle;
            }
        }
        Ok(())
    }

    /// Adjust output gain. Range validation happens at the command layer.
    pub async fn set_volume(&self, factor: f32) -> Result<()> {
        self.transport.set_volume(factor).await
    }

    pub async fn status(&self) -> PlayerStatus {
        self.state.lock().await.status
    }

    pub async fn queue_len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    pub async fn current_title(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .current
            .as_ref()
            .map(|t| t.title.clone())
    }
}

/// Guild id to player map, shared across concurrent command invocations.
///
/// Entries are created on first play and retained for the process lifetime.
#[derive(Default)]
pub struct PlayerRegistry {
    players: DashMap<u64, Arc<Player>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, guild_id: u64) -> Option<Arc<Player>> {
        self.players.get(&guild_id).map(|p| Arc::clone(&p))
    }

    /// Get the guild's player, connecting a transport and spawning its
    /// event-forwarding task on first use.
    pub async fn get_or_connect(
        &self,
        guild_id: u64,
        channel_id: u64,
        factory: &dyn TransportFactory,
    ) -> Result<Arc<Player>> {
        if let Some(player) = self.get(guild_id) {
            return Ok(player);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let transport = factory.connect(guild_id, channel_id, tx).await?;
        let player = Arc::new(Player::new(guild_id, transport));

        // A concurrent connect for the same guild may have won the race;
        // keep whichever entry landed first. The loser's forwarding task
        // exits as soon as its weak handle dies.
        let player = self
            .players
            .entry(guild_id)
            .or_insert(player)
            .value()
            .clone();

        let weak = Arc::downgrade(&player);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(player) = weak.upgrade() else { break };
                player.handle_transport_event(event).await;
            }
        });

        Ok(player)
    }
}
