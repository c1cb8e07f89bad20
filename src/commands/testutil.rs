//! Shared test doubles for command handler tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use super::context::CommandContext;
use super::invocation::{Invocation, Invoker, Replier};
use crate::permissions::PermissionStore;
use crate::player::provider::MediaProvider;
use crate::player::track::{AudioStream, StreamSource, Track};
use crate::player::transport::{AudioTransport, TransportEvent, TransportFactory};

/// Records every reply, defer and edit it receives.
#[derive(Default)]
pub struct RecordingReplier {
    pub replies: Mutex<Vec<(String, bool)>>,
    pub defers: Mutex<Vec<bool>>,
    pub edits: Mutex<Vec<String>>,
}

#[async_trait]
impl Replier for RecordingReplier {
    async fn reply(&self, content: &str, ephemeral: bool) -> Result<()> {
        self.replies.lock().push((content.to_string(), ephemeral));
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> Result<()> {
        self.defers.lock().push(ephemeral);
        Ok(())
    }

    async fn edit(&self, content: &str) -> Result<()> {
        self.edits.lock().push(content.to_string());
        Ok(())
    }
}

/// Provider returning a canned search result.
pub struct StubProvider {
    pub result: Option<Track>,
}

#[async_trait]
impl MediaProvider for StubProvider {
    async fn search(&self, _query: &str) -> Result<Option<Track>> {
        Ok(self.result.clone())
    }
}

struct FixedSource {
    url: String,
}

#[async_trait]
impl StreamSource for FixedSource {
    async fn acquire(&self) -> Result<AudioStream> {
        Ok(AudioStream {
            url: self.url.clone(),
        })
    }
}

pub fn fixed_track(title: &str, url: &str) -> Track {
    Track {
        id: url.to_string(),
        title: title.to_string(),
        description: String::new(),
        channel: "test".to_string(),
        thumbnail: String::new(),
        published_at: None,
        duration_secs: 180,
        source: Arc::new(FixedSource {
            url: url.to_string(),
        }),
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    pub played: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl AudioTransport for RecordingTransport {
    async fn play(&self, stream: AudioStream) -> Result<()> {
        self.played.lock().push(stream.url);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.calls.lock().push("pause".into());
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        self.calls.lock().push("resume".into());
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.calls.lock().push("stop".into());
        Ok(())
    }

    async fn set_volume(&self, factor: f32) -> Result<()> {
        self.calls.lock().push(format!("volume:{factor}"));
        Ok(())
    }
}

/// Factory handing out one shared recording transport.
pub struct StubFactory {
    pub transport: Arc<RecordingTransport>,
    pub connections: Mutex<Vec<(u64, u64)>>,
}

impl StubFactory {
    pub fn new() -> Self {
        Self {
            transport: Arc::new(RecordingTransport::default()),
            connections: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TransportFactory for StubFactory {
    async fn connect(
        &self,
        guild_id: u64,
        channel_id: u64,
        _events: UnboundedSender<TransportEvent>,
    ) -> Result<Arc<dyn AudioTransport>> {
        self.connections.lock().push((guild_id, channel_id));
        Ok(self.transport.clone())
    }
}

pub fn context(
    provider: Arc<dyn MediaProvider>,
    transports: Arc<dyn TransportFactory>,
    permissions_toml: &str,
) -> Arc<CommandContext> {
    let store = PermissionStore::new();
    store.load_str(permissions_toml).expect("fixture parses");
    Arc::new(CommandContext::new(
        store,
        provider,
        transports,
        PathBuf::from("/nonexistent/permissions.toml"),
    ))
}

/// Invocation with sensible defaults; callers mutate fields as needed.
pub fn invocation(command: &str) -> (Invocation, Arc<RecordingReplier>) {
    let replier = Arc::new(RecordingReplier::default());
    let invocation = Invocation {
        command: command.to_string(),
        invoker: Invoker {
            id: "u1".to_string(),
            username: "tester".to_string(),
            is_bot: false,
        },
        guild_id: Some(100),
        channel_id: Some(200),
        voice_channel_id: None,
        args: HashMap::new(),
        replier: replier.clone(),
    };
    (invocation, replier)
}
