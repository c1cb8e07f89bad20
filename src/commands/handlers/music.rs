//! # Music Commands
//!
//! The playback surface: /play, /pause, /resume, /stop, /skip and /volume.
//! Each handler validates its own preconditions and replies with an
//! ephemeral notice when they fail; only /play talks to the provider.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::Invocation;
use crate::commands::registry::CommandRegistry;
use crate::commands::spec::{ArgumentKind, ArgumentSpec, CommandSpec, GuardSpec};
use crate::player::{Player, PlayerStatus};

const VOICE_REQUIRED: &str = "❌ **You must be in a voice channel to use this command.**";
const NO_PLAYBACK: &str = "❌ **No music is currently playing.**";

pub fn register(registry: &mut CommandRegistry) {
    registry.register(CommandSpec {
        name: "play",
        description: "🎸 Play a music",
        arguments: vec![ArgumentSpec {
            name: "query",
            description: "The search to perform",
            required: true,
            kind: ArgumentKind::String,
        }],
        guard: GuardSpec::default(),
        handler: Arc::new(PlayHandler),
    });
    registry.register(CommandSpec {
        name: "pause",
        description: "🎵 Pause the music that is currently playing",
        arguments: Vec::new(),
        guard: GuardSpec::default(),
        handler: Arc::new(PauseHandler),
    });
    registry.register(CommandSpec {
        name: "resume",
        description: "🎵 Resume the music that is currently paused",
        arguments: Vec::new(),
        guard: GuardSpec::default(),
        handler: Arc::new(ResumeHandler),
    });
    registry.register(CommandSpec {
        name: "stop",
        description: "🎵 Stop the current music and halt the player",
        arguments: Vec::new(),
        guard: GuardSpec::default(),
        handler: Arc::new(StopHandler),
    });
    registry.register(CommandSpec {
        name: "skip",
        description: "🎺 Skip to the next music",
        arguments: Vec::new(),
        guard: GuardSpec::default(),
        handler: Arc::new(SkipHandler),
    });
    registry.register(CommandSpec {
        name: "volume",
        description: "🔊 Change the volume of the music",
        arguments: vec![ArgumentSpec {
            name: "volume",
            description: "The volume of the music",
            required: true,
            kind: ArgumentKind::Number,
        }],
        guard: GuardSpec::default(),
        handler: Arc::new(VolumeHandler),
    });
}

fn guild_player(ctx: &CommandContext, invocation: &Invocation) -> Option<Arc<Player>> {
    invocation.guild_id.and_then(|g| ctx.players.get(g))
}

struct PlayHandler;

#[async_trait]
impl CommandHandler for PlayHandler {
    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let (Some(guild_id), Some(voice_channel)) =
            (invocation.guild_id, invocation.voice_channel_id)
        else {
            return invocation.replier.reply(VOICE_REQUIRED, true).await;
        };

        let query = invocation.str_arg("query").unwrap_or_default();

        // Searching and connecting can take a while; acknowledge first.
        invocation.replier.defer(true).await?;

        let Some(track) = ctx.provider.search(query).await? else {
            let shown: String = query.chars().take(512).collect();
            return invocation
                .replier
                .edit(&format!("❌ **No results found for this search:** {shown}"))
                .await;
        };

        let player = ctx
            .players
            .get_or_connect(guild_id, voice_channel, ctx.transports.as_ref())
            .await?;

        let title = track.title.clone();
        player.enqueue(track).await;

        invocation
            .replier
            .edit(&format!("✅ **{title}** has been added to the queue."))
            .await
    }
}

struct PauseHandler;

#[async_trait]
impl CommandHandler for PauseHandler {
    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let Some(player) = guild_player(ctx, invocation) else {
            return invocation.replier.reply(NO_PLAYBACK, true).await;
        };

        match player.status().await {
            PlayerStatus::Paused => {
                invocation
                    .replier
                    .reply("❌ **The music is already paused.**", true)
                    .await
            }
            PlayerStatus::Playing => {
                player.pause().await?;
                invocation
                    .replier
                    .reply("✅ **The music has been paused.**", true)
                    .await
            }
            _ => invocation.replier.reply(NO_PLAYBACK, true).await,
        }
    }
}

struct ResumeHandler;

#[async_trait]
impl CommandHandler for ResumeHandler {
    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let player = guild_player(ctx, invocation);
        match player {
            Some(player) if player.status().await == PlayerStatus::Paused => {
                player.resume().await?;
                invocation
                    .replier
                    .reply("✅ **The music has been resumed.**", true)
                    .await
            }
            _ => {
                invocation
                    .replier
                    .reply("❌ **No music is currently paused.**", true)
                    .await
            }
        }
    }
}

struct StopHandler;

#[async_trait]
impl CommandHandler for StopHandler {
    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let player = guild_player(ctx, invocation);
        match player {
            Some(player) if player.status().await == PlayerStatus::Playing => {
                player.stop().await?;
                invocation
                    .replier
                    .reply("✅ **The music has been stopped.**", true)
                    .await
            }
            _ => invocation.replier.reply(NO_PLAYBACK, true).await,
        }
    }
}

struct SkipHandler;

#[async_trait]
impl CommandHandler for SkipHandler {
    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let Some(player) = guild_player(ctx, invocation) else {
            return invocation.replier.reply(NO_PLAYBACK, true).await;
        };

        player.skip().await?;
        invocation
            .replier
            .reply("🎶 **The music has been skipped.**", false)
            .await
    }
}

struct VolumeHandler;

#[async_trait]
impl CommandHandler for VolumeHandler {
    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let Some(volume) = invocation.f64_arg("volume") else {
            return invocation
                .replier
                .reply("❌ **The volume must be a number.**", true)
                .await;
        };

        if !(0.0..=200.0).contains(&volume) {
            return invocation
                .replier
                .reply("❌ **The volume must be between 0 and 200.**", true)
                .await;
        }

        let Some(player) = guild_player(ctx, invocation) else {
            return invocation.replier.reply(NO_PLAYBACK, true).await;
        };

        // Commands speak percent, the engine speaks gain factor.
        player.set_volume((volume / 100.0) as f32).await?;
        invocation
            .replier
            .reply(&format!("🔊 **The volume has been set to** {volume}%"), true)
            .await
    }
}
