//! # Gateway Adapter
//!
//! The serenity event handler: syncs the command catalogue on ready and
//! converts application-command interactions into [`Invocation`]s for the
//! dispatcher. Everything below this module is gateway-agnostic.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use serenity::http::Http;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::prelude::{Context, EventHandler};

use crate::commands::invocation::{ArgValue, Invocation, Invoker, Replier};
use crate::commands::sync::sync_commands;
use crate::commands::Dispatcher;

pub struct GatewayHandler {
    dispatcher: Arc<Dispatcher>,
    /// Development-mode guild for instant command sync; global when absent
    guild_id: Option<u64>,
}

impl GatewayHandler {
    pub fn new(dispatcher: Arc<Dispatcher>, guild_id: Option<u64>) -> Self {
        Self {
            dispatcher,
            guild_id,
        }
    }
}

#[async_trait]
impl EventHandler for GatewayHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready", ready.user.name);
        info!("Connected to {} guilds", ready.guilds.len());

        match self.guild_id {
            Some(guild_id) => {
                info!("Development mode: syncing commands for guild {guild_id}")
            }
            None => info!("Syncing commands globally (propagation can take a while)"),
        }
        if let Err(e) = sync_commands(&ctx.http, self.dispatcher.registry(), self.guild_id).await {
            error!("Command sync failed: {e}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            let invocation = build_invocation(&ctx, command);
            self.dispatcher.handle(&invocation).await;
        }
    }
}

/// Translate one slash-command interaction into a dispatcher invocation.
fn build_invocation(ctx: &Context, command: ApplicationCommandInteraction) -> Invocation {
    let guild_id = command.guild_id.map(|g| g.0);

    // The invoker's current voice channel, if the guild is cached.
    let voice_channel_id = guild_id
        .and_then(|gid| ctx.cache.guild(gid))
        .and_then(|guild| {
            guild
                .voice_states
                .get(&command.user.id)
                .and_then(|state| state.channel_id)
        })
        .map(|channel| channel.0);

    let mut args = HashMap::new();
    for option in &command.data.options {
        let Some(value) = option.value.as_ref() else {
            continue;
        };
        let arg = if let Some(s) = value.as_str() {
            ArgValue::String(s.to_string())
        } else if let Some(b) = value.as_bool() {
            ArgValue::Boolean(b)
        } else if let Some(n) = value.as_f64() {
            ArgValue::Number(n)
        } else {
            continue;
        };
        args.insert(option.name.clone(), arg);
    }

    Invocation {
        command: command.data.name.clone(),
        invoker: Invoker {
            id: command.user.id.0.to_string(),
            username: command.user.name.clone(),
            is_bot: command.user.bot,
        },
        guild_id,
        channel_id: Some(command.channel_id.0),
        voice_channel_id,
        args,
        replier: Arc::new(SerenityReplier {
            http: ctx.http.clone(),
            interaction: command,
        }),
    }
}

/// Replies through the interaction-response endpoints.
struct SerenityReplier {
    http: Arc<Http>,
    interaction: ApplicationCommandInteraction,
}

#[async_trait]
impl Replier for SerenityReplier {
    async fn reply(&self, content: &str, ephemeral: bool) -> Result<()> {
        self.interaction
            .create_interaction_response(&self.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.content(content).ephemeral(ephemeral)
                    })
            })
            .await?;
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> Result<()> {
        self.interaction
            .create_interaction_response(&self.http, |response| {
                response
                    .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                    .interaction_response_data(|message| message.ephemeral(ephemeral))
            })
            .await?;
        Ok(())
    }

    async fn edit(&self, content: &str) -> Result<()> {
        self.interaction
            .edit_original_interaction_response(&self.http, |response| response.content(content))
            .await?;
        Ok(())
    }
}
