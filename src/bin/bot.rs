use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::prelude::GatewayIntents;
use serenity::Client;
use songbird::{SerenityInit, Songbird};

use encore::commands::{handlers, CommandContext, CommandRegistry, Dispatcher};
use encore::core::Config;
use encore::gateway::GatewayHandler;
use encore::permissions::PermissionStore;
use encore::player::discord::VoiceTransportFactory;
use encore::player::youtube::YouTubeProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Encore...");

    // An unreadable or malformed permissions file is fatal at startup;
    // later reloads keep the previous tables instead.
    let permissions = PermissionStore::new();
    permissions.load_file(&config.permissions_path).map_err(|e| {
        error!(
            "Failed to load permissions from {}: {e}",
            config.permissions_path.display()
        );
        anyhow::anyhow!("permission configuration failed to load: {e}")
    })?;
    info!(
        "Permissions loaded from {}",
        config.permissions_path.display()
    );

    let mut registry = CommandRegistry::new();
    handlers::register_all(&mut registry);
    info!("{} commands registered", registry.len());

    // One songbird instance shared between the gateway driver and the
    // transport factory.
    let manager = Songbird::serenity();

    let context = Arc::new(CommandContext::new(
        permissions,
        Arc::new(YouTubeProvider::new()),
        Arc::new(VoiceTransportFactory::new(manager.clone())),
        config.permissions_path.clone(),
    ));
    let dispatcher = Arc::new(Dispatcher::new(registry, context));

    let intents = GatewayIntents::from_bits_truncate(config.intents);
    info!("Gateway intents: {intents:?}");

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(GatewayHandler::new(dispatcher, config.guild_id))
        .register_songbird_with(manager)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("client creation failed: {}", e)
        })?;

    info!("Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
