//! Environment-derived bot configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Optional GUILD_ID for instant guild-scoped command sync
//! - 1.0.0: Initial implementation

use std::path::PathBuf;

use super::errors::StartupError;

/// Bot configuration read from the environment at startup.
///
/// `DISCORD_TOKEN` and `INTENTS` are mandatory; a missing token or a
/// missing/non-numeric intents bitmask is fatal. Everything else has a
/// sensible default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gateway authentication token
    pub discord_token: String,
    /// Raw gateway intents bitmask
    pub intents: u64,
    /// Path to the permissions TOML file
    pub permissions_path: PathBuf,
    /// Optional guild for development-mode command sync (instant updates)
    pub guild_id: Option<u64>,
    /// Default log filter for env_logger
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_values(
            std::env::var("DISCORD_TOKEN").ok(),
            std::env::var("INTENTS").ok(),
            std::env::var("PERMISSIONS_PATH").ok(),
            std::env::var("GUILD_ID").ok(),
            std::env::var("LOG_LEVEL").ok(),
        )
    }

    fn from_values(
        token: Option<String>,
        intents: Option<String>,
        permissions_path: Option<String>,
        guild_id: Option<String>,
        log_level: Option<String>,
    ) -> Result<Self, StartupError> {
        let discord_token = match token {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(StartupError::NoToken),
        };

        let intents = intents
            .ok_or(StartupError::NoIntents)?
            .trim()
            .parse::<u64>()
            .map_err(|_| StartupError::InvalidIntents)?;

        Ok(Config {
            discord_token,
            intents,
            permissions_path: PathBuf::from(
                permissions_path.unwrap_or_else(|| "permissions.toml".to_string()),
            ),
            guild_id: guild_id.and_then(|id| id.trim().parse::<u64>().ok()),
            log_level: log_level.unwrap_or_else(|| "info".to_string()),
        })
    }
}
