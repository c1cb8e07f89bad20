//! Startup error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use thiserror::Error;

/// Errors that prevent the bot from starting at all.
///
/// These are the only errors allowed to propagate out of the core; the
/// process exits non-zero when one is raised. Everything else is contained
/// where it occurs and converted into a log line.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no token found in environment variables")]
    NoToken,

    #[error("no intents found in environment variables")]
    NoIntents,

    #[error("invalid intents found in environment variables")]
    InvalidIntents,
}
