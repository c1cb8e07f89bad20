//! # Core Module
//!
//! Configuration and startup error handling for the encore bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod config;
pub mod errors;

// Re-export commonly used items
pub use config::Config;
pub use errors::StartupError;
