// Core layer - configuration and startup errors
pub mod core;

// Permission store - roles, groups and user overrides
pub mod permissions;

// Command system - registry, dispatcher, handlers and catalogue sync
pub mod commands;

// Playback engine - per-guild queue/state machine and its boundaries
pub mod player;

// Gateway adapter - serenity event handler and replier
pub mod gateway;

// Re-export core config
pub use core::Config;
