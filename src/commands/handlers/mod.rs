//! # Command Handlers
//!
//! One module per command family; `register_all` wires every handler into
//! the registry at startup.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

pub mod admin;
pub mod eightball;
pub mod music;
pub mod utility;

use super::registry::CommandRegistry;

/// Register every shipped command.
pub fn register_all(registry: &mut CommandRegistry) {
    utility::register(registry);
    eightball::register(registry);
    music::register(registry);
    admin::register(registry);
}
