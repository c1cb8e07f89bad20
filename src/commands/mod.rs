//! # Command System
//!
//! Slash-command registry, guard-enforcing dispatcher and remote catalogue
//! synchronization. Handlers are gateway-agnostic: they see an
//! [`Invocation`] and reply through its [`Replier`], so every dispatch path
//! is testable without a connection.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod handlers;
pub mod invocation;
pub mod registry;
pub mod spec;
pub mod sync;

#[cfg(test)]
pub(crate) mod testutil;

pub use context::CommandContext;
pub use dispatcher::Dispatcher;
pub use handler::CommandHandler;
pub use invocation::{ArgValue, Invocation, Invoker, Replier};
pub use registry::CommandRegistry;
pub use spec::{ArgumentKind, ArgumentSpec, CommandSpec, GuardSpec};
