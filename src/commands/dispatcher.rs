//! Command dispatcher
//!
//! Routes one inbound invocation through the registry and the permission
//! guard, then invokes the handler with full error containment: a handler
//! failure becomes a log line plus a generic ephemeral notice, never a
//! crash.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Guard evaluation with user allow-list OR permission check
//! - 1.0.0: Initial implementation

use std::sync::Arc;

use log::{error, warn};

use super::context::CommandContext;
use super::invocation::Invocation;
use super::registry::CommandRegistry;
use super::spec::GuardSpec;
use crate::permissions::CheckOptions;

const NOT_IMPLEMENTED_NOTICE: &str = "This command is not implemented yet.";
const DENIED_NOTICE: &str = "You do not have permission to use this command.";
const FAILURE_NOTICE: &str = "An error occurred while executing this command.";

pub struct Dispatcher {
    registry: CommandRegistry,
    ctx: Arc<CommandContext>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, ctx: Arc<CommandContext>) -> Self {
        Self { registry, ctx }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Handle one invocation end to end. Never panics or propagates.
    pub async fn handle(&self, invocation: &Invocation) {
        // Automated accounts are ignored outright: no reply, no log noise.
        if invocation.invoker.is_bot {
            return;
        }

        let name = invocation.command.as_str();
        let Some(spec) = self.registry.lookup(name) else {
            warn!("Received command {name} but no handler is registered");
            self.notify(invocation, NOT_IMPLEMENTED_NOTICE).await;
            return;
        };

        if !self.authorize(&spec.guard, &invocation.invoker.id) {
            warn!(
                "User {} denied access to command {name}",
                invocation.invoker.id
            );
            self.notify(invocation, DENIED_NOTICE).await;
            return;
        }

        if let Err(e) = spec.handler.run(&self.ctx, invocation).await {
            error!("Error executing command {name}: {e}");
            self.notify(invocation, FAILURE_NOTICE).await;
        }
    }

    /// A command with no guard lists is unrestricted. Otherwise the invoker
    /// passes by appearing in the allow-list or by satisfying the permission
    /// store check for the remaining clauses.
    fn authorize(&self, guard: &GuardSpec, user_id: &str) -> bool {
        if guard.is_empty() {
            return true;
        }

        if guard.users.iter().any(|u| u == user_id) {
            return true;
        }

        let requirements = CheckOptions {
            permissions: guard.permissions.clone(),
            roles: guard.roles.clone(),
            groups: guard.groups.clone(),
        };
        if requirements.is_empty() {
            // Allow-list only, and the invoker was not on it.
            return false;
        }
        self.ctx.permissions.check(user_id, &requirements)
    }

    /// Best-effort ephemeral notice; a send failure is logged and swallowed.
    async fn notify(&self, invocation: &Invocation, content: &str) {
        if let Err(e) = invocation.replier.reply(content, true).await {
            error!(
                "Failed to send notice for command {}: {e}",
                invocation.command
            );
        }
    }
}
