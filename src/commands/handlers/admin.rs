//! # Admin Commands
//!
//! Operator-only commands guarded by the permission store.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::Invocation;
use crate::commands::registry::CommandRegistry;
use crate::commands::spec::{CommandSpec, GuardSpec};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(CommandSpec {
        name: "reload",
        description: "Reload the permission configuration",
        arguments: Vec::new(),
        guard: GuardSpec {
            permissions: vec!["admin".to_string()],
            ..Default::default()
        },
        handler: Arc::new(ReloadHandler),
    });
}

struct ReloadHandler;

#[async_trait]
impl CommandHandler for ReloadHandler {
    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        match ctx.permissions.load_file(&ctx.permissions_path) {
            Ok(()) => {
                info!(
                    "Permissions reloaded from {} by user {}",
                    ctx.permissions_path.display(),
                    invocation.invoker.id
                );
                invocation
                    .replier
                    .reply("✅ **The permission configuration has been reloaded.**", true)
                    .await
            }
            Err(e) => {
                // The store keeps serving the previous tables on failure.
                warn!(
                    "Permission reload from {} failed: {e}",
                    ctx.permissions_path.display()
                );
                invocation
                    .replier
                    .reply("❌ **Failed to reload the permission configuration.**", true)
                    .await
            }
        }
    }
}
