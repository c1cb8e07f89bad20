//! Command handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;

use super::context::CommandContext;
use super::invocation::Invocation;

/// Trait implemented by every command handler.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Execute the command for one invocation.
    ///
    /// Errors are contained by the dispatcher: logged with the command name
    /// and answered with a generic ephemeral notice.
    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // The trait must stay object-safe, the registry stores it as Arc<dyn>.
    fn _assert_object_safe(_: &dyn CommandHandler) {}
}
