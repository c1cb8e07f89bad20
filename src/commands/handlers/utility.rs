//! # Utility Commands
//!
//! Basic liveness commands: /hello and /ping.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::Invocation;
use crate::commands::registry::CommandRegistry;
use crate::commands::spec::{CommandSpec, GuardSpec};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(CommandSpec {
        name: "hello",
        description: "This is a command to say 'hello'",
        arguments: Vec::new(),
        guard: GuardSpec::default(),
        handler: Arc::new(HelloHandler),
    });
    registry.register(CommandSpec {
        name: "ping",
        description: "Check that the bot is responsive",
        arguments: Vec::new(),
        guard: GuardSpec::default(),
        handler: Arc::new(PingHandler),
    });
}

struct HelloHandler;

#[async_trait]
impl CommandHandler for HelloHandler {
    async fn run(&self, _ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let content = format!("Hello, {}! 👋", invocation.invoker.username);
        invocation.replier.reply(&content, false).await
    }
}

struct PingHandler;

#[async_trait]
impl CommandHandler for PingHandler {
    async fn run(&self, _ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        invocation.replier.reply("🏓 Pong!", false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::{self, StubFactory, StubProvider};

    fn handler_context() -> Arc<CommandContext> {
        testutil::context(
            Arc::new(StubProvider { result: None }),
            Arc::new(StubFactory::new()),
            "",
        )
    }

    #[tokio::test]
    async fn test_hello_greets_the_invoker_publicly() {
        let ctx = handler_context();
        let (invocation, replier) = testutil::invocation("hello");

        HelloHandler.run(&ctx, &invocation).await.unwrap();

        assert_eq!(
            replier.replies.lock().clone(),
            vec![("Hello, tester! 👋".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_ping_pongs_publicly() {
        let ctx = handler_context();
        let (invocation, replier) = testutil::invocation("ping");

        PingHandler.run(&ctx, &invocation).await.unwrap();

        assert_eq!(
            replier.replies.lock().clone(),
            vec![("🏓 Pong!".to_string(), false)]
        );
    }

    #[test]
    fn test_register_adds_both_commands() {
        let mut registry = CommandRegistry::new();
        register(&mut registry);

        assert!(registry.contains("hello"));
        assert!(registry.contains("ping"));
    }
}
