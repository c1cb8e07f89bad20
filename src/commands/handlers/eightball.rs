//! # Magic 8-Ball Command
//!
//! Answers a question with one of the twelve classic fortunes.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::Invocation;
use crate::commands::registry::CommandRegistry;
use crate::commands::spec::{ArgumentKind, ArgumentSpec, CommandSpec, GuardSpec};

const ANSWERS: [&str; 12] = [
    "It is certain",
    "It is decidedly so",
    "Most likely",
    "Outlook good",
    "Yes",
    "Signs point to yes",
    "Better not tell you now",
    "Don't count on it",
    "My reply is no",
    "My sources say no",
    "Outlook not so good",
    "Very doubtful",
];

pub fn register(registry: &mut CommandRegistry) {
    registry.register(CommandSpec {
        name: "8ball",
        description: "🎱 Ask a question and I will answer!",
        arguments: vec![ArgumentSpec {
            name: "question",
            description: "Your question",
            required: true,
            kind: ArgumentKind::String,
        }],
        guard: GuardSpec::default(),
        handler: Arc::new(EightBallHandler),
    });
}

struct EightBallHandler;

#[async_trait]
impl CommandHandler for EightBallHandler {
    async fn run(&self, _ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let question = invocation.str_arg("question").unwrap_or("NONE");
        let answer = ANSWERS[rand::rng().random_range(0..ANSWERS.len())];

        let content = format!(
            "> 🎱 **{}** - {question}\n{answer}",
            invocation.invoker.username
        );
        invocation.replier.reply(&content, false).await
    }
}
