//! Command registry
//!
//! Process-wide mapping from command name to [`CommandSpec`], populated
//! once at startup and treated as read-only by the dispatcher afterwards.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::collections::HashMap;

use log::debug;

use super::spec::CommandSpec;

/// Registry mapping command names to their specs, insertion-ordered.
///
/// `register` is an upsert keyed by name: a later registration for the same
/// name overwrites the stored description/arguments/guard/handler but keeps
/// the original insertion position, so `list()` order stays stable.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    specs: Vec<CommandSpec>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a command spec.
    pub fn register(&mut self, spec: CommandSpec) {
        debug!("Command registered: {}", spec.name);
        match self.index.get(spec.name) {
            Some(&position) => self.specs[position] = spec,
            None => {
                self.index.insert(spec.name, self.specs.len());
                self.specs.push(spec);
            }
        }
    }

    /// Get the spec for a command name.
    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.index.get(name).map(|&position| &self.specs[position])
    }

    /// All registered specs in insertion order.
    pub fn list(&self) -> &[CommandSpec] {
        &self.specs
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;

    use super::*;
    use crate::commands::context::CommandContext;
    use crate::commands::handler::CommandHandler;
    use crate::commands::invocation::Invocation;
    use crate::commands::spec::{ArgumentKind, ArgumentSpec, GuardSpec};

    struct NoopHandler;

    #[async_trait]
    impl CommandHandler for NoopHandler {
        async fn run(&self, _ctx: &CommandContext, _invocation: &Invocation) -> Result<()> {
            Ok(())
        }
    }

    fn spec(name: &'static str, description: &'static str) -> CommandSpec {
        CommandSpec {
            name,
            description,
            arguments: Vec::new(),
            guard: GuardSpec::default(),
            handler: Arc::new(NoopHandler),
        }
    }

    #[test]
    fn test_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_lookup_roundtrip() {
        let mut registry = CommandRegistry::new();
        let mut play = spec("play", "Play a music");
        play.arguments.push(ArgumentSpec {
            name: "query",
            description: "The search to run",
            required: true,
            kind: ArgumentKind::String,
        });
        registry.register(play);

        let found = registry.lookup("play").expect("registered");
        assert_eq!(found.description, "Play a music");
        assert_eq!(found.arguments.len(), 1);
        assert_eq!(found.arguments[0].name, "query");
        assert_eq!(found.arguments[0].kind, ArgumentKind::String);
        assert!(found.arguments[0].required);

        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("hello", ""));
        registry.register(spec("ping", ""));
        registry.register(spec("play", ""));

        let names: Vec<_> = registry.list().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["hello", "ping", "play"]);
    }

    #[test]
    fn test_reregistration_overwrites_in_place() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("hello", "first"));
        registry.register(spec("ping", ""));
        registry.register(spec("hello", "second"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("hello").unwrap().description, "second");

        let names: Vec<_> = registry.list().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["hello", "ping"]);
    }
}
