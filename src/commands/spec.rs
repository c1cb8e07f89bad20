//! Command registration metadata
//!
//! Each command module exposes its commands as explicit [`CommandSpec`]
//! struct literals registered at process initialization.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::sync::Arc;

use super::handler::CommandHandler;

/// Argument value type, mirroring the remote catalogue's option types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// One slash-command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub kind: ArgumentKind,
}

/// Guard requirements attached to a command.
///
/// All lists default to empty, meaning no restriction. When any list is
/// non-empty the dispatcher allows the invocation if the invoker appears in
/// the `users` allow-list OR satisfies the permission store check built from
/// the remaining clauses.
#[derive(Debug, Clone, Default)]
pub struct GuardSpec {
    /// User-id allow-list
    pub users: Vec<String>,
    /// Required permissions (ALL must resolve true)
    pub permissions: Vec<String>,
    /// Required roles (ANY held directly)
    pub roles: Vec<String>,
    /// Required groups (ANY held directly)
    pub groups: Vec<String>,
}

impl GuardSpec {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.permissions.is_empty()
            && self.roles.is_empty()
            && self.groups.is_empty()
    }
}

/// Metadata and handler for one registered command.
#[derive(Clone)]
pub struct CommandSpec {
    /// Unique command name
    pub name: &'static str,
    /// Description shown in the remote catalogue
    pub description: &'static str,
    /// Ordered argument specs
    pub arguments: Vec<ArgumentSpec>,
    /// Guard requirements, default unrestricted
    pub guard: GuardSpec,
    /// Handler invoked by the dispatcher
    pub handler: Arc<dyn CommandHandler>,
}
