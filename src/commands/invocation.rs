//! Inbound command invocation boundary
//!
//! A gateway-agnostic view of one slash-command interaction: who invoked
//! it, with which arguments, and a reply capability. The serenity adapter
//! in `gateway` builds these; tests build them directly with a mock
//! [`Replier`].
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

/// Identity of the invoking account.
#[derive(Debug, Clone)]
pub struct Invoker {
    /// Platform user id
    pub id: String,
    /// Display username
    pub username: String,
    /// Automated/system account flag; such invocations are ignored
    pub is_bot: bool,
}

/// A typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Reply capability attached to an invocation.
///
/// Every terminal dispatcher path and every handler must eventually call
/// exactly one of `reply` or `defer`-then-`edit`, with an ephemeral
/// (invoker-only) or public visibility flag.
#[async_trait]
pub trait Replier: Send + Sync {
    /// Send the response immediately.
    async fn reply(&self, content: &str, ephemeral: bool) -> Result<()>;

    /// Acknowledge now, answer later via `edit`.
    async fn defer(&self, ephemeral: bool) -> Result<()>;

    /// Replace the deferred acknowledgement with the final content.
    async fn edit(&self, content: &str) -> Result<()>;
}

/// One inbound command invocation.
#[derive(Clone)]
pub struct Invocation {
    /// Target command name
    pub command: String,
    pub invoker: Invoker,
    /// Guild the interaction came from, if any
    pub guild_id: Option<u64>,
    /// Text channel the interaction came from, if any
    pub channel_id: Option<u64>,
    /// Voice channel the invoker currently occupies, if any
    pub voice_channel_id: Option<u64>,
    /// Argument name to typed value
    pub args: HashMap<String, ArgValue>,
    pub replier: Arc<dyn Replier>,
}

impl Invocation {
    pub fn arg(&self, name: &str) -> Option<&ArgValue> {
        self.args.get(name)
    }

    pub fn str_arg(&self, name: &str) -> Option<&str> {
        self.arg(name).and_then(ArgValue::as_str)
    }

    pub fn f64_arg(&self, name: &str) -> Option<f64> {
        self.arg(name).and_then(ArgValue::as_f64)
    }
}
