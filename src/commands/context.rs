//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::path::PathBuf;
use std::sync::Arc;

use crate::permissions::PermissionStore;
use crate::player::provider::MediaProvider;
use crate::player::transport::TransportFactory;
use crate::player::PlayerRegistry;

/// Process-scoped services shared by all command handlers.
///
/// Built once at startup and passed by reference everywhere, replacing any
/// module-level singletons: the permission tables, the guild player map,
/// the media provider and the voice transport factory.
pub struct CommandContext {
    pub permissions: PermissionStore,
    pub players: PlayerRegistry,
    pub provider: Arc<dyn MediaProvider>,
    pub transports: Arc<dyn TransportFactory>,
    /// Source file for permission reloads
    pub permissions_path: PathBuf,
}

impl CommandContext {
    pub fn new(
        permissions: PermissionStore,
        provider: Arc<dyn MediaProvider>,
        transports: Arc<dyn TransportFactory>,
        permissions_path: PathBuf,
    ) -> Self {
        Self {
            permissions,
            players: PlayerRegistry::new(),
            provider,
            transports,
            permissions_path,
        }
    }
}
