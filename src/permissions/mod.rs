//! # Permission Store
//!
//! Layered role/group/user authorization loaded from a TOML file.
//!
//! Permissions resolve first-match-wins in a fixed order: user-direct,
//! then the user's roles, then the user's groups' direct permissions, then
//! those groups' roles. A user can therefore override any role or group
//! default by setting the permission directly, without negation syntax.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.2.0: Reload now replaces all tables under a single write lock
//! - 1.1.0: Synthetic default user for unknown user ids
//! - 1.0.0: Initial implementation

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};
use parking_lot::RwLock;
use thiserror::Error;

/// Group every unknown user is considered a member of, when defined.
pub const DEFAULT_GROUP: &str = "default";

const ROLES_KEY: &str = "roles";
const GROUPS_KEY: &str = "groups";
const USERS_KEY: &str = "users";

/// Mapping of permission name to granted/denied.
pub type PermissionSet = HashMap<String, bool>;

#[derive(Debug, Clone, Default)]
struct Group {
    roles: Vec<String>,
    permissions: PermissionSet,
}

#[derive(Debug, Clone, Default)]
struct UserEntry {
    roles: Vec<String>,
    groups: Vec<String>,
    permissions: PermissionSet,
}

/// Fatal load errors: the file is unreadable or not valid TOML at the top
/// level. Individually malformed entries are skipped with a warning instead.
#[derive(Debug, Error)]
pub enum ConfigParseError {
    #[error("failed to read permissions file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse permissions file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Requirements for [`PermissionStore::check`].
///
/// The check passes when AT LEAST ONE supplied, non-empty clause is
/// satisfied:
/// - `permissions`: the user must resolve ALL listed permissions to `true`;
/// - `roles`: the user must hold AT LEAST ONE listed role directly;
/// - `groups`: the user must belong to AT LEAST ONE listed group directly.
///
/// An empty clause contributes nothing; all clauses empty yields `false`.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub permissions: Vec<String>,
    pub roles: Vec<String>,
    pub groups: Vec<String>,
}

impl CheckOptions {
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty() && self.groups.is_empty()
    }
}

#[derive(Default)]
struct Tables {
    roles: HashMap<String, PermissionSet>,
    groups: HashMap<String, Group>,
    users: HashMap<String, UserEntry>,
}

/// Process-scoped permission tables, read-mostly, fully replaced on reload.
pub struct PermissionStore {
    tables: RwLock<Tables>,
}

impl PermissionStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Load (or reload) the permission tables from a TOML file.
    ///
    /// A reload fully replaces prior state: once the document parses at the
    /// top level, all three tables are cleared before repopulation, even if
    /// individual entries turn out to be malformed.
    pub fn load_file(&self, path: &Path) -> Result<(), ConfigParseError> {
        debug!("Loading permissions from: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// Load the permission tables from TOML text. See [`Self::load_file`].
    pub fn load_str(&self, text: &str) -> Result<(), ConfigParseError> {
        let doc: toml::Table = text.parse()?;

        // Hold the write lock for the whole swap so concurrent checks never
        // observe a half-cleared store.
        let mut tables = self.tables.write();
        tables.roles.clear();
        tables.groups.clear();
        tables.users.clear();

        load_roles(&mut tables, &doc);
        load_groups(&mut tables, &doc);
        load_users(&mut tables, &doc);

        debug!(
            "Permissions loaded: {} roles, {} groups, {} users",
            tables.roles.len(),
            tables.groups.len(),
            tables.users.len()
        );
        Ok(())
    }

    /// Compute the full effective permission mapping for a user.
    ///
    /// Pure function of the current store state. Unknown users resolve
    /// through the synthetic default user (member of [`DEFAULT_GROUP`] when
    /// that group exists).
    pub fn resolve_permissions(&self, user_id: &str) -> PermissionSet {
        let tables = self.tables.read();
        let user = lookup_user(&tables, user_id);
        compute_permissions(&tables, &user)
    }

    /// Check whether a user satisfies at least one clause of `requirements`.
    pub fn check(&self, user_id: &str, requirements: &CheckOptions) -> bool {
        let tables = self.tables.read();
        let user = lookup_user(&tables, user_id);

        if !requirements.permissions.is_empty() {
            let resolved = compute_permissions(&tables, &user);
            let has_all = requirements
                .permissions
                .iter()
                .all(|p| resolved.get(p).copied() == Some(true));
            if has_all {
                debug!("User \"{user_id}\" check passed via permissions");
                return true;
            }
        }

        if !requirements.roles.is_empty()
            && requirements.roles.iter().any(|r| user.roles.contains(r))
        {
            debug!("User \"{user_id}\" check passed via roles");
            return true;
        }

        if !requirements.groups.is_empty()
            && requirements.groups.iter().any(|g| user.groups.contains(g))
        {
            debug!("User \"{user_id}\" check passed via groups");
            return true;
        }

        debug!("User \"{user_id}\" check failed for {requirements:?}");
        false
    }
}

impl Default for PermissionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup_user(tables: &Tables, user_id: &str) -> UserEntry {
    if let Some(user) = tables.users.get(user_id) {
        return user.clone();
    }

    debug!("User \"{user_id}\" not found. Using default group \"{DEFAULT_GROUP}\".");
    if !tables.groups.contains_key(DEFAULT_GROUP) {
        warn!("Default group \"{DEFAULT_GROUP}\" is not defined in permissions file.");
        return UserEntry::default();
    }
    UserEntry {
        roles: Vec::new(),
        groups: vec![DEFAULT_GROUP.to_string()],
        permissions: PermissionSet::new(),
    }
}

fn compute_permissions(tables: &Tables, user: &UserEntry) -> PermissionSet {
    // User direct -> user roles -> group direct -> group roles
    let mut combined = user.permissions.clone();

    for role in &user.roles {
        merge_permissions(&mut combined, tables.roles.get(role));
    }

    for group_name in &user.groups {
        let Some(group) = tables.groups.get(group_name) else {
            continue;
        };
        merge_permissions(&mut combined, Some(&group.permissions));
        for role in &group.roles {
            merge_permissions(&mut combined, tables.roles.get(role));
        }
    }

    combined
}

/// First-match-wins: a key already present in `target` is never overwritten.
fn merge_permissions(target: &mut PermissionSet, source: Option<&PermissionSet>) {
    let Some(source) = source else { return };
    for (key, value) in source {
        target.entry(key.clone()).or_insert(*value);
    }
}

fn load_roles(tables: &mut Tables, doc: &toml::Table) {
    let Some(section) = doc.get(ROLES_KEY).and_then(|v| v.as_table()) else {
        return;
    };

    for (name, value) in section {
        match value.as_table() {
            Some(entries) => {
                let permissions = permission_set_from(name, entries);
                tables.roles.insert(name.clone(), permissions);
            }
            None => warn!("Invalid format for role \"{name}\". Skipping."),
        }
    }
}

fn load_groups(tables: &mut Tables, doc: &toml::Table) {
    let Some(section) = doc.get(GROUPS_KEY).and_then(|v| v.as_table()) else {
        return;
    };

    for (name, value) in section {
        let Some(entries) = value.as_table() else {
            warn!("Invalid format for group \"{name}\". Skipping.");
            continue;
        };

        let roles = reference_list(entries.get(ROLES_KEY))
            .into_iter()
            .filter(|r| {
                let known = tables.roles.contains_key(r);
                if !known {
                    warn!("Role \"{r}\" in group \"{name}\" not found.");
                }
                known
            })
            .collect();

        let direct: toml::Table = entries
            .iter()
            .filter(|(key, _)| key.as_str() != ROLES_KEY)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        tables.groups.insert(
            name.clone(),
            Group {
                roles,
                permissions: permission_set_from(name, &direct),
            },
        );
    }
}

fn load_users(tables: &mut Tables, doc: &toml::Table) {
    let Some(section) = doc.get(USERS_KEY).and_then(|v| v.as_table()) else {
        return;
    };

    for (user_id, value) in section {
        let Some(entries) = value.as_table() else {
            warn!("Invalid format for user \"{user_id}\". Skipping.");
            continue;
        };

        let roles = reference_list(entries.get(ROLES_KEY))
            .into_iter()
            .filter(|r| {
                let known = tables.roles.contains_key(r);
                if !known {
                    warn!("Role \"{r}\" for user \"{user_id}\" not found.");
                }
                known
            })
            .collect();

        let groups = reference_list(entries.get(GROUPS_KEY))
            .into_iter()
            .filter(|g| {
                let known = tables.groups.contains_key(g);
                if !known {
                    warn!("Group \"{g}\" for user \"{user_id}\" not found.");
                }
                known
            })
            .collect();

        let direct: toml::Table = entries
            .iter()
            .filter(|(key, _)| key.as_str() != ROLES_KEY && key.as_str() != GROUPS_KEY)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        tables.users.insert(
            user_id.clone(),
            UserEntry {
                roles,
                groups,
                permissions: permission_set_from(user_id, &direct),
            },
        );
    }
}

/// Extract a list of role/group references, ignoring non-string elements.
fn reference_list(value: Option<&toml::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Keep only strictly boolean permission values; anything else is dropped
/// with a warning and the load continues.
fn permission_set_from(owner: &str, entries: &toml::Table) -> PermissionSet {
    let mut permissions = PermissionSet::new();
    for (key, value) in entries {
        match value.as_bool() {
            Some(flag) => {
                permissions.insert(key.clone(), flag);
            }
            None => warn!(
                "Invalid value type for permission \"{key}\" of \"{owner}\" (expected boolean). Skipping."
            ),
        }
    }
    permissions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(text: &str) -> PermissionStore {
        let store = PermissionStore::new();
        store.load_str(text).expect("fixture must parse");
        store
    }

    #[test]
    fn test_unknown_user_inherits_default_group() {
        let store = store(
            r#"
            [roles.admin]
            manage = true

            [groups.default]
            roles = ["admin"]
            "#,
        );

        let perms = store.resolve_permissions("unknown-user");
        assert_eq!(perms.get("manage"), Some(&true));
        assert_eq!(perms.len(), 1);
    }

    #[test]
    fn test_unknown_user_without_default_group() {
        let store = store(
            r#"
            [roles.admin]
            manage = true
            "#,
        );

        assert!(store.resolve_permissions("unknown-user").is_empty());
    }

    #[test]
    fn test_resolution_order_is_first_match_wins() {
        // manage is defined at every level; user-direct must win.
        let store = store(
            r#"
            [roles.mod]
            manage = true
            kick = true

            [groups.staff]
            roles = ["mod"]
            manage = true
            ban = true

            [users.u1]
            roles = ["mod"]
            groups = ["staff"]
            manage = false
            "#,
        );

        let perms = store.resolve_permissions("u1");
        assert_eq!(perms.get("manage"), Some(&false));
        // Later sources still contribute keys the earlier ones lack.
        assert_eq!(perms.get("kick"), Some(&true));
        assert_eq!(perms.get("ban"), Some(&true));
    }

    #[test]
    fn test_role_beats_group_for_same_key() {
        let store = store(
            r#"
            [roles.mod]
            kick = true

            [groups.staff]
            kick = false

            [users.u1]
            roles = ["mod"]
            groups = ["staff"]
            "#,
        );

        assert_eq!(store.resolve_permissions("u1").get("kick"), Some(&true));
    }

    #[test]
    fn test_check_with_no_clauses_is_false() {
        let store = store(
            r#"
            [users.u1]
            manage = true
            "#,
        );

        assert!(!store.check("u1", &CheckOptions::default()));
    }

    #[test]
    fn test_empty_roles_clause_is_not_automatic_pass() {
        let store = store(
            r#"
            [users.u1]
            manage = true
            "#,
        );

        let requirements = CheckOptions {
            roles: Vec::new(),
            ..Default::default()
        };
        assert!(!store.check("u1", &requirements));
    }

    #[test]
    fn test_clauses_are_a_disjunction() {
        // Permission clause fails (manage is false) but the role clause
        // passes, so the overall check passes.
        let store = store(
            r#"
            [roles.mod]
            kick = true

            [users.u1]
            roles = ["mod"]
            manage = false
            "#,
        );

        let requirements = CheckOptions {
            permissions: vec!["manage".into()],
            roles: vec!["mod".into()],
            ..Default::default()
        };
        assert!(store.check("u1", &requirements));
    }

    #[test]
    fn test_permissions_clause_requires_all() {
        let store = store(
            r#"
            [users.u1]
            manage = true
            kick = false
            "#,
        );

        let both = CheckOptions {
            permissions: vec!["manage".into(), "kick".into()],
            ..Default::default()
        };
        assert!(!store.check("u1", &both));

        let one = CheckOptions {
            permissions: vec!["manage".into()],
            ..Default::default()
        };
        assert!(store.check("u1", &one));
    }

    #[test]
    fn test_default_group_counts_as_direct_membership() {
        let store = store(
            r#"
            [groups.default]
            listen = true
            "#,
        );

        let requirements = CheckOptions {
            groups: vec![DEFAULT_GROUP.into()],
            ..Default::default()
        };
        assert!(store.check("unknown-user", &requirements));
    }

    #[test]
    fn test_unknown_role_reference_is_dropped() {
        let store = store(
            r#"
            [groups.default]
            roles = ["ghost"]
            listen = true
            "#,
        );

        let perms = store.resolve_permissions("unknown-user");
        assert_eq!(perms.get("listen"), Some(&true));
        assert_eq!(perms.len(), 1);
    }

    #[test]
    fn test_non_boolean_permission_is_dropped() {
        // The role survives with only its valid key.
        let store = store(
            r#"
            [roles.admin]
            manage = "yes"
            kick = true

            [users.u1]
            roles = ["admin"]
            "#,
        );

        let perms = store.resolve_permissions("u1");
        assert_eq!(perms.get("kick"), Some(&true));
        assert_eq!(perms.get("manage"), None);
    }

    #[test]
    fn test_malformed_entry_is_skipped() {
        let store = store(
            r#"
            [roles]
            broken = 5

            [roles.admin]
            manage = true

            [users.u1]
            roles = ["admin"]
            "#,
        );

        let perms = store.resolve_permissions("u1");
        assert_eq!(perms.get("manage"), Some(&true));
    }

    #[test]
    fn test_reload_replaces_all_state() {
        let store = store(
            r#"
            [users.u1]
            manage = true
            "#,
        );
        assert_eq!(store.resolve_permissions("u1").get("manage"), Some(&true));

        store
            .load_str(
                r#"
                [users.u2]
                kick = true
                "#,
            )
            .unwrap();

        assert!(store.resolve_permissions("u1").is_empty());
        assert_eq!(store.resolve_permissions("u2").get("kick"), Some(&true));
    }

    #[test]
    fn test_top_level_parse_failure() {
        let store = PermissionStore::new();
        let result = store.load_str("this is [not valid toml");
        assert!(matches!(result, Err(ConfigParseError::Parse(_))));
    }

    #[test]
    fn test_missing_file_fails() {
        let store = PermissionStore::new();
        let result = store.load_file(Path::new("/nonexistent/permissions.toml"));
        assert!(matches!(result, Err(ConfigParseError::Read(_))));
    }
}
