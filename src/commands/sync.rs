//! Remote slash-command synchronization
//!
//! Reconciles the local registry with the catalogue Discord holds for the
//! application: missing commands are created, drifted ones edited in place
//! and stale remote entries deleted. The diff itself is pure so it can be
//! tested without the gateway.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::http::Http;
use serenity::model::application::command::{Command, CommandOptionType};
use serenity::model::id::{CommandId, GuildId};

use super::registry::CommandRegistry;
use super::spec::{ArgumentKind, CommandSpec};

/// Synchronize the registry against the remote catalogue.
///
/// With a guild id the guild-scoped catalogue is used (instant propagation,
/// suited to development); otherwise the global one.
pub async fn sync_commands(
    http: &Http,
    registry: &CommandRegistry,
    guild_id: Option<u64>,
) -> Result<()> {
    let remote: Vec<RemoteCommand> = match guild_id {
        Some(gid) => GuildId(gid)
            .get_application_commands(http)
            .await?
            .iter()
            .map(RemoteCommand::from)
            .collect(),
        None => Command::get_global_application_commands(http)
            .await?
            .iter()
            .map(RemoteCommand::from)
            .collect(),
    };

    let plan = plan_sync(registry.list(), &remote);
    info!(
        "Command sync: {} to create, {} to edit, {} to delete",
        plan.create.len(),
        plan.edit.len(),
        plan.delete.len()
    );

    for spec in &plan.create {
        info!("Creating remote command {}", spec.name);
        match guild_id {
            Some(gid) => {
                GuildId(gid)
                    .create_application_command(http, |c| apply_spec(c, spec))
                    .await?;
            }
            None => {
                Command::create_global_application_command(http, |c| apply_spec(c, spec))
                    .await?;
            }
        }
    }

    for (id, spec) in &plan.edit {
        info!("Updating remote command {}", spec.name);
        match guild_id {
            Some(gid) => {
                GuildId(gid)
                    .edit_application_command(http, *id, |c| apply_spec(c, spec))
                    .await?;
            }
            None => {
                Command::edit_global_application_command(http, *id, |c| apply_spec(c, spec))
                    .await?;
            }
        }
    }

    for (id, name) in &plan.delete {
        info!("Deleting stale remote command {name}");
        match guild_id {
            Some(gid) => {
                GuildId(gid).delete_application_command(http, *id).await?;
            }
            None => {
                Command::delete_global_application_command(http, *id).await?;
            }
        }
    }

    Ok(())
}

/// Remote catalogue entry reduced to the fields the diff compares.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RemoteCommand {
    id: CommandId,
    name: String,
    description: String,
    options: Vec<RemoteOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RemoteOption {
    name: String,
    description: String,
    kind: CommandOptionType,
    required: bool,
}

impl From<&Command> for RemoteCommand {
    fn from(command: &Command) -> Self {
        Self {
            id: command.id,
            name: command.name.clone(),
            description: command.description.clone(),
            options: command
                .options
                .iter()
                .map(|o| RemoteOption {
                    name: o.name.clone(),
                    description: o.description.clone(),
                    kind: o.kind,
                    required: o.required,
                })
                .collect(),
        }
    }
}

struct SyncPlan<'a> {
    create: Vec<&'a CommandSpec>,
    edit: Vec<(CommandId, &'a CommandSpec)>,
    delete: Vec<(CommandId, String)>,
}

fn plan_sync<'a>(local: &'a [CommandSpec], remote: &[RemoteCommand]) -> SyncPlan<'a> {
    let mut plan = SyncPlan {
        create: Vec::new(),
        edit: Vec::new(),
        delete: Vec::new(),
    };

    for spec in local {
        match remote.iter().find(|r| r.name == spec.name) {
            None => plan.create.push(spec),
            Some(r) if !spec_matches(spec, r) => plan.edit.push((r.id, spec)),
            Some(_) => {}
        }
    }

    for r in remote {
        if !local.iter().any(|spec| spec.name == r.name) {
            plan.delete.push((r.id, r.name.clone()));
        }
    }

    plan
}

/// True when the remote entry already reflects the local spec. Option order
/// is significant, matching the order the builder submits.
fn spec_matches(spec: &CommandSpec, remote: &RemoteCommand) -> bool {
    if spec.name != remote.name || spec.description != remote.description {
        return false;
    }
    if spec.arguments.len() != remote.options.len() {
        return false;
    }
    spec.arguments.iter().zip(&remote.options).all(|(a, o)| {
        a.name == o.name
            && a.description == o.description
            && option_kind(a.kind) == o.kind
            && a.required == o.required
    })
}

fn apply_spec<'a>(
    builder: &'a mut CreateApplicationCommand,
    spec: &CommandSpec,
) -> &'a mut CreateApplicationCommand {
    builder.name(spec.name).description(spec.description);
    for arg in &spec.arguments {
        builder.create_option(|o| {
            o.name(arg.name)
                .description(arg.description)
                .kind(option_kind(arg.kind))
                .required(arg.required)
        });
    }
    builder
}

fn option_kind(kind: ArgumentKind) -> CommandOptionType {
    match kind {
        ArgumentKind::String => CommandOptionType::String,
        ArgumentKind::Integer => CommandOptionType::Integer,
        ArgumentKind::Number => CommandOptionType::Number,
        ArgumentKind::Boolean => CommandOptionType::Boolean,
    }
}
