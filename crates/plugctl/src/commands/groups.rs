//! Group management handlers.

use serde_json::json;

use plugctl_core::Registry;

use crate::cli::GroupCommand;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

pub fn handle(settings: &Settings, cmd: GroupCommand) -> Result<(), CliError> {
    let mut registry = Registry::open(&settings.store_path)?;

    let ack = match cmd {
        GroupCommand::Create { name } => {
            registry.create_group(&name)?;
            json!({"ok": true, "created": name})
        }

        GroupCommand::Delete { name } => {
            registry.delete_group(&name)?;
            json!({"ok": true, "deleted": name})
        }

        GroupCommand::Add { name, target } => {
            let added = registry.group_add(&name, &target)?;
            json!({"ok": true, "group": name, "added": added})
        }

        GroupCommand::Remove { name, target } => {
            let removed = registry.group_remove(&name, &target)?;
            json!({"ok": true, "group": name, "removed": removed})
        }
    };

    registry.commit()?;
    output::print(settings, &ack);
    Ok(())
}
