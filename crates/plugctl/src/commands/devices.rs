//! Device lifecycle handlers: add, remove, rename.

use serde_json::json;

use plugctl_core::Registry;

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::client;

/// Register a device by IP, querying it for identity and capabilities.
pub async fn add(settings: &Settings, ip: &str, alias: Option<&str>) -> Result<(), CliError> {
    let mut registry = Registry::open(&settings.store_path)?;
    let client = client(settings)?;

    let device = registry.add_device(&client, ip, alias).await?;
    registry.commit()?;

    output::print(
        settings,
        &json!({
            "ok": true,
            "hw_id": device.hw_id,
            "ip": device.ip,
            "alias": device.alias,
            "capabilities": device.capabilities,
        }),
    );
    Ok(())
}

/// Remove a device and scrub its references from every group.
pub fn remove(settings: &Settings, target: &str) -> Result<(), CliError> {
    let mut registry = Registry::open(&settings.store_path)?;
    let device = registry.remove_device(target)?;
    registry.commit()?;

    output::print(settings, &json!({"ok": true, "removed": device.hw_id}));
    Ok(())
}

/// Change a device's alias.
pub fn rename(settings: &Settings, target: &str, new_alias: &str) -> Result<(), CliError> {
    let mut registry = Registry::open(&settings.store_path)?;
    let device = registry.rename_device(target, new_alias)?;
    registry.commit()?;

    output::print(
        settings,
        &json!({"ok": true, "hw_id": device.hw_id, "alias": device.alias}),
    );
    Ok(())
}
