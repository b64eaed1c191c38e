//! Device action handlers: on, off, toggle, status, led.
//!
//! A fan-out command exits zero as long as resolution succeeded; failing
//! devices show up as entries with `"success": false` or `"online": false`
//! so scripts can act per-device instead of aborting on the first one.

use plugctl_core::{Action, Registry, execute, resolve};

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::client;

/// Resolve `target`, fan `action` out to every matched device, and print
/// one result entry per device in resolution order.
pub async fn run(settings: &Settings, action: Action, target: &str) -> Result<(), CliError> {
    let registry = Registry::open(&settings.store_path)?;
    let devices = resolve(registry.store(), target)?;
    let client = client(settings)?;

    let results = execute(&client, action, &devices, settings.concurrency).await;
    output::print(settings, &results);
    Ok(())
}
