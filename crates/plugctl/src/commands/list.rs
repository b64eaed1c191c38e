//! Registry listing.

use plugctl_core::Registry;

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

/// Print the whole registry (devices and groups) as indented JSON.
pub fn handle(settings: &Settings) -> Result<(), CliError> {
    let registry = Registry::open(&settings.store_path)?;
    output::print_pretty(registry.store());
    Ok(())
}
