//! Command dispatch: bridges CLI args -> core operations -> JSON output.

pub mod actions;
pub mod devices;
pub mod groups;
pub mod list;

use plugctl_core::{Action, PlugClient, TransportConfig};

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a registry-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Add { ip, alias } => devices::add(settings, &ip, alias.as_deref()).await,
        Command::Remove { target } => devices::remove(settings, &target),
        Command::Rename { target, new_alias } => devices::rename(settings, &target, &new_alias),
        Command::Group(args) => groups::handle(settings, args.command),
        Command::On { target } => actions::run(settings, Action::On, &target).await,
        Command::Off { target } => actions::run(settings, Action::Off, &target).await,
        Command::Toggle { target } => actions::run(settings, Action::Toggle, &target).await,
        Command::Status { target } => actions::run(settings, Action::Status, &target).await,
        Command::Led { target, mode } => {
            actions::run(settings, Action::Led(mode.into()), &target).await
        }
        Command::List => list::handle(settings),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}

/// Build the shared device client from the resolved settings.
pub(crate) fn client(settings: &Settings) -> Result<PlugClient, CliError> {
    PlugClient::new(&TransportConfig::with_timeout(settings.timeout))
        .map_err(plugctl_core::CoreError::Device)
        .map_err(CliError::from)
}
