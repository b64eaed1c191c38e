//! Clap derive structures for the `plugctl` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use plugctl_core::LedMode;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// plugctl -- local controller for Shelly Plug S smart plugs
#[derive(Debug, Parser)]
#[command(
    name = "plugctl",
    version,
    about = "Control Shelly Plug S (Gen 2/3) smart plugs over the local network",
    long_about = "A local controller for Shelly Plug S (Gen 2/3) smart plugs.\n\n\
        Devices and groups live in a small JSON registry; actions accept a\n\
        target of 'all', a group name, an alias, or a hardware id, and run\n\
        against every matching device with per-device failure isolation.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Registry file path (overrides config)
    #[arg(long, env = "PLUGCTL_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Per-device request timeout in seconds
    #[arg(long, env = "PLUGCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Max concurrent device calls during dispatch
    #[arg(long, env = "PLUGCTL_CONCURRENCY", global = true)]
    pub concurrency: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a device by IP (queries it for identity and capabilities)
    Add {
        /// Device IP address (host or host:port)
        ip: String,
        /// Optional alias; defaults to the reported hardware id
        alias: Option<String>,
    },

    /// Remove a device and scrub it from every group
    #[command(alias = "rm")]
    Remove {
        /// Alias or hardware id of exactly one device
        target: String,
    },

    /// Change a device's alias
    Rename {
        /// Current alias or hardware id
        target: String,
        /// New alias
        new_alias: String,
    },

    /// Manage device groups
    Group(GroupArgs),

    /// Turn target device(s) on
    On {
        /// 'all', a group name, an alias, or a hardware id
        target: String,
    },

    /// Turn target device(s) off
    Off {
        /// 'all', a group name, an alias, or a hardware id
        target: String,
    },

    /// Toggle target device(s)
    Toggle {
        /// 'all', a group name, an alias, or a hardware id
        target: String,
    },

    /// Query relay state and power metering
    Status {
        /// 'all', a group name, an alias, or a hardware id
        target: String,
    },

    /// Set the LED ring mode
    Led {
        /// 'all', a group name, an alias, or a hardware id
        target: String,
        /// LED mode
        mode: LedModeArg,
    },

    /// List all registered devices and groups
    #[command(alias = "ls")]
    List,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create an empty group
    Create { name: String },

    /// Delete a group (member devices are unaffected)
    Delete { name: String },

    /// Add device(s) to a group; the target expands at edit time
    Add { name: String, target: String },

    /// Remove device(s) from a group
    Remove { name: String, target: String },
}

// ── Value enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LedModeArg {
    /// LED follows the relay state
    Switch,
    /// LED brightness tracks measured power
    Power,
    /// LED disabled
    Off,
}

impl From<LedModeArg> for LedMode {
    fn from(mode: LedModeArg) -> Self {
        match mode {
            LedModeArg::Switch => Self::Switch,
            LedModeArg::Power => Self::Power,
            LedModeArg::Off => Self::Off,
        }
    }
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
