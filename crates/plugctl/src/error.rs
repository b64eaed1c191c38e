//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text. Only fatal errors travel this path; per-device dispatch failures
//! are embedded in the JSON result array and exit zero.

use miette::Diagnostic;
use thiserror::Error;

use plugctl_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resolution ───────────────────────────────────────────────────
    #[error("Target '{target}' not found")]
    #[diagnostic(
        code(plugctl::unknown_target),
        help("No alias, hardware id, or group matches.\nRun: plugctl list")
    )]
    UnknownTarget { target: String },

    // ── Conflicts ────────────────────────────────────────────────────
    #[error("Alias '{alias}' is already in use")]
    #[diagnostic(
        code(plugctl::duplicate_alias),
        help("Pick a different alias, or rename the other device first.")
    )]
    DuplicateAlias { alias: String },

    #[error("Group '{name}' already exists")]
    #[diagnostic(code(plugctl::duplicate_group))]
    DuplicateGroup { name: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Could not reach device at {ip}")]
    #[diagnostic(
        code(plugctl::device_unreachable),
        help(
            "Check that the plug is powered and on the same network.\n\
             Address: {ip}\n\
             Increase the timeout with --timeout if the link is slow."
        )
    )]
    DeviceUnreachable {
        ip: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Device at {ip} sent an unexpected response")]
    #[diagnostic(
        code(plugctl::device_protocol),
        help("The device may not be a Shelly Gen 2/3 plug, or its firmware is too old.")
    )]
    DeviceProtocol { ip: String, message: String },

    #[error("Device '{device}' does not support {capability}")]
    #[diagnostic(code(plugctl::unsupported_capability))]
    UnsupportedCapability { device: String, capability: String },

    // ── Store ────────────────────────────────────────────────────────
    #[error("Registry store is corrupt: {path}")]
    #[diagnostic(
        code(plugctl::corrupt_store),
        help(
            "The registry was not modified. Fix the JSON by hand or move the\n\
             file aside to start from an empty registry."
        )
    )]
    CorruptStore {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(plugctl::config))]
    Config(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownTarget { .. } => exit_code::NOT_FOUND,
            Self::DuplicateAlias { .. } | Self::DuplicateGroup { .. } => exit_code::CONFLICT,
            Self::DeviceUnreachable { .. } => exit_code::CONNECTION,
            Self::UnsupportedCapability { .. } => exit_code::UNSUPPORTED,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownTarget { target } => CliError::UnknownTarget { target },

            CoreError::DuplicateAlias { alias } => CliError::DuplicateAlias { alias },

            CoreError::DuplicateGroup { name } => CliError::DuplicateGroup { name },

            CoreError::UnsupportedCapability { device, capability } => {
                CliError::UnsupportedCapability {
                    device,
                    capability: capability.to_string(),
                }
            }

            CoreError::CorruptStore { path, source } => CliError::CorruptStore {
                path: path.display().to_string(),
                source,
            },

            CoreError::StoreIo { source, .. } => CliError::Io(source),

            CoreError::Device(e) => match e {
                plugctl_core::ApiError::Unreachable { ip, source } => {
                    CliError::DeviceUnreachable {
                        ip,
                        source: source.into(),
                    }
                }
                plugctl_core::ApiError::Protocol { ip, message } => {
                    CliError::DeviceProtocol { ip, message }
                }
                plugctl_core::ApiError::Rpc { ip, code, message } => CliError::DeviceProtocol {
                    ip,
                    message: format!("rpc error {code}: {message}"),
                },
                other => CliError::DeviceProtocol {
                    ip: String::new(),
                    message: other.to_string(),
                },
            },
        }
    }
}
