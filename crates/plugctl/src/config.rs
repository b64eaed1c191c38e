//! CLI-owned configuration: optional TOML file, `PLUGCTL_*` env vars,
//! and CLI flag overrides, merged figment-style (flags win).
//!
//! Core never sees these types -- it receives a store path and a
//! pre-built transport config.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config struct ───────────────────────────────────────────────

/// On-disk TOML configuration. All fields optional.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Registry file path; defaults to the platform data directory.
    pub store_path: Option<PathBuf>,

    /// Per-device request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Max concurrent device calls during dispatch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            timeout: default_timeout(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
fn default_concurrency() -> usize {
    plugctl_core::DEFAULT_CONCURRENCY
}

// ── Paths ────────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "plugctl")
}

/// Location of the optional TOML config file.
pub fn config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("plugctl.toml"))
}

/// Default registry location when neither flag nor config names one.
fn default_store_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("registry.json"))
        .unwrap_or_else(|| PathBuf::from("plugctl-registry.json"))
}

// ── Resolved settings ────────────────────────────────────────────────

/// Effective settings for one invocation after merging config file, env,
/// and CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_path: PathBuf,
    pub timeout: Duration,
    pub concurrency: usize,
    pub pretty: bool,
}

/// Merge config sources and apply CLI overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("PLUGCTL_"))
        .extract()?;

    Ok(Settings {
        store_path: global
            .store
            .clone()
            .or(cfg.store_path)
            .unwrap_or_else(default_store_path),
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.timeout)),
        concurrency: global.concurrency.unwrap_or(cfg.concurrency),
        pretty: global.pretty,
    })
}
