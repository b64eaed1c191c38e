// ── Core error types ──
//
// User-facing errors from plugctl-core. Registry mutation errors abort a
// command before anything is persisted; per-device dispatch failures are
// captured into result entries instead (see dispatch.rs) and never
// surface through this type.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Capability;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Resolution errors ────────────────────────────────────────────
    #[error("unknown target '{target}': no matching alias, hardware id, or group")]
    UnknownTarget { target: String },

    // ── Registry invariant violations ────────────────────────────────
    #[error("alias '{alias}' is already in use by another device")]
    DuplicateAlias { alias: String },

    #[error("group '{name}' already exists")]
    DuplicateGroup { name: String },

    // ── Capability errors ────────────────────────────────────────────
    #[error("device '{device}' does not support the {capability} capability")]
    UnsupportedCapability {
        device: String,
        capability: Capability,
    },

    // ── Store errors ─────────────────────────────────────────────────
    #[error("registry store at {path} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("registry store I/O failed at {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Device errors (wrapped; fatal only during add) ───────────────
    #[error(transparent)]
    Device(#[from] plugctl_api::Error),
}
