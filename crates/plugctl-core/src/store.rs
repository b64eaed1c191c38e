// ── Persisted device/group store ──
//
// JSON schema on disk:
//
//   { "devices": { "<hw_id>": {"ip", "alias", "model"?, "capabilities"?} },
//     "groups":  { "<name>": ["<member_ref>", ...] } }
//
// Both maps keep insertion order (IndexMap) so `resolve("all")` and the
// `list` output are stable across load/save round trips. Stores written
// before capabilities were recorded load with the full Plug S set.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Capability, Device};

/// One persisted device entry, keyed by hw_id in [`Store::devices`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub ip: String,
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<BTreeSet<Capability>>,
}

impl DeviceRecord {
    /// Effective capability set; records from legacy stores carry none
    /// and default to the full set.
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        self.capabilities.clone().unwrap_or_else(Capability::full_set)
    }
}

/// The whole registry file: devices keyed by hw_id, groups keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub devices: IndexMap<String, DeviceRecord>,
    #[serde(default)]
    pub groups: IndexMap<String, Vec<String>>,
}

impl Store {
    /// Load the store from disk. A missing file is an empty store; a
    /// present but malformed file is a corrupt-store error, never silently
    /// reset.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| CoreError::StoreIo {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CoreError::CorruptStore {
            path: path.to_owned(),
            source,
        })
    }

    /// Persist the full store, overwriting previous content.
    ///
    /// Writes to a sibling temp file and renames it into place so a crash
    /// mid-write cannot leave a half-written registry.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let io_err = |source| CoreError::StoreIo {
            path: path.to_owned(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut body = serde_json::to_string_pretty(self).map_err(|source| {
            CoreError::CorruptStore {
                path: path.to_owned(),
                source,
            }
        })?;
        body.push('\n');

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, body).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Materialize the device stored under `hw_id`.
    pub fn device(&self, hw_id: &str) -> Option<Device> {
        self.devices
            .get(hw_id)
            .map(|record| materialize(hw_id, record))
    }

    /// Find the device whose alias equals `alias` exactly.
    pub fn device_by_alias(&self, alias: &str) -> Option<Device> {
        self.devices
            .iter()
            .find(|(_, record)| record.alias == alias)
            .map(|(hw_id, record)| materialize(hw_id, record))
    }

    /// Every device in insertion order.
    pub fn all_devices(&self) -> Vec<Device> {
        self.devices
            .iter()
            .map(|(hw_id, record)| materialize(hw_id, record))
            .collect()
    }

    /// Whether `alias` is taken by a device other than `excluding` (the
    /// hw_id of a device being re-added or renamed).
    pub fn alias_in_use(&self, alias: &str, excluding: Option<&str>) -> bool {
        self.devices
            .iter()
            .any(|(hw_id, record)| record.alias == alias && Some(hw_id.as_str()) != excluding)
    }
}

fn materialize(hw_id: &str, record: &DeviceRecord) -> Device {
    Device {
        hw_id: hw_id.to_owned(),
        ip: record.ip.clone(),
        alias: record.alias.clone(),
        model: record.model.clone(),
        capabilities: record.capabilities(),
    }
}
