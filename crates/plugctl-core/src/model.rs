// ── Device domain types ──

use std::collections::BTreeSet;
use std::fmt;

use plugctl_api::Component;
use serde::{Deserialize, Serialize};

/// A feature flag derived from a device's reported component list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Relay control (`Switch.Set` / `Switch.Toggle`).
    Switch,
    /// Power and energy counters in the switch status.
    Metering,
    /// Controllable LED ring (`PLUGS_UI.SetConfig`).
    Led,
}

impl Capability {
    /// The full Plug S capability set; default for stores written before
    /// capabilities were recorded.
    pub fn full_set() -> BTreeSet<Self> {
        [Self::Switch, Self::Metering, Self::Led].into()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch => f.write_str("switch"),
            Self::Metering => f.write_str("metering"),
            Self::Led => f.write_str("led"),
        }
    }
}

/// Derive the capability set from a `Shelly.GetComponents` listing.
///
/// Established once at add time and persisted; re-add to refresh.
/// Metering is granted when a switch component reports `apower`, or when
/// a dedicated power-meter component is present.
pub fn capabilities_from_components(components: &[Component]) -> BTreeSet<Capability> {
    let mut caps = BTreeSet::new();
    for component in components {
        let kind = component.key.split(':').next().unwrap_or(&component.key);
        match kind {
            "switch" => {
                caps.insert(Capability::Switch);
                let metered = component
                    .status
                    .as_ref()
                    .is_some_and(|s| s.get("apower").is_some());
                if metered {
                    caps.insert(Capability::Metering);
                }
            }
            "pm1" | "em" | "em1" => {
                caps.insert(Capability::Metering);
            }
            "plugs_ui" => {
                caps.insert(Capability::Led);
            }
            _ => {}
        }
    }
    caps
}

/// A registered device, materialized from the store for resolution and
/// dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    /// Device-reported hardware identifier; primary key.
    pub hw_id: String,
    /// Network address (host or host:port).
    pub ip: String,
    /// User-chosen friendly name, unique across the registry.
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub capabilities: BTreeSet<Capability>,
}

impl Device {
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Preferred member identity for group entries: the alias when set,
    /// the hw_id for legacy records with an empty alias.
    pub fn member_ident(&self) -> &str {
        if self.alias.is_empty() {
            &self.hw_id
        } else {
            &self.alias
        }
    }
}
