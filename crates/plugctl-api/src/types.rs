//! Wire types for the Shelly Gen 2/3 RPC surface.
//!
//! Field names follow the device firmware JSON exactly; only the fields
//! plugctl consumes are modeled, unknown fields are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Shelly.GetDeviceInfo ─────────────────────────────────────────────

/// Response of `Shelly.GetDeviceInfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
    /// Stable hardware identifier, e.g. `shellyplugsg3-abc123`.
    pub id: String,
    /// Model code, e.g. `S3PL-00112EU`.
    #[serde(default)]
    pub model: Option<String>,
    /// Application name, e.g. `PlugSG3`.
    #[serde(default)]
    pub app: Option<String>,
    /// Device generation (2 or 3).
    #[serde(default)]
    pub r#gen: Option<u8>,
}

// ── Shelly.GetComponents ─────────────────────────────────────────────

/// One entry of the `Shelly.GetComponents` listing.
///
/// `key` is the component instance name (`switch:0`, `plugs_ui`, ...);
/// `status` is present when the call requested status inclusion and is
/// kept raw, callers probe it for fields like `apower`.
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    pub key: String,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

/// Paged envelope around the component listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ComponentsPage {
    #[serde(default)]
    pub components: Vec<Component>,
}

// ── Switch.* ─────────────────────────────────────────────────────────

/// Raw result of `Switch.Set` / `Switch.Toggle`.
#[derive(Debug, Deserialize)]
pub(crate) struct WasOn {
    pub was_on: bool,
}

/// Outcome of a switch mutation, normalized to the resulting state.
#[derive(Debug, Clone, Copy)]
pub struct SwitchResult {
    /// Relay output state after the call.
    pub output: bool,
}

/// Response of `Switch.GetStatus`.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchStatus {
    /// Relay output state.
    pub output: bool,
    /// Instantaneous active power in watts (metering devices only).
    #[serde(default)]
    pub apower: Option<f64>,
    /// Accumulated energy counter (metering devices only).
    #[serde(default)]
    pub aenergy: Option<EnergyCounter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnergyCounter {
    /// Total energy consumed in watt-hours.
    pub total: f64,
}

impl SwitchStatus {
    /// Total accumulated energy, if the device reported it.
    pub fn aenergy_total(&self) -> Option<f64> {
        self.aenergy.as_ref().map(|e| e.total)
    }
}

// ── PLUGS_UI.SetConfig ───────────────────────────────────────────────

/// LED ring mode of the Plug S front face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedMode {
    /// LED follows the relay state.
    Switch,
    /// LED brightness tracks measured power.
    Power,
    /// LED disabled.
    Off,
}

impl fmt::Display for LedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch => f.write_str("switch"),
            Self::Power => f.write_str("power"),
            Self::Off => f.write_str("off"),
        }
    }
}
