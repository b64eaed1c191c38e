// ── Per-device action dispatch ──
//
// One action fans out to every resolved device; a failure on one device
// never prevents execution against the others, it is captured into that
// device's result entry instead. Devices are independent endpoints, so
// calls run concurrently with a bounded parallelism — `buffered` both
// limits in-flight calls and yields results in input order, which keeps
// the aggregated list stable regardless of completion order.

use futures_util::StreamExt;
use futures_util::stream;
use plugctl_api::{LedMode, PlugClient};
use serde::Serialize;
use tracing::warn;

use crate::error::CoreError;
use crate::model::{Capability, Device};

/// Default bound on concurrent in-flight device calls.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// An action dispatched against a resolved device set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    On,
    Off,
    Toggle,
    Status,
    Led(LedMode),
}

/// One per-device result entry, emitted in resolution order.
///
/// Control actions carry `success`; `status` carries `online` plus the
/// reported fields. Identity fields are always present, everything else
/// is omitted from the JSON when absent.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceResult {
    pub hw_id: String,
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aenergy_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeviceResult {
    fn identity(device: &Device) -> Self {
        Self {
            hw_id: device.hw_id.clone(),
            alias: device.alias.clone(),
            success: None,
            online: None,
            output: None,
            apower: None,
            aenergy_total: None,
            error: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.success == Some(false) || self.online == Some(false)
    }
}

/// Execute `action` against every device, returning one entry per device
/// in the order given. Blocks until every call has completed, failed, or
/// timed out.
pub async fn execute(
    client: &PlugClient,
    action: Action,
    devices: &[Device],
    concurrency: usize,
) -> Vec<DeviceResult> {
    let calls = devices.iter().map(|device| run_one(client, action, device));
    stream::iter(calls)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

async fn run_one(client: &PlugClient, action: Action, device: &Device) -> DeviceResult {
    let mut entry = DeviceResult::identity(device);

    match action {
        Action::On | Action::Off => {
            let on = action == Action::On;
            match client.set_switch(&device.ip, on).await {
                Ok(_) => entry.success = Some(true),
                Err(e) => fail(&mut entry, device, &e.into()),
            }
        }

        Action::Toggle => match client.toggle_switch(&device.ip).await {
            Ok(_) => entry.success = Some(true),
            Err(e) => fail(&mut entry, device, &e.into()),
        },

        Action::Status => match client.switch_status(&device.ip).await {
            Ok(status) => {
                entry.online = Some(true);
                entry.output = Some(status.output);
                if device.has(Capability::Metering) {
                    entry.apower = status.apower;
                    entry.aenergy_total = status.aenergy_total();
                }
            }
            Err(e) => {
                entry.online = Some(false);
                let e: CoreError = e.into();
                warn!(alias = %device.alias, error = %e, "device dispatch failed");
                entry.error = Some(e.to_string());
            }
        },

        Action::Led(mode) => {
            if !device.has(Capability::Led) {
                let e = CoreError::UnsupportedCapability {
                    device: device.alias.clone(),
                    capability: Capability::Led,
                };
                fail(&mut entry, device, &e);
            } else {
                match client.set_led(&device.ip, mode).await {
                    Ok(()) => entry.success = Some(true),
                    Err(e) => fail(&mut entry, device, &e.into()),
                }
            }
        }
    }

    entry
}

fn fail(entry: &mut DeviceResult, device: &Device, error: &CoreError) {
    warn!(alias = %device.alias, error = %error, "device dispatch failed");
    entry.success = Some(false);
    entry.error = Some(error.to_string());
}
