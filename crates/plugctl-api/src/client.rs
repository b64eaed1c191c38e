// Hand-crafted async HTTP client for the Shelly Gen 2/3 local RPC API.
//
// Endpoint: POST http://<ip>/rpc
// Frame:    {"id": n, "method": "...", "params": {...}}
// No persistent connection; one request per call.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{Component, ComponentsPage, DeviceInfo, LedMode, SwitchResult, SwitchStatus, WasOn};

// ── RPC frames ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    id: u32,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<P>,
}

#[derive(serde::Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(serde::Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Shelly local RPC API.
///
/// Stateless apart from the shared connection pool; every operation
/// takes the target device address explicitly.
#[derive(Debug, Clone)]
pub struct PlugClient {
    http: reqwest::Client,
}

impl PlugClient {
    /// Build from a transport config (timeout etc.).
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages timeouts).
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self { http }
    }

    // ── RPC plumbing ─────────────────────────────────────────────────

    /// Build the RPC endpoint URL for a device address.
    ///
    /// `ip` is a bare host or host:port, e.g. `192.168.1.50`.
    fn endpoint(ip: &str) -> Result<Url, Error> {
        Url::parse(&format!("http://{ip}/rpc")).map_err(|source| Error::InvalidAddress {
            ip: ip.to_owned(),
            source,
        })
    }

    /// Issue one RPC call and decode the result payload.
    async fn call<P, T>(&self, ip: &str, method: &str, params: Option<P>) -> Result<T, Error>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = Self::endpoint(ip)?;
        debug!(%url, method, "device rpc");

        let frame = RpcRequest {
            id: 1,
            method,
            params,
        };

        let resp = self
            .http
            .post(url)
            .json(&frame)
            .send()
            .await
            .map_err(|e| Error::from_transport(ip, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_transport(ip, e))?;

        if !status.is_success() {
            return Err(Error::Protocol {
                ip: ip.to_owned(),
                message: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        let envelope: RpcEnvelope =
            serde_json::from_str(&body).map_err(|e| Error::Protocol {
                ip: ip.to_owned(),
                message: format!("{e} (body preview: {:?})", preview(&body)),
            })?;

        if let Some(err) = envelope.error {
            return Err(Error::Rpc {
                ip: ip.to_owned(),
                code: err.code,
                message: err.message,
            });
        }

        let result = envelope.result.ok_or_else(|| Error::Protocol {
            ip: ip.to_owned(),
            message: "response carries neither result nor error".into(),
        })?;

        serde_json::from_value(result).map_err(|e| Error::Protocol {
            ip: ip.to_owned(),
            message: e.to_string(),
        })
    }

    // ── Operations ───────────────────────────────────────────────────

    /// `Shelly.GetDeviceInfo` — identity and model of the device.
    pub async fn device_info(&self, ip: &str) -> Result<DeviceInfo, Error> {
        self.call(ip, "Shelly.GetDeviceInfo", None::<()>).await
    }

    /// `Shelly.GetComponents` — component list with status, used to derive
    /// the device's capability set at add time.
    pub async fn components(&self, ip: &str) -> Result<Vec<Component>, Error> {
        let page: ComponentsPage = self
            .call(ip, "Shelly.GetComponents", Some(json!({"include": ["status"]})))
            .await?;
        Ok(page.components)
    }

    /// `Switch.Set` — drive the relay to a fixed state.
    pub async fn set_switch(&self, ip: &str, on: bool) -> Result<SwitchResult, Error> {
        let _: WasOn = self
            .call(ip, "Switch.Set", Some(json!({"id": 0, "on": on})))
            .await?;
        Ok(SwitchResult { output: on })
    }

    /// `Switch.Toggle` — invert the relay state.
    pub async fn toggle_switch(&self, ip: &str) -> Result<SwitchResult, Error> {
        let was: WasOn = self
            .call(ip, "Switch.Toggle", Some(json!({"id": 0})))
            .await?;
        Ok(SwitchResult {
            output: !was.was_on,
        })
    }

    /// `Switch.GetStatus` — relay state plus metering counters.
    pub async fn switch_status(&self, ip: &str) -> Result<SwitchStatus, Error> {
        self.call(ip, "Switch.GetStatus", Some(json!({"id": 0})))
            .await
    }

    /// `PLUGS_UI.SetConfig` — set the LED ring mode.
    pub async fn set_led(&self, ip: &str, mode: LedMode) -> Result<(), Error> {
        let _: serde_json::Value = self
            .call(
                ip,
                "PLUGS_UI.SetConfig",
                Some(json!({"config": {"leds": {"mode": mode}}})),
            )
            .await?;
        Ok(())
    }
}

/// Truncate a response body for error messages.
fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .take_while(|(i, _)| *i < 200)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    &body[..end]
}
