//! Async client for the Shelly Plug S (Gen 2/3) local RPC API.
//!
//! Devices expose a JSON-RPC-style endpoint at `http://<ip>/rpc`; each
//! operation is a single POST carrying `{id, method, params}` with a
//! per-request timeout. `plugctl-core` maps the error taxonomy into
//! user-facing diagnostics.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::PlugClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{Component, DeviceInfo, LedMode, SwitchResult, SwitchStatus};
