//! Domain logic for plugctl: the persisted device/group registry, target
//! resolution, and per-device action dispatch.
//!
//! The registry is process-local state with a load/mutate/save lifecycle
//! scoped to one command invocation: [`Registry::open`] reads the store
//! once, mutations run in memory, and [`Registry::commit`] writes it back
//! atomically only if something changed. The [`dispatch`] module fans an
//! action out to every resolved device and aggregates results in
//! resolution order, isolating per-device failures.

pub mod dispatch;
pub mod error;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod store;

pub use dispatch::{Action, DEFAULT_CONCURRENCY, DeviceResult, execute};
pub use error::CoreError;
pub use model::{Capability, Device, capabilities_from_components};
pub use registry::Registry;
pub use resolve::{resolve, resolve_single};
pub use store::{DeviceRecord, Store};

// Re-export the client surface so the CLI depends on core alone.
pub use plugctl_api::{Error as ApiError, LedMode, PlugClient, TransportConfig};
