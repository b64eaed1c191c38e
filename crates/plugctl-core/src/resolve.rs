// ── Target resolution ──
//
// A target expression denotes `all`, a group name, an alias, or an hw_id,
// checked in that order with first match winning; groups shadow aliases
// that happen to share their name. Group members are references by alias
// or hw_id; a member that no longer matches any device is skipped with a
// warning, never an error, so removed devices may leave stale entries
// behind without breaking the group.

use tracing::warn;

use crate::error::CoreError;
use crate::model::Device;
use crate::store::Store;

/// The reserved target expression denoting every registered device.
pub const ALL: &str = "all";

/// Resolve a target expression to an ordered device set, deduplicated by
/// hw_id.
pub fn resolve(store: &Store, target: &str) -> Result<Vec<Device>, CoreError> {
    if target == ALL {
        return Ok(store.all_devices());
    }

    if let Some(members) = store.groups.get(target) {
        let mut out: Vec<Device> = Vec::new();
        for member in members {
            if member == ALL {
                for device in store.all_devices() {
                    push_unique(&mut out, device);
                }
                continue;
            }
            match resolve_ref(store, member) {
                Some(device) => push_unique(&mut out, device),
                None => {
                    warn!(group = %target, member = %member, "group member did not resolve, skipping");
                }
            }
        }
        return Ok(out);
    }

    resolve_ref(store, target)
        .map(|device| vec![device])
        .ok_or_else(|| CoreError::UnknownTarget {
            target: target.to_owned(),
        })
}

/// Resolve a single concrete identifier (alias or hw_id; not a group or
/// `all`). Used by `remove` and `rename`, which only accept one device.
pub fn resolve_single(store: &Store, target: &str) -> Result<Device, CoreError> {
    resolve_ref(store, target).ok_or_else(|| CoreError::UnknownTarget {
        target: target.to_owned(),
    })
}

/// Alias match first, hw_id second.
fn resolve_ref(store: &Store, reference: &str) -> Option<Device> {
    store
        .device_by_alias(reference)
        .or_else(|| store.device(reference))
}

fn push_unique(out: &mut Vec<Device>, device: Device) {
    if !out.iter().any(|d| d.hw_id == device.hw_id) {
        out.push(device);
    }
}
