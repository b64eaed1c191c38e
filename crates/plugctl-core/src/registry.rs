// ── Registry: load-once / mutate / save-once store wrapper ──
//
// Mutations validate first and only then touch the store, so a failed
// operation leaves the registry exactly as loaded and nothing is
// persisted. `commit` writes at most once, and only when dirty.

use std::collections::BTreeSet;
use std::path::PathBuf;

use plugctl_api::PlugClient;

use crate::error::CoreError;
use crate::model::{self, Device};
use crate::resolve::{resolve, resolve_single};
use crate::store::{DeviceRecord, Store};

/// The persistent device/group registry for one command invocation.
pub struct Registry {
    store: Store,
    path: PathBuf,
    dirty: bool,
}

impl Registry {
    /// Load the registry from `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let store = Store::load(&path)?;
        Ok(Self {
            store,
            path,
            dirty: false,
        })
    }

    /// Read access to the underlying store (for resolution and listing).
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Whether any mutation succeeded since load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the store atomically, once, if anything changed.
    pub fn commit(&self) -> Result<(), CoreError> {
        if self.dirty {
            self.store.save(&self.path)?;
        }
        Ok(())
    }

    // ── Device lifecycle ─────────────────────────────────────────────

    /// Register a device by address: query it for identity and components,
    /// derive capabilities, and store the record.
    ///
    /// The alias defaults to the reported hw_id. Re-adding a known hw_id
    /// refreshes ip, model, and capabilities in place. Fails without
    /// mutating on alias collision or if the device cannot be reached.
    pub async fn add_device(
        &mut self,
        client: &PlugClient,
        ip: &str,
        alias: Option<&str>,
    ) -> Result<Device, CoreError> {
        let info = client.device_info(ip).await?;
        let components = client.components(ip).await?;
        let capabilities: BTreeSet<_> = model::capabilities_from_components(&components);

        let alias = alias.unwrap_or(&info.id).to_owned();
        if self.store.alias_in_use(&alias, Some(&info.id)) {
            return Err(CoreError::DuplicateAlias { alias });
        }

        let record = DeviceRecord {
            ip: ip.to_owned(),
            alias: alias.clone(),
            model: info.model.clone(),
            capabilities: Some(capabilities.clone()),
        };
        self.store.devices.insert(info.id.clone(), record);
        self.dirty = true;

        Ok(Device {
            hw_id: info.id,
            ip: ip.to_owned(),
            alias,
            model: info.model,
            capabilities,
        })
    }

    /// Remove a device and cascade its alias and hw_id out of every
    /// group's member list. `target` must name exactly one device.
    pub fn remove_device(&mut self, target: &str) -> Result<Device, CoreError> {
        let device = resolve_single(&self.store, target)?;
        self.store.devices.shift_remove(&device.hw_id);
        for members in self.store.groups.values_mut() {
            members.retain(|m| *m != device.hw_id && *m != device.alias);
        }
        self.dirty = true;
        Ok(device)
    }

    /// Change a device's alias. Group entries referencing the old alias
    /// are left as-is and become stale (skipped at resolution).
    pub fn rename_device(&mut self, target: &str, new_alias: &str) -> Result<Device, CoreError> {
        let device = resolve_single(&self.store, target)?;
        if self.store.alias_in_use(new_alias, Some(&device.hw_id)) {
            return Err(CoreError::DuplicateAlias {
                alias: new_alias.to_owned(),
            });
        }
        if let Some(record) = self.store.devices.get_mut(&device.hw_id) {
            record.alias = new_alias.to_owned();
        }
        self.dirty = true;
        Ok(Device {
            alias: new_alias.to_owned(),
            ..device
        })
    }

    // ── Group lifecycle ──────────────────────────────────────────────

    /// Create an empty group.
    pub fn create_group(&mut self, name: &str) -> Result<(), CoreError> {
        if self.store.groups.contains_key(name) {
            return Err(CoreError::DuplicateGroup {
                name: name.to_owned(),
            });
        }
        self.store.groups.insert(name.to_owned(), Vec::new());
        self.dirty = true;
        Ok(())
    }

    /// Delete a group outright; member devices are unaffected.
    pub fn delete_group(&mut self, name: &str) -> Result<(), CoreError> {
        if self.store.groups.shift_remove(name).is_none() {
            return Err(CoreError::UnknownTarget {
                target: name.to_owned(),
            });
        }
        self.dirty = true;
        Ok(())
    }

    /// Add members to a group. The target expands through the resolver at
    /// edit time (`group add office all` is legal); a reference that does
    /// not resolve yet is stored literally, tolerated until resolution.
    /// Returns the member identities actually appended.
    pub fn group_add(&mut self, name: &str, target: &str) -> Result<Vec<String>, CoreError> {
        if !self.store.groups.contains_key(name) {
            return Err(CoreError::UnknownTarget {
                target: name.to_owned(),
            });
        }

        let idents = self.expand_member_idents(target)?;
        let Some(members) = self.store.groups.get_mut(name) else {
            return Err(CoreError::UnknownTarget {
                target: name.to_owned(),
            });
        };

        let mut added = Vec::new();
        for ident in idents {
            if !members.contains(&ident) {
                members.push(ident.clone());
                added.push(ident);
            }
        }
        if !added.is_empty() {
            self.dirty = true;
        }
        Ok(added)
    }

    /// Remove members from a group; both the alias and hw_id forms of each
    /// resolved device are dropped. Removing references that are not
    /// present is a no-op, not an error. Returns the removed entries.
    pub fn group_remove(&mut self, name: &str, target: &str) -> Result<Vec<String>, CoreError> {
        if !self.store.groups.contains_key(name) {
            return Err(CoreError::UnknownTarget {
                target: name.to_owned(),
            });
        }

        // Every string form that may appear in the member list.
        let mut forms: Vec<String> = Vec::new();
        match resolve(&self.store, target) {
            Ok(devices) => {
                for device in devices {
                    forms.push(device.alias.clone());
                    forms.push(device.hw_id.clone());
                }
            }
            // A stale reference can still be removed literally.
            Err(CoreError::UnknownTarget { target }) => forms.push(target),
            Err(e) => return Err(e),
        }

        let Some(members) = self.store.groups.get_mut(name) else {
            return Err(CoreError::UnknownTarget {
                target: name.to_owned(),
            });
        };

        let mut removed = Vec::new();
        members.retain(|m| {
            if forms.contains(m) {
                removed.push(m.clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            self.dirty = true;
        }
        Ok(removed)
    }

    /// Expand a group-edit target into member identity strings.
    fn expand_member_idents(&self, target: &str) -> Result<Vec<String>, CoreError> {
        match resolve(&self.store, target) {
            Ok(devices) => Ok(devices
                .iter()
                .map(|d| d.member_ident().to_owned())
                .collect()),
            // Not resolvable yet: store the reference as entered.
            Err(CoreError::UnknownTarget { target }) => Ok(vec![target]),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::Capability;

    fn registry_with(store: Store) -> Registry {
        Registry {
            store,
            path: PathBuf::from("/nonexistent/registry.json"),
            dirty: false,
        }
    }

    fn record(ip: &str, alias: &str) -> DeviceRecord {
        DeviceRecord {
            ip: ip.into(),
            alias: alias.into(),
            model: None,
            capabilities: Some(Capability::full_set()),
        }
    }

    fn sample() -> Registry {
        let mut store = Store::default();
        store.devices.insert("hw-1".into(), record("10.0.0.1", "lampe"));
        store.devices.insert("hw-2".into(), record("10.0.0.2", "fan"));
        store
            .groups
            .insert("office".into(), vec!["lampe".into(), "hw-2".into()]);
        registry_with(store)
    }

    #[test]
    fn remove_cascades_into_groups() {
        let mut registry = sample();
        let removed = registry.remove_device("lampe").unwrap();
        assert_eq!(removed.hw_id, "hw-1");
        assert!(registry.store().devices.get("hw-1").is_none());
        assert_eq!(registry.store().groups["office"], vec!["hw-2".to_owned()]);
        assert!(registry.is_dirty());
    }

    #[test]
    fn remove_cascade_strips_both_alias_and_hw_id_forms() {
        let mut registry = sample();
        registry
            .store
            .groups
            .insert("dupes".into(), vec!["lampe".into(), "hw-1".into()]);
        registry.remove_device("hw-1").unwrap();
        assert!(registry.store().groups["dupes"].is_empty());
    }

    #[test]
    fn remove_unknown_target_fails_clean() {
        let mut registry = sample();
        let err = registry.remove_device("ghost").unwrap_err();
        assert!(matches!(err, CoreError::UnknownTarget { .. }));
        assert!(!registry.is_dirty());
    }

    #[test]
    fn rename_rejects_taken_alias_without_mutating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let mut store = Store::default();
        store.devices.insert("hw-1".into(), record("10.0.0.1", "lampe"));
        store.devices.insert("hw-2".into(), record("10.0.0.2", "fan"));
        store
            .groups
            .insert("office".into(), vec!["lampe".into(), "hw-2".into()]);
        store.save(&path).unwrap();
        let before = std::fs::read(&path).unwrap();

        let mut registry = Registry::open(&path).unwrap();
        let err = registry.rename_device("lampe", "fan").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateAlias { alias } if alias == "fan"));
        assert!(!registry.is_dirty());

        // The persisted store survives the failed rename byte-for-byte.
        registry.store().save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn rename_to_own_alias_is_allowed() {
        let mut registry = sample();
        let device = registry.rename_device("lampe", "lampe").unwrap();
        assert_eq!(device.alias, "lampe");
    }

    #[test]
    fn rename_leaves_group_entries_stale() {
        let mut registry = sample();
        registry.rename_device("lampe", "desk-lamp").unwrap();
        // The old alias stays in the member list; resolution skips it.
        assert_eq!(
            registry.store().groups["office"],
            vec!["lampe".to_owned(), "hw-2".to_owned()]
        );
        let resolved = resolve(registry.store(), "office").unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].hw_id, "hw-2");
    }

    #[test]
    fn create_group_rejects_duplicates() {
        let mut registry = sample();
        let err = registry.create_group("office").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateGroup { name } if name == "office"));
    }

    #[test]
    fn delete_group_leaves_devices_alone() {
        let mut registry = sample();
        registry.delete_group("office").unwrap();
        assert!(registry.store().groups.is_empty());
        assert_eq!(registry.store().devices.len(), 2);
    }

    #[test]
    fn delete_unknown_group_fails() {
        let mut registry = sample();
        assert!(matches!(
            registry.delete_group("ghost"),
            Err(CoreError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn group_add_expands_all_at_edit_time() {
        let mut registry = sample();
        registry.create_group("everything").unwrap();
        let added = registry.group_add("everything", "all").unwrap();
        assert_eq!(added, vec!["lampe".to_owned(), "fan".to_owned()]);
    }

    #[test]
    fn group_add_skips_existing_members() {
        let mut registry = sample();
        let added = registry.group_add("office", "lampe").unwrap();
        assert!(added.is_empty());
        assert_eq!(registry.store().groups["office"].len(), 2);
    }

    #[test]
    fn group_add_tolerates_unresolvable_reference() {
        let mut registry = sample();
        let added = registry.group_add("office", "not-added-yet").unwrap();
        assert_eq!(added, vec!["not-added-yet".to_owned()]);
    }

    #[test]
    fn group_add_to_missing_group_fails() {
        let mut registry = sample();
        assert!(matches!(
            registry.group_add("ghost", "lampe"),
            Err(CoreError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn group_remove_drops_both_forms() {
        let mut registry = sample();
        let removed = registry.group_remove("office", "fan").unwrap();
        assert_eq!(removed, vec!["hw-2".to_owned()]);
        assert_eq!(registry.store().groups["office"], vec!["lampe".to_owned()]);
    }

    #[test]
    fn group_remove_of_stale_reference_is_idempotent() {
        let mut registry = sample();
        registry
            .store
            .groups
            .insert("mixed".into(), vec!["ghost".into()]);

        let removed = registry.group_remove("mixed", "ghost").unwrap();
        assert_eq!(removed, vec!["ghost".to_owned()]);

        // Second removal of the same stale reference: no error, no change.
        let removed = registry.group_remove("mixed", "ghost").unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn commit_is_a_no_op_when_clean() {
        // The path does not exist and is not writable; commit must not try.
        let registry = sample();
        registry.commit().unwrap();
    }
}
