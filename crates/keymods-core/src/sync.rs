// Keymods Settings Sync
// Two-way binding between the preset reconcilers and a settings store

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use strum::IntoEnumIterator;

use crate::reconciler::{GroupStatus, PresetMatch, PresetReconciler, SymbolChange};
use crate::settings::{ChangeHandler, HandlerId, SettingValue, SettingsError, SettingsStore};
use crate::symbols::{parse_mapping_lines, KeyGroup, SymbolError, SymbolKey};

/// A key changed by someone other than this sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalChange {
    Symbol(SymbolKey, String),
    Snapshot(KeyGroup),
}

#[derive(Debug)]
struct Shared {
    reconcilers: IndexMap<KeyGroup, PresetReconciler>,
    external: Vec<ExternalChange>,
}

impl Shared {
    fn group_mut(&mut self, group: KeyGroup) -> &mut PresetReconciler {
        self.reconcilers
            .entry(group)
            .or_insert_with(|| PresetReconciler::new(group))
    }
}

/// Keeps one [`PresetReconciler`] per key group in step with a store.
///
/// Local edits are written through with the sync's own change handler
/// blocked, so they never come back as external changes. Changes made by
/// anyone else reach the reconcilers through the handlers.
#[derive(Debug)]
pub struct SettingsSync {
    shared: Rc<RefCell<Shared>>,
    handlers: HashMap<String, HandlerId>,
}

impl SettingsSync {
    /// Load every group from the store and subscribe to its keys
    pub fn attach(store: &mut dyn SettingsStore) -> Self {
        let mut reconcilers = IndexMap::new();
        for group in KeyGroup::iter() {
            let mut reconciler = PresetReconciler::new(group);
            for key in group.keys() {
                match store.get_string(key.name()) {
                    Ok(value) => reconciler.load_current([(*key, value)]),
                    Err(err) => log::warn!("cannot read {}: {}, using default", key, err),
                }
            }
            match store.get_compound(group.snapshot_key()) {
                Ok(snapshot) => reconciler.load_snapshot(&snapshot),
                Err(err) => log::warn!("cannot read {}: {}", group.snapshot_key(), err),
            }
            reconcilers.insert(group, reconciler);
        }

        let shared = Rc::new(RefCell::new(Shared {
            reconcilers,
            external: Vec::new(),
        }));

        let mut handlers = HashMap::new();
        for key in SymbolKey::iter() {
            let id = store.on_changed(key.name(), symbol_handler(&shared, key));
            handlers.insert(key.name().to_string(), id);
        }
        for group in KeyGroup::iter() {
            let id = store.on_changed(group.snapshot_key(), snapshot_handler(&shared, group));
            handlers.insert(group.snapshot_key().to_string(), id);
        }

        Self { shared, handlers }
    }

    /// Unsubscribe every handler from the store
    pub fn detach(self, store: &mut dyn SettingsStore) {
        for id in self.handlers.into_values() {
            store.disconnect(id);
        }
    }

    /// Read access to a group's reconciler
    pub fn reconciler(&self, group: KeyGroup) -> Ref<'_, PresetReconciler> {
        Ref::map(self.shared.borrow(), |shared| &shared.reconcilers[&group])
    }

    pub fn status(&self, group: KeyGroup) -> GroupStatus {
        self.reconciler(group).status()
    }

    /// Current value of a symbol key
    pub fn value(&self, key: SymbolKey) -> String {
        self.reconciler(key.group())
            .current(key)
            .unwrap_or_default()
            .to_string()
    }

    /// Changes received from the store since the last call
    pub fn take_external_changes(&mut self) -> Vec<ExternalChange> {
        std::mem::take(&mut self.shared.borrow_mut().external)
    }

    /// Apply a preset selector choice and persist the changed keys
    pub fn select(
        &mut self,
        store: &mut dyn SettingsStore,
        group: KeyGroup,
        choice: PresetMatch,
    ) -> Result<GroupStatus, SettingsError> {
        let update = self.shared.borrow_mut().group_mut(group).select(choice);
        self.write_changes(store, &update.changes)?;
        Ok(update.status)
    }

    /// Apply a field edit and persist it
    pub fn edit(
        &mut self,
        store: &mut dyn SettingsStore,
        key: SymbolKey,
        value: &str,
    ) -> Result<GroupStatus, SettingsError> {
        let update = self.shared.borrow_mut().group_mut(key.group()).edit(key, value);
        self.write_changes(store, &update.changes)?;
        Ok(update.status)
    }

    /// Save the group's current values as its snapshot, in one write
    pub fn save(
        &mut self,
        store: &mut dyn SettingsStore,
        group: KeyGroup,
    ) -> Result<GroupStatus, SettingsError> {
        let (snapshot, status) = self.shared.borrow_mut().group_mut(group).save_snapshot();
        let key = group.snapshot_key();
        self.write_blocked(store, key, |store| store.set_compound(key, &snapshot))?;
        Ok(status)
    }

    /// Restore a key to its default through the store.
    ///
    /// The store reports the restore like any external change, so the
    /// reconciler learns the new value from its handler.
    pub fn restore_default(
        &mut self,
        store: &mut dyn SettingsStore,
        key: SymbolKey,
    ) -> Result<GroupStatus, SettingsError> {
        store.reset(key.name())?;
        Ok(self.status(key.group()))
    }

    /// Apply `key=value` mapping lines as field edits.
    ///
    /// Returns the lines that could not be applied. Every parsed entry is
    /// written even if an earlier write fails; the first failure is returned.
    pub fn import(
        &mut self,
        store: &mut dyn SettingsStore,
        text: &str,
    ) -> Result<Vec<SymbolError>, SettingsError> {
        let (entries, rejected) = parse_mapping_lines(text);
        let mut first_error = None;
        for (key, value) in &entries {
            if let Err(err) = self.edit(store, *key, value) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(rejected),
        }
    }

    fn write_changes(
        &self,
        store: &mut dyn SettingsStore,
        changes: &[SymbolChange],
    ) -> Result<(), SettingsError> {
        let mut first_error = None;
        for change in changes {
            let key = change.key.name();
            log::debug!("writing {}", change);
            if let Err(err) = self.write_blocked(store, key, |store| store.set_string(key, &change.value)) {
                log::warn!("cannot persist {}: {}", key, err);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn write_blocked<F>(
        &self,
        store: &mut dyn SettingsStore,
        key: &str,
        write: F,
    ) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut dyn SettingsStore) -> Result<(), SettingsError>,
    {
        let id = self.handlers.get(key).copied();
        if let Some(id) = id {
            store.block_handler(id);
        }
        let result = write(&mut *store);
        if let Some(id) = id {
            store.unblock_handler(id);
        }
        result
    }
}

fn symbol_handler(shared: &Rc<RefCell<Shared>>, key: SymbolKey) -> ChangeHandler {
    let shared = Rc::clone(shared);
    Box::new(move |name: &str, value: &SettingValue| {
        let Some(value) = value.as_str() else {
            log::warn!("{} changed to a non-string value", name);
            return;
        };
        let Ok(mut shared) = shared.try_borrow_mut() else {
            log::warn!("re-entrant change of {} dropped", name);
            return;
        };
        let group = key.group();
        let before = shared.group_mut(group).current(key).map(str::to_string);
        let status = shared.group_mut(group).on_external_key_changed(key, value);
        if before.as_deref() != Some(value) {
            shared
                .external
                .push(ExternalChange::Symbol(key, value.to_string()));
        }
        log::debug!("{} changed externally, {:?} now {:?}", name, group, status.selection);
    })
}

fn snapshot_handler(shared: &Rc<RefCell<Shared>>, group: KeyGroup) -> ChangeHandler {
    let shared = Rc::clone(shared);
    Box::new(move |name: &str, value: &SettingValue| {
        let SettingValue::Compound(snapshot) = value else {
            log::warn!("{} changed to a non-compound value", name);
            return;
        };
        let Ok(mut shared) = shared.try_borrow_mut() else {
            log::warn!("re-entrant change of {} dropped", name);
            return;
        };
        shared.group_mut(group).on_external_snapshot_changed(snapshot);
        shared.external.push(ExternalChange::Snapshot(group));
    })
}
