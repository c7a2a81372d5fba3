// Keymods Preset Reconciler
// Keeps the preset selection, the symbol fields and the saved snapshot of a
// key group consistent

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::preset::{self, Preset};
use crate::symbols::{KeyGroup, SymbolKey};

/// Entry of the preset selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetMatch {
    /// Index into the group's preset catalog
    Preset(usize),
    /// Current values equal the saved snapshot
    Saved,
    /// Nothing matches
    Custom,
}

/// Selection state exposed after every reconciler entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupStatus {
    pub selection: PresetMatch,
    /// True if current values diverge from the saved snapshot
    pub diverged: bool,
}

/// A symbol value that must be persisted and shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolChange {
    pub key: SymbolKey,
    pub value: String,
}

impl fmt::Display for SymbolChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:?}", self.key, self.value)
    }
}

pub type SymbolChanges = SmallVec<[SymbolChange; 8]>;

/// Result of an operation that may change symbol values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// Changed keys only, in group order
    pub changes: SymbolChanges,
    pub status: GroupStatus,
}

/// Preset and snapshot reconciliation for one key group
#[derive(Debug, Clone)]
pub struct PresetReconciler {
    group: KeyGroup,
    presets: &'static [Preset],
    current: IndexMap<SymbolKey, String>,
    saved: IndexMap<SymbolKey, String>,
}

impl PresetReconciler {
    /// Reconciler over the built-in catalog, starting from default symbols
    pub fn new(group: KeyGroup) -> Self {
        Self::with_catalog(group, preset::catalog(group))
    }

    pub fn with_catalog(group: KeyGroup, presets: &'static [Preset]) -> Self {
        let current = group
            .keys()
            .iter()
            .map(|key| (*key, key.default_symbol().to_string()))
            .collect();
        Self {
            group,
            presets,
            current,
            saved: IndexMap::new(),
        }
    }

    pub fn group(&self) -> KeyGroup {
        self.group
    }

    pub fn presets(&self) -> &'static [Preset] {
        self.presets
    }

    /// Current value of a key, `None` if the key is not in this group
    pub fn current(&self, key: SymbolKey) -> Option<&str> {
        self.current.get(&key).map(|s| s.as_str())
    }

    /// Current values in group order
    pub fn current_values(&self) -> impl Iterator<Item = (SymbolKey, &str)> + '_ {
        self.current.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Whether an explicit save has produced a snapshot
    pub fn has_snapshot(&self) -> bool {
        !self.saved.is_empty()
    }

    fn saved_value(&self, key: SymbolKey) -> &str {
        self.saved.get(&key).map(|s| s.as_str()).unwrap_or("")
    }

    /// Replace current values without emitting changes (initial load)
    pub fn load_current<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = (SymbolKey, S)>,
        S: Into<String>,
    {
        for (key, value) in values {
            match self.current.get_mut(&key) {
                Some(slot) => *slot = value.into(),
                None => log::warn!("{} is not a {:?} key, ignoring", key, self.group),
            }
        }
    }

    /// Replace the saved snapshot with a persisted compound value
    pub fn load_snapshot(&mut self, snapshot: &BTreeMap<String, String>) {
        self.saved.clear();
        for (name, value) in snapshot {
            match self.resolve(name) {
                Some(key) => {
                    self.saved.insert(key, value.clone());
                }
                None => log::warn!("saved snapshot key '{}' is unknown, skipping", name),
            }
        }
    }

    /// Saved snapshot as a compound value, in group order
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.group
            .keys()
            .iter()
            .filter_map(|key| {
                self.saved
                    .get(key)
                    .map(|value| (key.name().to_string(), value.clone()))
            })
            .collect()
    }

    /// True if any current value differs from the saved snapshot
    pub fn current_differs_from_saved(&self) -> bool {
        self.current
            .iter()
            .any(|(key, value)| value != self.saved_value(*key))
    }

    /// First preset matching the current values, else `Saved`, else `Custom`.
    ///
    /// `Saved` needs a snapshot to exist. A group whose values are all empty
    /// reads as `Custom` until it is saved, even though missing snapshot
    /// entries count as empty when measuring divergence.
    pub fn match_preset(&self) -> PresetMatch {
        let hit = self.presets.iter().position(|preset| {
            self.current
                .iter()
                .all(|(key, value)| value == preset.value(key.name()))
        });
        if let Some(index) = hit {
            return PresetMatch::Preset(index);
        }
        if self.has_snapshot() && !self.current_differs_from_saved() {
            return PresetMatch::Saved;
        }
        PresetMatch::Custom
    }

    pub fn status(&self) -> GroupStatus {
        GroupStatus {
            selection: self.match_preset(),
            diverged: self.current_differs_from_saved(),
        }
    }

    /// Apply the catalog preset at `index`
    pub fn apply_preset(&mut self, index: usize) -> Update {
        let Some(preset) = self.presets.get(index).copied() else {
            log::warn!("no {:?} preset at index {}", self.group, index);
            return self.no_change();
        };
        log::debug!("applying {:?} preset '{}'", self.group, preset.name);
        self.apply_entries(preset.entries)
    }

    /// Apply a full value assignment for the group.
    ///
    /// Group keys not named in `entries` are set to "". Names that are not
    /// keys of this group are skipped.
    pub fn apply_entries(&mut self, entries: &[(&str, &str)]) -> Update {
        let mut targets: IndexMap<SymbolKey, &str> =
            self.group.keys().iter().map(|key| (*key, "")).collect();
        for &(name, value) in entries {
            match self.resolve(name) {
                Some(key) => {
                    targets.insert(key, value);
                }
                None => log::warn!("preset key '{}' is unknown, skipping", name),
            }
        }

        let changes = targets
            .into_iter()
            .filter_map(|(key, value)| self.assign(key, value))
            .collect();
        Update {
            changes,
            status: self.status(),
        }
    }

    /// Handle a selection made in the preset selector
    pub fn select(&mut self, choice: PresetMatch) -> Update {
        match choice {
            PresetMatch::Preset(index) => self.apply_preset(index),
            PresetMatch::Saved if self.has_snapshot() => {
                let entries: Vec<(String, String)> = self
                    .group
                    .keys()
                    .iter()
                    .map(|key| (key.name().to_string(), self.saved_value(*key).to_string()))
                    .collect();
                let borrowed: Vec<(&str, &str)> = entries
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                self.apply_entries(&borrowed)
            }
            PresetMatch::Saved | PresetMatch::Custom => self.no_change(),
        }
    }

    /// Handle the user typing into a symbol field
    pub fn edit(&mut self, key: SymbolKey, value: &str) -> Update {
        if !self.group.contains(key) {
            log::warn!("{} is not a {:?} key, ignoring edit", key, self.group);
            return self.no_change();
        }
        let changes = self.assign(key, value).into_iter().collect();
        Update {
            changes,
            status: self.status(),
        }
    }

    /// Copy current values into the snapshot, returning the compound value
    /// to persist in one write
    pub fn save_snapshot(&mut self) -> (BTreeMap<String, String>, GroupStatus) {
        self.saved = self.current.clone();
        log::debug!("saved {:?} snapshot", self.group);
        (self.snapshot(), self.status())
    }

    /// Handle a value change reported by the settings store
    pub fn on_external_key_changed(&mut self, key: SymbolKey, value: &str) -> GroupStatus {
        if !self.group.contains(key) {
            log::warn!("{} is not a {:?} key, ignoring change", key, self.group);
        } else if self.assign(key, value).is_some() {
            log::debug!("external change {} = {:?}", key, value);
        }
        self.status()
    }

    /// Handle a snapshot change reported by the settings store
    pub fn on_external_snapshot_changed(&mut self, snapshot: &BTreeMap<String, String>) -> GroupStatus {
        self.load_snapshot(snapshot);
        self.status()
    }

    fn assign(&mut self, key: SymbolKey, value: &str) -> Option<SymbolChange> {
        let slot = self.current.get_mut(&key)?;
        if slot == value {
            return None;
        }
        *slot = value.to_string();
        Some(SymbolChange {
            key,
            value: value.to_string(),
        })
    }

    fn resolve(&self, name: &str) -> Option<SymbolKey> {
        SymbolKey::from_str(name)
            .ok()
            .filter(|key| self.group.contains(*key))
    }

    fn no_change(&self) -> Update {
        Update {
            changes: SymbolChanges::new(),
            status: self.status(),
        }
    }
}
