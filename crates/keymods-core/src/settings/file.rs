// Keymods TOML Settings Store
// File-backed store; other processes' edits are picked up by reload()

#![cfg(feature = "pure-rust")]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    schema_default, schema_keys, ChangeHandler, Compound, HandlerId, MemoryStore, SettingValue,
    SettingsError, SettingsStore,
};

const SAVED_PREFIX: &str = "saved-";

/// On-disk layout of the settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsDoc {
    #[serde(default)]
    symbols: BTreeMap<String, String>,

    /// Snapshots keyed by group name (`modifiers`, `accessibility`, `wrapper`)
    #[serde(default)]
    saved: BTreeMap<String, Compound>,
}

/// Settings store persisted as a TOML document
#[derive(Debug)]
pub struct TomlStore {
    path: PathBuf,
    cache: MemoryStore,
}

impl TomlStore {
    /// Open the store at `path`. A missing file means all defaults.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let mut cache = MemoryStore::new();
        for (key, value) in read_values(&path)? {
            cache.store(&key, value)?;
        }
        Ok(Self { path, cache })
    }

    /// Open the store at the default location
    pub fn open_default() -> Result<Self, SettingsError> {
        let path = super::default_path()
            .ok_or_else(|| SettingsError::Unavailable("no config directory".to_string()))?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and notify handlers of every key that changed.
    ///
    /// Returns the number of changed keys.
    pub fn reload(&mut self) -> Result<usize, SettingsError> {
        let mut fresh = read_values(&self.path)?;
        let mut changed = 0;
        for key in schema_keys() {
            // Keys missing from the file fall back to their default
            let Some(value) = fresh.remove(key).or_else(|| schema_default(key)) else {
                continue;
            };
            if self.cache.store(key, value)? {
                log::debug!("settings key {} changed on disk", key);
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn persist(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        self.cache.check(key, &value)?;
        // Merge what other processes wrote since the last reload, so the
        // rewrite below keeps their keys
        self.reload()?;
        if self.cache.value(key)? == value {
            return Ok(());
        }

        let mut doc = self.document();
        match &value {
            SettingValue::String(s) => {
                doc.symbols.insert(key.to_string(), s.clone());
            }
            SettingValue::Compound(map) => {
                let group = key.strip_prefix(SAVED_PREFIX).unwrap_or(key);
                doc.saved.insert(group.to_string(), map.clone());
            }
        }
        write_atomic(&self.path, &doc)?;
        self.cache.store(key, value)?;
        Ok(())
    }

    fn document(&self) -> SettingsDoc {
        let mut doc = SettingsDoc::default();
        for (key, value) in self.cache.explicit_values() {
            match value {
                SettingValue::String(s) => {
                    doc.symbols.insert(key.clone(), s.clone());
                }
                SettingValue::Compound(map) => {
                    let group = key.strip_prefix(SAVED_PREFIX).unwrap_or(key);
                    doc.saved.insert(group.to_string(), map.clone());
                }
            }
        }
        doc
    }
}

impl SettingsStore for TomlStore {
    fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        self.cache.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.persist(key, SettingValue::String(value.to_string()))
    }

    fn get_compound(&self, key: &str) -> Result<Compound, SettingsError> {
        self.cache.get_compound(key)
    }

    fn set_compound(&mut self, key: &str, value: &Compound) -> Result<(), SettingsError> {
        self.persist(key, SettingValue::Compound(value.clone()))
    }

    fn reset(&mut self, key: &str) -> Result<(), SettingsError> {
        let default = schema_default(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        self.persist(key, default)
    }

    fn on_changed(&mut self, key: &str, handler: ChangeHandler) -> HandlerId {
        self.cache.on_changed(key, handler)
    }

    fn disconnect(&mut self, id: HandlerId) {
        self.cache.disconnect(id);
    }

    fn block_handler(&mut self, id: HandlerId) {
        self.cache.block_handler(id);
    }

    fn unblock_handler(&mut self, id: HandlerId) {
        self.cache.unblock_handler(id);
    }
}

/// Parse the settings file into schema values, skipping unknown keys
fn read_values(path: &Path) -> Result<BTreeMap<String, SettingValue>, SettingsError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path)?;
    let doc: SettingsDoc =
        toml::from_str(&content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

    let mut values = BTreeMap::new();
    for (key, value) in doc.symbols {
        if schema_default(&key).is_some() {
            values.insert(key, SettingValue::String(value));
        } else {
            log::warn!("{}: unknown symbol key '{}', skipping", path.display(), key);
        }
    }
    for (group, snapshot) in doc.saved {
        let key = format!("{}{}", SAVED_PREFIX, group);
        if schema_default(&key).is_some() {
            values.insert(key, SettingValue::Compound(snapshot));
        } else {
            log::warn!("{}: unknown snapshot group '{}', skipping", path.display(), group);
        }
    }
    Ok(values)
}

fn write_atomic(path: &Path, doc: &SettingsDoc) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp = path.with_extension("toml.tmp");
    let rendered =
        toml::to_string_pretty(doc).map_err(|e| SettingsError::TomlParse(e.to_string()))?;
    fs::write(&temp, rendered)?;
    fs::rename(&temp, path)?;
    Ok(())
}
