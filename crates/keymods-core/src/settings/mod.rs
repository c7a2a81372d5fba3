// Keymods Settings
// Narrow key-value store interface used for symbols and saved snapshots

mod handlers;
mod memory;

#[cfg(feature = "pure-rust")]
mod file;

use std::collections::BTreeMap;
use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::symbols::{KeyGroup, SymbolKey};

pub use handlers::{ChangeHandler, HandlerId, HandlerRegistry};
pub use memory::MemoryStore;

#[cfg(feature = "pure-rust")]
pub use file::TomlStore;

/// String-to-string mapping stored under one key
pub type Compound = BTreeMap<String, String>;

/// Value held by a settings key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    String(String),
    Compound(Compound),
}

impl SettingValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            SettingValue::Compound(_) => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            SettingValue::String(_) => None,
            SettingValue::Compound(map) => Some(map),
        }
    }
}

/// Errors that can occur when reading or writing settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("unknown settings key: {0}")]
    UnknownKey(String),

    #[error("settings key {0} has a different type")]
    TypeMismatch(String),

    #[error("settings store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store holding the indicator settings.
///
/// Change handlers run synchronously, inside the call that changed the
/// value, unless they are blocked. A handler must not call back into the
/// store that invokes it.
pub trait SettingsStore {
    fn get_string(&self, key: &str) -> Result<String, SettingsError>;

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;

    fn get_compound(&self, key: &str) -> Result<Compound, SettingsError>;

    fn set_compound(&mut self, key: &str, value: &Compound) -> Result<(), SettingsError>;

    /// Restore a key to its schema default
    fn reset(&mut self, key: &str) -> Result<(), SettingsError>;

    /// Register a handler for changes of `key`
    fn on_changed(&mut self, key: &str, handler: ChangeHandler) -> HandlerId;

    fn disconnect(&mut self, id: HandlerId);

    /// Suppress a handler until it is unblocked
    fn block_handler(&mut self, id: HandlerId);

    fn unblock_handler(&mut self, id: HandlerId);
}

/// Default value of a schema key, `None` for keys outside the schema
pub fn schema_default(key: &str) -> Option<SettingValue> {
    if let Ok(symbol) = SymbolKey::from_str(key) {
        return Some(SettingValue::String(symbol.default_symbol().to_string()));
    }
    KeyGroup::from_snapshot_key(key).map(|_| SettingValue::Compound(Compound::new()))
}

/// Every key of the schema
pub fn schema_keys() -> impl Iterator<Item = &'static str> {
    SymbolKey::iter()
        .map(SymbolKey::name)
        .chain(KeyGroup::iter().map(KeyGroup::snapshot_key))
}

/// Default settings location (~/.config/keymods/settings.toml)
pub fn default_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|p| p.join("keymods").join("settings.toml"))
}
