// Keymods In-Memory Settings Store

use std::collections::BTreeMap;

use super::{
    schema_default, ChangeHandler, Compound, HandlerId, HandlerRegistry, SettingValue,
    SettingsError, SettingsStore,
};

/// Settings store that keeps values in memory.
///
/// Used directly by tests and previews, and as the cache behind
/// [`TomlStore`](super::TomlStore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, SettingValue>,
    handlers: HandlerRegistry,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write with [`SettingsError::Unavailable`]
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Value of a schema key, falling back to its default
    pub fn value(&self, key: &str) -> Result<SettingValue, SettingsError> {
        if let Some(value) = self.values.get(key) {
            return Ok(value.clone());
        }
        schema_default(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))
    }

    /// Check that `value` has the schema type of `key`
    pub fn check(&self, key: &str, value: &SettingValue) -> Result<(), SettingsError> {
        let default = schema_default(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        match (default, value) {
            (SettingValue::String(_), SettingValue::String(_))
            | (SettingValue::Compound(_), SettingValue::Compound(_)) => Ok(()),
            _ => Err(SettingsError::TypeMismatch(key.to_string())),
        }
    }

    /// Store a value and notify handlers if it changed.
    ///
    /// Returns true if the value changed.
    pub fn store(&mut self, key: &str, value: SettingValue) -> Result<bool, SettingsError> {
        if self.read_only {
            return Err(SettingsError::Unavailable(format!("{} is read-only", key)));
        }
        self.check(key, &value)?;
        if self.value(key)? == value {
            return Ok(false);
        }
        self.values.insert(key.to_string(), value.clone());
        self.handlers.emit(key, &value);
        Ok(true)
    }

    /// Values explicitly set, without defaults
    pub fn explicit_values(&self) -> &BTreeMap<String, SettingValue> {
        &self.values
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl SettingsStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        match self.value(key)? {
            SettingValue::String(s) => Ok(s),
            SettingValue::Compound(_) => Err(SettingsError::TypeMismatch(key.to_string())),
        }
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.store(key, SettingValue::String(value.to_string()))
            .map(|_| ())
    }

    fn get_compound(&self, key: &str) -> Result<Compound, SettingsError> {
        match self.value(key)? {
            SettingValue::Compound(map) => Ok(map),
            SettingValue::String(_) => Err(SettingsError::TypeMismatch(key.to_string())),
        }
    }

    fn set_compound(&mut self, key: &str, value: &Compound) -> Result<(), SettingsError> {
        self.store(key, SettingValue::Compound(value.clone()))
            .map(|_| ())
    }

    fn reset(&mut self, key: &str) -> Result<(), SettingsError> {
        let default = schema_default(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        self.store(key, default)?;
        self.values.remove(key);
        Ok(())
    }

    fn on_changed(&mut self, key: &str, handler: ChangeHandler) -> HandlerId {
        self.handlers.connect(key, handler)
    }

    fn disconnect(&mut self, id: HandlerId) {
        self.handlers.disconnect(id);
    }

    fn block_handler(&mut self, id: HandlerId) {
        self.handlers.block(id);
    }

    fn unblock_handler(&mut self, id: HandlerId) {
        self.handlers.unblock(id);
    }
}
