// Keymods Symbol Table
// Display symbols for every modifier plus the latch/lock markers and wrapper

use std::fmt;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

use crate::modifier::ModifierIdentity;

/// Settings key for one displayed symbol.
///
/// The string form is the key name in the settings store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, AsRefStr, IntoStaticStr,
)]
pub enum SymbolKey {
    #[strum(serialize = "shift-symbol")]
    Shift,
    #[strum(serialize = "caps-lock-symbol")]
    CapsLock,
    #[strum(serialize = "control-symbol")]
    Control,
    #[strum(serialize = "mod1-symbol")]
    Mod1,
    #[strum(serialize = "mod2-symbol")]
    Mod2,
    #[strum(serialize = "mod3-symbol")]
    Mod3,
    #[strum(serialize = "mod4-symbol")]
    Mod4,
    #[strum(serialize = "mod5-symbol")]
    Mod5,
    #[strum(serialize = "latch-symbol")]
    Latch,
    #[strum(serialize = "lock-symbol")]
    Lock,
    #[strum(serialize = "icon")]
    Icon,
    #[strum(serialize = "opening")]
    Opening,
    #[strum(serialize = "closing")]
    Closing,
}

impl SymbolKey {
    /// Settings key name
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Key holding the symbol of a modifier
    pub fn for_modifier(identity: ModifierIdentity) -> SymbolKey {
        match identity {
            ModifierIdentity::Shift => SymbolKey::Shift,
            ModifierIdentity::CapsLock => SymbolKey::CapsLock,
            ModifierIdentity::Control => SymbolKey::Control,
            ModifierIdentity::Mod1 => SymbolKey::Mod1,
            ModifierIdentity::Mod2 => SymbolKey::Mod2,
            ModifierIdentity::Mod3 => SymbolKey::Mod3,
            ModifierIdentity::Mod4 => SymbolKey::Mod4,
            ModifierIdentity::Mod5 => SymbolKey::Mod5,
        }
    }

    /// Modifier this key belongs to, if it is a modifier key
    pub fn modifier(self) -> Option<ModifierIdentity> {
        ModifierIdentity::iter().find(|id| SymbolKey::for_modifier(*id) == self)
    }

    /// Group this key is edited in
    pub fn group(self) -> KeyGroup {
        match self {
            SymbolKey::Latch | SymbolKey::Lock => KeyGroup::Accessibility,
            SymbolKey::Icon | SymbolKey::Opening | SymbolKey::Closing => KeyGroup::Wrapper,
            _ => KeyGroup::Modifiers,
        }
    }

    /// Row label for the preferences surface
    pub fn label(self) -> &'static str {
        match self.modifier() {
            Some(identity) => identity.label(),
            None => match self {
                SymbolKey::Latch => "Latch symbol",
                SymbolKey::Lock => "Lock symbol",
                SymbolKey::Icon => "Icon",
                SymbolKey::Opening => "Opening",
                _ => "Closing",
            },
        }
    }

    /// Built-in default symbol
    pub fn default_symbol(self) -> &'static str {
        match self {
            SymbolKey::Shift => "⇧",
            SymbolKey::CapsLock => "⇬",
            SymbolKey::Control => "⋀",
            SymbolKey::Mod1 => "⌥",
            SymbolKey::Mod2 => "①",
            SymbolKey::Mod3 => "◆",
            SymbolKey::Mod4 => "⌘",
            SymbolKey::Mod5 => "⎇",
            SymbolKey::Latch => "'",
            SymbolKey::Lock => "◦",
            SymbolKey::Icon | SymbolKey::Opening | SymbolKey::Closing => "",
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Set of keys edited together in the preferences surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum KeyGroup {
    Modifiers,
    Accessibility,
    Wrapper,
}

impl KeyGroup {
    /// Keys of this group in display order
    pub fn keys(self) -> &'static [SymbolKey] {
        match self {
            KeyGroup::Modifiers => &[
                SymbolKey::Shift,
                SymbolKey::CapsLock,
                SymbolKey::Control,
                SymbolKey::Mod1,
                SymbolKey::Mod2,
                SymbolKey::Mod3,
                SymbolKey::Mod4,
                SymbolKey::Mod5,
            ],
            KeyGroup::Accessibility => &[SymbolKey::Latch, SymbolKey::Lock],
            KeyGroup::Wrapper => &[SymbolKey::Icon, SymbolKey::Opening, SymbolKey::Closing],
        }
    }

    /// Settings key of the compound saved snapshot for this group
    pub fn snapshot_key(self) -> &'static str {
        match self {
            KeyGroup::Modifiers => "saved-modifiers",
            KeyGroup::Accessibility => "saved-accessibility",
            KeyGroup::Wrapper => "saved-wrapper",
        }
    }

    /// Resolve a group from its snapshot key
    pub fn from_snapshot_key(key: &str) -> Option<KeyGroup> {
        KeyGroup::iter().find(|group| group.snapshot_key() == key)
    }

    pub fn title(self) -> &'static str {
        match self {
            KeyGroup::Modifiers => "MODIFIERS",
            KeyGroup::Accessibility => "ACCESSIBILITY",
            KeyGroup::Wrapper => "WRAPPER",
        }
    }

    /// Whether the key belongs to this group
    pub fn contains(self, key: SymbolKey) -> bool {
        key.group() == self
    }
}

/// Errors from symbol mapping input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolError {
    #[error("unknown symbol key: {0}")]
    UnknownKey(String),

    #[error("line {0}: expected key=value")]
    MalformedLine(usize),
}

/// Symbols the indicator renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    modifiers: [String; 8],
    pub latch_symbol: String,
    pub lock_symbol: String,
    pub icon: String,
    pub opening: String,
    pub closing: String,
}

impl SymbolTable {
    /// Table with every entry empty
    pub fn empty() -> Self {
        Self {
            modifiers: Default::default(),
            latch_symbol: String::new(),
            lock_symbol: String::new(),
            icon: String::new(),
            opening: String::new(),
            closing: String::new(),
        }
    }

    /// Symbol shown for a modifier
    pub fn symbol(&self, identity: ModifierIdentity) -> &str {
        &self.modifiers[identity.index()]
    }

    pub fn set_symbol(&mut self, identity: ModifierIdentity, symbol: impl Into<String>) {
        self.modifiers[identity.index()] = symbol.into();
    }

    /// Value stored under a settings key
    pub fn get(&self, key: SymbolKey) -> &str {
        if let Some(identity) = key.modifier() {
            return self.symbol(identity);
        }
        match key {
            SymbolKey::Latch => &self.latch_symbol,
            SymbolKey::Lock => &self.lock_symbol,
            SymbolKey::Icon => &self.icon,
            SymbolKey::Opening => &self.opening,
            _ => &self.closing,
        }
    }

    /// Update the value of a settings key, returning true if it changed
    pub fn set(&mut self, key: SymbolKey, value: &str) -> bool {
        if self.get(key) == value {
            return false;
        }
        let value = value.to_string();
        if let Some(identity) = key.modifier() {
            self.set_symbol(identity, value);
            return true;
        }
        match key {
            SymbolKey::Latch => self.latch_symbol = value,
            SymbolKey::Lock => self.lock_symbol = value,
            SymbolKey::Icon => self.icon = value,
            SymbolKey::Opening => self.opening = value,
            _ => self.closing = value,
        }
        true
    }

    /// All entries as `(key, value)` pairs in schema order
    pub fn entries(&self) -> impl Iterator<Item = (SymbolKey, &str)> + '_ {
        SymbolKey::iter().map(move |key| (key, self.get(key)))
    }

    /// Render the table as `key=value` lines
    pub fn to_mapping_lines(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.entries() {
            out.push_str(key.name());
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

/// Parse `key=value` lines, skipping blank lines and `#` comments.
///
/// Values are taken verbatim after the first `=`, so symbols may contain
/// spaces. Bad lines are reported and do not stop the remaining ones.
pub fn parse_mapping_lines(text: &str) -> (Vec<(SymbolKey, String)>, Vec<SymbolError>) {
    let mut entries = Vec::new();
    let mut errors = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            log::warn!("skipping mapping line {}: no '='", index + 1);
            errors.push(SymbolError::MalformedLine(index + 1));
            continue;
        };
        match SymbolKey::from_str(name.trim()) {
            Ok(key) => entries.push((key, value.to_string())),
            Err(_) => {
                log::warn!("skipping mapping line {}: unknown key '{}'", index + 1, name.trim());
                errors.push(SymbolError::UnknownKey(name.trim().to_string()));
            }
        }
    }
    (entries, errors)
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for key in SymbolKey::iter() {
            table.set(key, key.default_symbol());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_key_names() {
        assert_eq!(SymbolKey::Shift.name(), "shift-symbol");
        assert_eq!(SymbolKey::Mod5.name(), "mod5-symbol");
        assert_eq!(SymbolKey::from_str("latch-symbol").unwrap(), SymbolKey::Latch);
        assert!(SymbolKey::from_str("hyper-symbol").is_err());
    }

    #[test]
    fn test_every_modifier_has_one_key() {
        for identity in ModifierIdentity::iter() {
            let key = SymbolKey::for_modifier(identity);
            assert_eq!(key.modifier(), Some(identity));
            assert_eq!(key.group(), KeyGroup::Modifiers);
        }
        assert_eq!(SymbolKey::Icon.modifier(), None);
    }

    #[test]
    fn test_groups_partition_keys() {
        let total: usize = KeyGroup::iter().map(|g| g.keys().len()).sum();
        assert_eq!(total, SymbolKey::iter().count());
        for group in KeyGroup::iter() {
            for key in group.keys() {
                assert!(group.contains(*key));
            }
        }
    }

    #[test]
    fn test_default_table() {
        let table = SymbolTable::default();
        assert_eq!(table.symbol(ModifierIdentity::Shift), "⇧");
        assert_eq!(table.symbol(ModifierIdentity::Mod4), "⌘");
        assert_eq!(table.latch_symbol, "'");
        assert_eq!(table.lock_symbol, "◦");
        assert!(table.icon.is_empty());
    }

    #[test]
    fn test_set_reports_change() {
        let mut table = SymbolTable::default();
        assert!(!table.set(SymbolKey::Shift, "⇧"));
        assert!(table.set(SymbolKey::Shift, "S"));
        assert_eq!(table.get(SymbolKey::Shift), "S");
        assert!(table.set(SymbolKey::Closing, "]"));
        assert_eq!(table.closing, "]");
    }

    #[test]
    fn test_mapping_lines() {
        let (entries, errors) =
            parse_mapping_lines("# comment\nshift-symbol=Shift \nopening=[\nhyper-symbol=H\nbroken\n");
        assert_eq!(
            entries,
            vec![
                (SymbolKey::Shift, "Shift ".to_string()),
                (SymbolKey::Opening, "[".to_string())
            ]
        );
        assert_eq!(
            errors,
            vec![
                SymbolError::UnknownKey("hyper-symbol".to_string()),
                SymbolError::MalformedLine(5)
            ]
        );
    }

    #[test]
    fn test_mapping_lines_export() {
        let table = SymbolTable::default();
        let text = table.to_mapping_lines();
        assert!(text.starts_with("shift-symbol=⇧\n"));
        assert!(text.contains("lock-symbol=◦\n"));

        let (entries, errors) = parse_mapping_lines(&text);
        assert!(errors.is_empty());
        let mut copy = SymbolTable::empty();
        for (key, value) in &entries {
            copy.set(*key, value);
        }
        assert_eq!(copy, table);
    }
}
