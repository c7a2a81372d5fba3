// Keymods Presets
// Compiled-in symbol assignments for each key group

use crate::symbols::KeyGroup;

/// Named, read-only symbol assignment for one key group.
///
/// Entries reference settings keys by name so that a preset written for an
/// older schema still loads; unknown names are skipped when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub entries: &'static [(&'static str, &'static str)],
}

impl Preset {
    /// Value this preset assigns to a key. Keys it does not name map to "".
    pub fn value(&self, key: &str) -> &'static str {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
            .unwrap_or("")
    }
}

const MODIFIER_PRESETS: &[Preset] = &[
    Preset {
        name: "PC",
        entries: &[
            ("shift-symbol", "⇧"),
            ("caps-lock-symbol", "⇬"),
            ("control-symbol", "⋀"),
            ("mod1-symbol", "⌥"),
            ("mod2-symbol", "①"),
            ("mod3-symbol", "◆"),
            ("mod4-symbol", "⌘"),
            ("mod5-symbol", "⎇"),
        ],
    },
    Preset {
        name: "Mac",
        entries: &[
            ("shift-symbol", "⇧"),
            ("caps-lock-symbol", "⇪"),
            ("control-symbol", "⌃"),
            ("mod1-symbol", "⌥"),
            ("mod2-symbol", ""),
            ("mod3-symbol", ""),
            ("mod4-symbol", "⌘"),
            ("mod5-symbol", "⌥"),
        ],
    },
    Preset {
        name: "Text",
        entries: &[
            ("shift-symbol", "Shift "),
            ("caps-lock-symbol", "Caps "),
            ("control-symbol", "Ctrl "),
            ("mod1-symbol", "Alt "),
            ("mod2-symbol", "Num "),
            ("mod3-symbol", "Mod3 "),
            ("mod4-symbol", "Super "),
            ("mod5-symbol", "AltGr "),
        ],
    },
    Preset {
        name: "Letters",
        entries: &[
            ("shift-symbol", "S"),
            ("caps-lock-symbol", "L"),
            ("control-symbol", "C"),
            ("mod1-symbol", "A"),
            ("mod2-symbol", "N"),
            ("mod3-symbol", "3"),
            ("mod4-symbol", "W"),
            ("mod5-symbol", "G"),
        ],
    },
];

const ACCESSIBILITY_PRESETS: &[Preset] = &[
    Preset {
        name: "Default",
        entries: &[("latch-symbol", "'"), ("lock-symbol", "◦")],
    },
    Preset {
        name: "Marks",
        entries: &[("latch-symbol", "^"), ("lock-symbol", "*")],
    },
    Preset {
        name: "Dots",
        entries: &[("latch-symbol", "·"), ("lock-symbol", "•")],
    },
];

const WRAPPER_PRESETS: &[Preset] = &[
    Preset {
        name: "None",
        entries: &[("icon", ""), ("opening", ""), ("closing", "")],
    },
    Preset {
        name: "Keyboard",
        entries: &[("icon", "⌨ "), ("opening", ""), ("closing", "")],
    },
    Preset {
        name: "Brackets",
        entries: &[("icon", ""), ("opening", "["), ("closing", "]")],
    },
];

/// Preset catalog of a group, in declaration order
pub fn catalog(group: KeyGroup) -> &'static [Preset] {
    match group {
        KeyGroup::Modifiers => MODIFIER_PRESETS,
        KeyGroup::Accessibility => ACCESSIBILITY_PRESETS,
        KeyGroup::Wrapper => WRAPPER_PRESETS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolKey;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_catalog_keys_exist_in_group() {
        for group in KeyGroup::iter() {
            for preset in catalog(group) {
                for (name, _) in preset.entries {
                    let key = SymbolKey::from_str(name).unwrap();
                    assert!(group.contains(key), "{} not in {:?}", name, group);
                }
            }
        }
    }

    #[test]
    fn test_first_preset_is_default_symbols() {
        for group in KeyGroup::iter() {
            let first = &catalog(group)[0];
            for key in group.keys() {
                assert_eq!(first.value(key.name()), key.default_symbol());
            }
        }
    }

    #[test]
    fn test_missing_entry_is_empty() {
        let preset = Preset {
            name: "partial",
            entries: &[("icon", "⌨")],
        };
        assert_eq!(preset.value("icon"), "⌨");
        assert_eq!(preset.value("closing"), "");
    }
}
