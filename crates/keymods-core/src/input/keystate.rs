// Keymods Input Layer - Key State
// Maps held keys and lock LEDs to a modifier mask

use std::collections::HashSet;

use crate::modifier::{MaskLayout, ModifierIdentity, ModifierMask};

const KEY_LEFTCTRL: u16 = 29;
const KEY_LEFTSHIFT: u16 = 42;
const KEY_RIGHTSHIFT: u16 = 54;
const KEY_LEFTALT: u16 = 56;
const KEY_RIGHTCTRL: u16 = 97;
const KEY_RIGHTALT: u16 = 100;
const KEY_LEFTMETA: u16 = 125;
const KEY_RIGHTMETA: u16 = 126;

/// Held modifier keys per identity. CapsLock and Mod2 come from LEDs.
const HELD_KEYS: &[(ModifierIdentity, &[u16])] = &[
    (ModifierIdentity::Shift, &[KEY_LEFTSHIFT, KEY_RIGHTSHIFT]),
    (ModifierIdentity::Control, &[KEY_LEFTCTRL, KEY_RIGHTCTRL]),
    (ModifierIdentity::Mod1, &[KEY_LEFTALT]),
    (ModifierIdentity::Mod4, &[KEY_LEFTMETA, KEY_RIGHTMETA]),
    (ModifierIdentity::Mod5, &[KEY_RIGHTALT]),
];

/// Key and LED state gathered from one or more keyboards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub pressed: HashSet<u16>,
    pub caps_lock: bool,
    pub num_lock: bool,
}

impl KeyboardState {
    /// Fold another device's state into this one
    pub fn merge(&mut self, other: &KeyboardState) {
        self.pressed.extend(other.pressed.iter().copied());
        self.caps_lock |= other.caps_lock;
        self.num_lock |= other.num_lock;
    }

    pub fn mask(&self, layout: &MaskLayout) -> ModifierMask {
        mask_from_state(&self.pressed, self.caps_lock, self.num_lock, layout)
    }
}

/// Compute the base modifier mask.
///
/// Shift, Control, Mod1 (left Alt), Mod4 (Meta) and Mod5 (right Alt) are
/// set while one of their keys is held; CapsLock and Mod2 (NumLock)
/// follow the lock LEDs.
pub fn mask_from_state(
    pressed: &HashSet<u16>,
    caps_lock: bool,
    num_lock: bool,
    layout: &MaskLayout,
) -> ModifierMask {
    let mut mask = ModifierMask::EMPTY;
    for (identity, codes) in HELD_KEYS {
        if codes.iter().any(|code| pressed.contains(code)) {
            mask |= ModifierMask(layout.bit(*identity));
        }
    }
    if caps_lock {
        mask |= ModifierMask(layout.bit(ModifierIdentity::CapsLock));
    }
    if num_lock {
        mask |= ModifierMask(layout.bit(ModifierIdentity::Mod2));
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(codes: &[u16]) -> HashSet<u16> {
        codes.iter().copied().collect()
    }

    #[test]
    fn test_nothing_held() {
        let mask = mask_from_state(&pressed(&[30, 31]), false, false, &MaskLayout::X11);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_either_shift_sets_shift() {
        let layout = MaskLayout::X11;
        assert_eq!(mask_from_state(&pressed(&[42]), false, false, &layout), ModifierMask(1));
        assert_eq!(mask_from_state(&pressed(&[54]), false, false, &layout), ModifierMask(1));
    }

    #[test]
    fn test_alt_keys_map_to_mod1_and_mod5() {
        let mask = mask_from_state(&pressed(&[56, 100]), false, false, &MaskLayout::X11);
        assert_eq!(mask, ModifierMask(0x08 | 0x80));
    }

    #[test]
    fn test_leds_set_lock_modifiers() {
        let mask = mask_from_state(&pressed(&[]), true, true, &MaskLayout::X11);
        assert_eq!(mask, ModifierMask(0x02 | 0x10));
    }

    #[test]
    fn test_merge_unions_devices() {
        let mut laptop = KeyboardState {
            pressed: pressed(&[29]),
            ..Default::default()
        };
        let external = KeyboardState {
            pressed: pressed(&[125]),
            caps_lock: true,
            num_lock: false,
        };
        laptop.merge(&external);
        assert_eq!(laptop.mask(&MaskLayout::X11), ModifierMask(0x04 | 0x40 | 0x02));
    }
}
