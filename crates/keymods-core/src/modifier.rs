// Keymods Modifier System
// Modifier identities and the opaque bit masks reported by input backends

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use strum_macros::{AsRefStr, EnumCount, EnumIter, EnumString};

/// One of the eight modifiers the indicator can display.
///
/// Declaration order is the canonical display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ModifierIdentity {
    #[strum(to_string = "SHIFT")]
    Shift,
    #[strum(to_string = "CAPS_LOCK", serialize = "LOCK", serialize = "CAPS")]
    CapsLock,
    #[strum(to_string = "CONTROL", serialize = "CTRL")]
    Control,
    #[strum(to_string = "MOD1")]
    Mod1,
    #[strum(to_string = "MOD2")]
    Mod2,
    #[strum(to_string = "MOD3")]
    Mod3,
    #[strum(to_string = "MOD4")]
    Mod4,
    #[strum(to_string = "MOD5")]
    Mod5,
}

impl ModifierIdentity {
    /// Position in the canonical order (0..8)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable label used by the preferences surface
    pub fn label(self) -> &'static str {
        match self {
            ModifierIdentity::Shift => "Shift",
            ModifierIdentity::CapsLock => "Caps Lock",
            ModifierIdentity::Control => "Control",
            ModifierIdentity::Mod1 => "Mod1 (Alt)",
            ModifierIdentity::Mod2 => "Mod2 (Num Lock)",
            ModifierIdentity::Mod3 => "Mod3",
            ModifierIdentity::Mod4 => "Mod4 (Super)",
            ModifierIdentity::Mod5 => "Mod5 (AltGr)",
        }
    }
}

impl fmt::Display for ModifierIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// Bit-set of active modifiers.
///
/// The bit values belong to whichever backend produced the mask. They are
/// only ever combined with the per-identity bit taken from a [`MaskLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct ModifierMask(pub u32);

impl ModifierMask {
    pub const EMPTY: ModifierMask = ModifierMask(0);

    /// Get the raw bits
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any bit of `bit` is set in this mask
    pub fn intersects(self, bit: u32) -> bool {
        self.0 & bit != 0
    }
}

impl From<u32> for ModifierMask {
    fn from(bits: u32) -> Self {
        ModifierMask(bits)
    }
}

impl BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ModifierMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Mapping from modifier identity to the bit a backend uses for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskLayout {
    bits: [u32; 8],
}

impl MaskLayout {
    /// X11 / Clutter core modifier layout
    pub const X11: MaskLayout = MaskLayout {
        bits: [1 << 0, 1 << 1, 1 << 2, 1 << 3, 1 << 4, 1 << 5, 1 << 6, 1 << 7],
    };

    /// Build a layout from explicit bits in canonical order
    pub const fn new(bits: [u32; 8]) -> Self {
        Self { bits }
    }

    /// Bit used for the given identity
    pub fn bit(&self, identity: ModifierIdentity) -> u32 {
        self.bits[identity.index()]
    }

    /// Build a mask with the given identities set
    pub fn mask_of(&self, identities: &[ModifierIdentity]) -> ModifierMask {
        identities
            .iter()
            .fold(ModifierMask::EMPTY, |mask, id| mask | ModifierMask(self.bit(*id)))
    }
}

impl Default for MaskLayout {
    fn default() -> Self {
        Self::X11
    }
}
