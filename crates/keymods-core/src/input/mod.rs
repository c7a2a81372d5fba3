// Keymods Input Layer
// Sources of modifier masks for the indicator

mod device;
mod keystate;

#[cfg(feature = "pure-rust")]
mod evdev_source;

pub use device::{is_keyboard, matches_device_filter, DeviceCapabilities};
pub use keystate::{mask_from_state, KeyboardState};

#[cfg(feature = "pure-rust")]
pub use evdev_source::{EvdevSource, InputError};

use crate::modifier::ModifierMask;

/// Something the indicator can poll for modifier state.
///
/// `None` means the source had nothing to report this tick; the tracker
/// then keeps its previous masks.
pub trait ModifierSource {
    /// Base (physically held or toggled) modifier mask
    fn raw_state(&mut self) -> Option<ModifierMask>;

    /// Sticky-keys `(latch, lock)` masks, if the source can see them
    fn accessibility_state(&mut self) -> Option<(Option<ModifierMask>, Option<ModifierMask>)> {
        None
    }
}
