// Keymods Modifier State Tracker
// Merges raw modifier masks with sticky-keys latch/lock masks

use strum::IntoEnumIterator;

use crate::modifier::{MaskLayout, ModifierIdentity, ModifierMask};
use crate::symbols::SymbolTable;

/// Masks last observed and last committed by a render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerState {
    pub raw: ModifierMask,
    pub latch: ModifierMask,
    pub lock: ModifierMask,
    pub prev_raw: ModifierMask,
    pub prev_latch: ModifierMask,
    pub prev_lock: ModifierMask,
}

impl TrackerState {
    /// True if any observed mask differs from its committed value
    pub fn is_dirty(&self) -> bool {
        self.raw != self.prev_raw || self.latch != self.prev_latch || self.lock != self.prev_lock
    }

    fn commit(&mut self) {
        self.prev_raw = self.raw;
        self.prev_latch = self.latch;
        self.prev_lock = self.lock;
    }
}

/// Outcome of a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Last committed display string
    pub text: String,
    /// True if `text` was recomputed by this call
    pub changed: bool,
}

/// Tracks modifier state and renders it into a display string.
///
/// Raw masks come from polling or key events; latch and lock masks come
/// only from an accessibility signal, since base polling cannot see them.
#[derive(Debug, Clone, Default)]
pub struct ModifierStateTracker {
    layout: MaskLayout,
    state: TrackerState,
    rendered: String,
    stale: bool,
}

impl ModifierStateTracker {
    pub fn new(layout: MaskLayout) -> Self {
        Self {
            layout,
            state: TrackerState::default(),
            rendered: String::new(),
            stale: false,
        }
    }

    pub fn layout(&self) -> &MaskLayout {
        &self.layout
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Last committed display string
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Record the base modifier mask. `None` means no information this tick.
    pub fn observe_raw_state(&mut self, mask: Option<ModifierMask>) {
        if let Some(mask) = mask {
            if mask != self.state.raw {
                log::trace!("raw state {} -> {}", self.state.raw, mask);
            }
            self.state.raw = mask;
        }
    }

    /// Record sticky-keys masks. An absent mask leaves the previous value.
    pub fn observe_accessibility_state(
        &mut self,
        latch: Option<ModifierMask>,
        lock: Option<ModifierMask>,
    ) {
        if let Some(latch) = latch {
            self.state.latch = latch;
        }
        if let Some(lock) = lock {
            self.state.lock = lock;
        }
        log::trace!("latch: {}, lock: {}", self.state.latch, self.state.lock);
    }

    /// Force the next render to recompute, e.g. after the symbols changed
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Recompute the display string if the tracked state changed
    pub fn render(&mut self, table: &SymbolTable) -> RenderResult {
        if !self.state.is_dirty() && !self.stale {
            return RenderResult {
                text: self.rendered.clone(),
                changed: false,
            };
        }

        log::debug!(
            "state changed: raw {} -> {}, latch {} -> {}, lock {} -> {}",
            self.state.prev_raw,
            self.state.raw,
            self.state.prev_latch,
            self.state.latch,
            self.state.prev_lock,
            self.state.lock
        );

        let text = compose(&self.layout, &self.state, table);
        self.state.commit();
        self.rendered = text;
        self.stale = false;

        RenderResult {
            text: self.rendered.clone(),
            changed: true,
        }
    }

    /// Zero every mask and drop the committed string
    pub fn reset(&mut self) {
        self.state = TrackerState::default();
        self.rendered.clear();
        self.stale = false;
    }
}

/// Build the display string for the current masks
pub fn compose(layout: &MaskLayout, state: &TrackerState, table: &SymbolTable) -> String {
    let mut result = String::new();
    result.push_str(&table.icon);
    result.push_str(&table.opening);

    for identity in ModifierIdentity::iter() {
        let bit = layout.bit(identity);
        let latched = state.latch.intersects(bit);
        let locked = state.lock.intersects(bit);

        if state.raw.intersects(bit) || latched || locked {
            result.push_str(table.symbol(identity));
        }
        if latched {
            result.push_str(&table.latch_symbol);
        }
        if locked {
            result.push_str(&table.lock_symbol);
        }
    }

    result.push_str(&table.closing);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolKey;

    fn mask(ids: &[ModifierIdentity]) -> Option<ModifierMask> {
        Some(MaskLayout::X11.mask_of(ids))
    }

    #[test]
    fn test_fresh_tracker_is_clean() {
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        let result = tracker.render(&SymbolTable::default());
        assert!(!result.changed);
        assert_eq!(result.text, "");
    }

    #[test]
    fn test_raw_change_renders_once() {
        let table = SymbolTable::default();
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);

        tracker.observe_raw_state(mask(&[ModifierIdentity::Shift]));
        let first = tracker.render(&table);
        assert!(first.changed);
        assert_eq!(first.text, "⇧");

        tracker.observe_raw_state(mask(&[ModifierIdentity::Shift]));
        let second = tracker.render(&table);
        assert!(!second.changed);
        assert_eq!(second.text, "⇧");
    }

    #[test]
    fn test_absent_raw_keeps_previous_mask() {
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        tracker.observe_raw_state(mask(&[ModifierIdentity::Control]));
        tracker.observe_raw_state(None);
        assert_eq!(
            tracker.state().raw,
            MaskLayout::X11.mask_of(&[ModifierIdentity::Control])
        );
    }

    #[test]
    fn test_absent_accessibility_argument_is_no_change() {
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        tracker.observe_accessibility_state(
            mask(&[ModifierIdentity::Shift]),
            mask(&[ModifierIdentity::Control]),
        );
        tracker.observe_accessibility_state(None, mask(&[]));
        assert_eq!(
            tracker.state().latch,
            MaskLayout::X11.mask_of(&[ModifierIdentity::Shift])
        );
        assert!(tracker.state().lock.is_empty());
    }

    #[test]
    fn test_latched_and_locked_markers() {
        let table = SymbolTable::default();
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        tracker.observe_accessibility_state(
            mask(&[ModifierIdentity::CapsLock]),
            mask(&[ModifierIdentity::Mod4]),
        );
        assert_eq!(tracker.render(&table).text, "⇬'⌘◦");
    }

    #[test]
    fn test_raw_and_latched_symbol_appears_once() {
        let table = SymbolTable::default();
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        tracker.observe_raw_state(mask(&[ModifierIdentity::Shift]));
        tracker.observe_accessibility_state(
            mask(&[ModifierIdentity::Shift]),
            mask(&[ModifierIdentity::Shift]),
        );
        assert_eq!(tracker.render(&table).text, "⇧'◦");
    }

    #[test]
    fn test_wrapper_and_order() {
        let mut table = SymbolTable::default();
        table.set(SymbolKey::Icon, "⌨ ");
        table.set(SymbolKey::Opening, "[");
        table.set(SymbolKey::Closing, "]");
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        tracker.observe_raw_state(mask(&[ModifierIdentity::Mod1, ModifierIdentity::Shift]));
        assert_eq!(tracker.render(&table).text, "⌨ [⇧⌥]");
    }

    #[test]
    fn test_empty_symbol_is_suppressed() {
        let mut table = SymbolTable::default();
        table.set(SymbolKey::Mod2, "");
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        tracker.observe_raw_state(mask(&[ModifierIdentity::Mod2, ModifierIdentity::Control]));
        assert_eq!(tracker.render(&table).text, "⋀");
    }

    #[test]
    fn test_invalidate_forces_render_with_new_symbols() {
        let mut table = SymbolTable::default();
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        tracker.observe_raw_state(mask(&[ModifierIdentity::Shift]));
        tracker.render(&table);

        table.set(SymbolKey::Shift, "S");
        assert!(!tracker.render(&table).changed);

        tracker.invalidate();
        let result = tracker.render(&table);
        assert!(result.changed);
        assert_eq!(result.text, "S");
    }

    #[test]
    fn test_reset_zeroes_state() {
        let table = SymbolTable::default();
        let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
        tracker.observe_raw_state(mask(&[ModifierIdentity::Shift]));
        tracker.observe_accessibility_state(mask(&[ModifierIdentity::Shift]), None);
        tracker.render(&table);

        tracker.reset();
        assert_eq!(*tracker.state(), TrackerState::default());
        assert_eq!(tracker.rendered(), "");
    }
}
