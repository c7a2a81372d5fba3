// Keymods Tracker and Reconciler Properties
//
// Invariants checked over every modifier combination or preset.
//
// Run with: cargo test --test properties

use keymods_core::tracker::compose;
use keymods_core::{
    KeyGroup, MaskLayout, ModifierIdentity, ModifierMask, ModifierStateTracker, PresetMatch,
    PresetReconciler, SymbolTable, TrackerState,
};
use strum::IntoEnumIterator;

fn all_masks() -> impl Iterator<Item = ModifierMask> {
    (0u32..256).map(ModifierMask)
}

#[test]
fn render_changes_exactly_when_state_changes() {
    let table = SymbolTable::default();
    let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
    let samples = [0u32, 0, 1, 1, 5, 0, 0, 0x80, 0x80];
    let mut committed = 0u32;
    for bits in samples {
        tracker.observe_raw_state(Some(ModifierMask(bits)));
        let result = tracker.render(&table);
        assert_eq!(result.changed, bits != committed, "raw {:#x}", bits);
        committed = bits;
    }
}

#[test]
fn latch_and_lock_changes_trigger_render() {
    let table = SymbolTable::default();
    let mut tracker = ModifierStateTracker::new(MaskLayout::X11);
    tracker.observe_accessibility_state(Some(ModifierMask(2)), None);
    assert!(tracker.render(&table).changed);
    tracker.observe_accessibility_state(None, Some(ModifierMask(4)));
    assert!(tracker.render(&table).changed);
    tracker.observe_accessibility_state(None, None);
    assert!(!tracker.render(&table).changed);
}

#[test]
fn display_is_deterministic() {
    let table = SymbolTable::default();
    for raw in all_masks() {
        let state = TrackerState {
            raw,
            latch: ModifierMask(raw.bits() >> 1),
            ..Default::default()
        };
        assert_eq!(
            compose(&MaskLayout::X11, &state, &table),
            compose(&MaskLayout::X11, &state, &table)
        );
    }
}

#[test]
fn symbol_appears_once_per_active_modifier() {
    let mut table = SymbolTable::empty();
    for identity in ModifierIdentity::iter() {
        table.set_symbol(identity, "x");
    }
    for raw in all_masks() {
        let state = TrackerState {
            raw,
            latch: raw,
            lock: raw,
            ..Default::default()
        };
        let text = compose(&MaskLayout::X11, &state, &table);
        assert_eq!(text.len(), raw.bits().count_ones() as usize);
    }
}

#[test]
fn applied_preset_is_matched() {
    for group in KeyGroup::iter() {
        let mut reconciler = PresetReconciler::new(group);
        for index in 0..reconciler.presets().len() {
            let update = reconciler.apply_preset(index);
            // Earlier presets with identical values win
            let expected = reconciler
                .presets()
                .iter()
                .position(|p| p.entries == reconciler.presets()[index].entries)
                .unwrap_or(index);
            assert_eq!(update.status.selection, PresetMatch::Preset(expected));
        }
    }
}

#[test]
fn save_leaves_nothing_diverged() {
    for group in KeyGroup::iter() {
        let mut reconciler = PresetReconciler::new(group);
        reconciler.apply_preset(reconciler.presets().len() - 1);
        let key = group.keys()[0];
        reconciler.edit(key, "edited");
        reconciler.save_snapshot();
        assert!(!reconciler.current_differs_from_saved());
        assert_eq!(reconciler.match_preset(), PresetMatch::Saved);
    }
}
