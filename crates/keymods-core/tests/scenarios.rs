// Keymods End-to-End Scenarios
//
// Complete indicator and preferences workflows against an in-memory store.
//
// Run with: cargo test --test scenarios

use keymods_core::{
    GroupStatus, Indicator, KeyGroup, MaskLayout, MemoryStore, ModifierIdentity,
    ModifierStateTracker, PresetMatch, PresetReconciler, SettingsStore, SettingsSync, SymbolKey,
    SymbolTable,
};

// =========================================================================
// Test Helpers
// =========================================================================

fn render_with(
    raw: &[ModifierIdentity],
    latch: &[ModifierIdentity],
    lock: &[ModifierIdentity],
) -> String {
    let layout = MaskLayout::X11;
    let mut tracker = ModifierStateTracker::new(layout);
    tracker.observe_raw_state(Some(layout.mask_of(raw)));
    tracker.observe_accessibility_state(Some(layout.mask_of(latch)), Some(layout.mask_of(lock)));
    tracker.render(&SymbolTable::default()).text
}

fn custom(diverged: bool) -> GroupStatus {
    GroupStatus {
        selection: PresetMatch::Custom,
        diverged,
    }
}

// =========================================================================
// Display
// =========================================================================

#[test]
fn scenario_shift_held() {
    assert_eq!(render_with(&[ModifierIdentity::Shift], &[], &[]), "⇧");
}

#[test]
fn scenario_caps_lock_latched() {
    assert_eq!(render_with(&[], &[ModifierIdentity::CapsLock], &[]), "⇬'");
}

#[test]
fn scenario_control_locked() {
    assert_eq!(render_with(&[], &[], &[ModifierIdentity::Control]), "⋀◦");
}

#[test]
fn scenario_canonical_order_regardless_of_source() {
    let text = render_with(
        &[ModifierIdentity::Mod4],
        &[ModifierIdentity::Shift],
        &[ModifierIdentity::Mod1],
    );
    assert_eq!(text, "⇧'⌥◦⌘");
}

// =========================================================================
// Presets
// =========================================================================

#[test]
fn scenario_pc_then_one_edit_is_custom() {
    let mut reconciler = PresetReconciler::new(KeyGroup::Modifiers);
    assert_eq!(reconciler.match_preset(), PresetMatch::Preset(0));
    assert_eq!(reconciler.presets()[0].name, "PC");

    let update = reconciler.edit(SymbolKey::Mod4, "Super");
    assert_eq!(update.changes.len(), 1);
    assert_eq!(update.status, custom(true));
}

#[test]
fn scenario_save_then_switch_back_to_saved() {
    let mut reconciler = PresetReconciler::new(KeyGroup::Wrapper);
    reconciler.edit(SymbolKey::Icon, "K ");
    reconciler.edit(SymbolKey::Opening, "<");
    let (_, status) = reconciler.save_snapshot();
    assert_eq!(status.selection, PresetMatch::Saved);

    let keyboard = reconciler.select(PresetMatch::Preset(1));
    assert_eq!(keyboard.status.selection, PresetMatch::Preset(1));
    assert!(keyboard.status.diverged);

    let back = reconciler.select(PresetMatch::Saved);
    assert_eq!(back.status.selection, PresetMatch::Saved);
    assert!(!back.status.diverged);
    assert_eq!(reconciler.current(SymbolKey::Opening), Some("<"));
}

// =========================================================================
// Indicator and preferences sharing one store
// =========================================================================

#[test]
fn scenario_preferences_drive_the_indicator() {
    let mut store = MemoryStore::new();
    let mut indicator = Indicator::activate(&mut store, MaskLayout::X11);
    let mut prefs = SettingsSync::attach(&mut store);

    indicator.observe_raw(Some(MaskLayout::X11.mask_of(&[ModifierIdentity::Shift])));
    assert_eq!(indicator.refresh(), Some("⇧".to_string()));

    prefs
        .select(&mut store, KeyGroup::Wrapper, PresetMatch::Preset(2))
        .unwrap();
    prefs
        .select(&mut store, KeyGroup::Modifiers, PresetMatch::Preset(3))
        .unwrap();
    assert_eq!(indicator.refresh(), Some("[S]".to_string()));

    // Nothing the preferences wrote comes back to them
    assert!(prefs.take_external_changes().is_empty());
}

#[test]
fn scenario_two_preference_windows_stay_in_step() {
    let mut store = MemoryStore::new();
    let mut first = SettingsSync::attach(&mut store);
    let mut second = SettingsSync::attach(&mut store);

    first.edit(&mut store, SymbolKey::Latch, "^").unwrap();
    first.edit(&mut store, SymbolKey::Lock, "*").unwrap();
    assert_eq!(
        second.status(KeyGroup::Accessibility).selection,
        PresetMatch::Preset(1)
    );
    assert_eq!(second.take_external_changes().len(), 2);

    first.save(&mut store, KeyGroup::Accessibility).unwrap();
    assert!(second.reconciler(KeyGroup::Accessibility).has_snapshot());
    assert!(!second.status(KeyGroup::Accessibility).diverged);
}

#[test]
fn scenario_restore_default_reaches_indicator() {
    let mut store = MemoryStore::new();
    store.set_string("control-symbol", "^").unwrap();
    let mut indicator = Indicator::activate(&mut store, MaskLayout::X11);
    let mut prefs = SettingsSync::attach(&mut store);
    indicator.observe_raw(Some(MaskLayout::X11.mask_of(&[ModifierIdentity::Control])));
    assert_eq!(indicator.refresh(), Some("^".to_string()));

    let status = prefs.restore_default(&mut store, SymbolKey::Control).unwrap();
    assert_eq!(status.selection, PresetMatch::Preset(0));
    assert_eq!(indicator.refresh(), Some("⋀".to_string()));
}

// =========================================================================
// File-backed store
// =========================================================================

#[cfg(feature = "pure-rust")]
mod file_tests {
    use super::*;
    use keymods_core::{ExternalChange, TomlStore};

    #[test]
    fn scenario_saved_preferences_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        {
            let mut store = TomlStore::open(&path).unwrap();
            let mut prefs = SettingsSync::attach(&mut store);
            prefs
                .select(&mut store, KeyGroup::Modifiers, PresetMatch::Preset(1))
                .unwrap();
            prefs.save(&mut store, KeyGroup::Modifiers).unwrap();
        }

        let mut store = TomlStore::open(&path).unwrap();
        let prefs = SettingsSync::attach(&mut store);
        let status = prefs.status(KeyGroup::Modifiers);
        assert_eq!(status.selection, PresetMatch::Preset(1));
        assert!(!status.diverged);
        assert_eq!(prefs.value(SymbolKey::CapsLock), "⇪");
    }

    #[test]
    fn scenario_indicator_follows_file_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut store = TomlStore::open(&path).unwrap();
        let mut indicator = Indicator::activate(&mut store, MaskLayout::X11);
        indicator.observe_raw(Some(MaskLayout::X11.mask_of(&[ModifierIdentity::Mod1])));
        assert_eq!(indicator.refresh(), Some("⌥".to_string()));

        // Another process rewrites the file
        std::fs::write(&path, "[symbols]\nmod1-symbol = \"Alt\"\n").unwrap();
        assert_eq!(store.reload().unwrap(), 1);
        assert_eq!(indicator.refresh(), Some("Alt".to_string()));
    }

    #[test]
    fn scenario_two_preference_windows_keep_each_others_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut first_store = TomlStore::open(&path).unwrap();
        let mut first = SettingsSync::attach(&mut first_store);
        let mut second_store = TomlStore::open(&path).unwrap();
        let mut second = SettingsSync::attach(&mut second_store);

        first.edit(&mut first_store, SymbolKey::Shift, "S").unwrap();
        second.edit(&mut second_store, SymbolKey::Icon, "K").unwrap();
        assert_eq!(second.value(SymbolKey::Shift), "S");
        assert_eq!(
            second.take_external_changes(),
            vec![ExternalChange::Symbol(SymbolKey::Shift, "S".to_string())]
        );

        first_store.reload().unwrap();
        assert_eq!(first.value(SymbolKey::Shift), "S");
        assert_eq!(first.value(SymbolKey::Icon), "K");
        assert_eq!(first.status(KeyGroup::Modifiers).selection, PresetMatch::Custom);
    }
}
