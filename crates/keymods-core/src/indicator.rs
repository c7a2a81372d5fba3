// Keymods Indicator
// Tracker plus live symbol table, kept current from the settings store

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use strum::IntoEnumIterator;

use crate::input::ModifierSource;
use crate::modifier::{MaskLayout, ModifierMask};
use crate::settings::{HandlerId, SettingValue, SettingsStore};
use crate::symbols::{SymbolKey, SymbolTable};
use crate::tracker::ModifierStateTracker;

#[derive(Debug)]
struct IndicatorState {
    tracker: ModifierStateTracker,
    symbols: SymbolTable,
}

/// The panel indicator: renders the modifier state with the configured
/// symbols and follows symbol changes made in the store.
#[derive(Debug)]
pub struct Indicator {
    shared: Rc<RefCell<IndicatorState>>,
    handlers: Vec<HandlerId>,
}

impl Indicator {
    /// Load the symbols from `store` and subscribe to their changes
    pub fn activate(store: &mut dyn SettingsStore, layout: MaskLayout) -> Self {
        let mut symbols = SymbolTable::default();
        for key in SymbolKey::iter() {
            match store.get_string(key.name()) {
                Ok(value) => {
                    symbols.set(key, &value);
                }
                Err(err) => log::warn!("cannot read {}: {}, using '{}'", key, err, key.default_symbol()),
            }
        }

        let mut tracker = ModifierStateTracker::new(layout);
        tracker.invalidate();
        let shared = Rc::new(RefCell::new(IndicatorState { tracker, symbols }));

        let handlers = SymbolKey::iter()
            .map(|key| {
                let shared = Rc::clone(&shared);
                store.on_changed(
                    key.name(),
                    Box::new(move |name: &str, value: &SettingValue| {
                        let Some(value) = value.as_str() else {
                            log::warn!("{} changed to a non-string value", name);
                            return;
                        };
                        let Ok(mut state) = shared.try_borrow_mut() else {
                            log::warn!("re-entrant change of {} dropped", name);
                            return;
                        };
                        if state.symbols.set(key, value) {
                            log::debug!("{} is now '{}'", name, value);
                            state.tracker.invalidate();
                        }
                    }),
                )
            })
            .collect();

        log::info!("indicator active");
        Self { shared, handlers }
    }

    /// Disconnect from the store and zero all state
    pub fn deactivate(self, store: &mut dyn SettingsStore) {
        for id in &self.handlers {
            store.disconnect(*id);
        }
        self.shared.borrow_mut().tracker.reset();
        log::info!("indicator inactive");
    }

    pub fn observe_raw(&mut self, mask: Option<ModifierMask>) {
        self.shared.borrow_mut().tracker.observe_raw_state(mask);
    }

    pub fn observe_accessibility(&mut self, latch: Option<ModifierMask>, lock: Option<ModifierMask>) {
        self.shared
            .borrow_mut()
            .tracker
            .observe_accessibility_state(latch, lock);
    }

    /// Sample a source and refresh
    pub fn poll(&mut self, source: &mut dyn ModifierSource) -> Option<String> {
        self.observe_raw(source.raw_state());
        if let Some((latch, lock)) = source.accessibility_state() {
            self.observe_accessibility(latch, lock);
        }
        self.refresh()
    }

    /// Re-render; returns the new text only if it was recomputed
    pub fn refresh(&mut self) -> Option<String> {
        let mut state = self.shared.borrow_mut();
        let IndicatorState { tracker, symbols } = &mut *state;
        let result = tracker.render(symbols);
        result.changed.then_some(result.text)
    }

    /// Last rendered text
    pub fn text(&self) -> String {
        self.shared.borrow().tracker.rendered().to_string()
    }

    pub fn symbols(&self) -> Ref<'_, SymbolTable> {
        Ref::map(self.shared.borrow(), |state| &state.symbols)
    }

    pub fn tracker(&self) -> Ref<'_, ModifierStateTracker> {
        Ref::map(self.shared.borrow(), |state| &state.tracker)
    }
}
