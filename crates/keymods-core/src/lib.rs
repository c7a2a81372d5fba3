// Keymods Core Library
// Modifier state tracking, symbol presets and settings binding

pub mod indicator;
pub mod input;
pub mod modifier;
pub mod preset;
pub mod reconciler;
pub mod settings;
pub mod symbols;
pub mod sync;
pub mod tracker;

pub use indicator::Indicator;
pub use input::{
    is_keyboard, mask_from_state, matches_device_filter, DeviceCapabilities, KeyboardState,
    ModifierSource,
};
pub use modifier::{MaskLayout, ModifierIdentity, ModifierMask};
pub use preset::Preset;
pub use reconciler::{GroupStatus, PresetMatch, PresetReconciler, SymbolChange, SymbolChanges, Update};
pub use settings::{
    default_path, ChangeHandler, Compound, HandlerId, MemoryStore, SettingValue, SettingsError,
    SettingsStore,
};
pub use symbols::{parse_mapping_lines, KeyGroup, SymbolError, SymbolKey, SymbolTable};
pub use sync::{ExternalChange, SettingsSync};
pub use tracker::{compose, ModifierStateTracker, RenderResult, TrackerState};

#[cfg(feature = "pure-rust")]
pub use input::{EvdevSource, InputError};
#[cfg(feature = "pure-rust")]
pub use settings::TomlStore;
