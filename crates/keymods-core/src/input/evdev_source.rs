// Keymods Input Layer - evdev Source
// Polls key and LED state of the local keyboards

use evdev::{Device, EventType, Key, LedType};
use thiserror::Error;

use super::{is_keyboard, matches_device_filter, DeviceCapabilities, KeyboardState, ModifierSource};
use crate::modifier::{MaskLayout, ModifierMask};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no keyboard devices found")]
    NoKeyboards,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

struct Keyboard {
    name: String,
    device: Device,
}

/// Base modifier state read from evdev.
///
/// Devices are only queried, never grabbed. Sticky-keys state lives in the
/// compositor, so this source reports no accessibility masks.
pub struct EvdevSource {
    layout: MaskLayout,
    keyboards: Vec<Keyboard>,
}

impl EvdevSource {
    /// Open every matching keyboard. An empty filter autodetects keyboards.
    pub fn open(layout: MaskLayout, filter_names: &[String]) -> Result<Self, InputError> {
        let mut keyboards = Vec::new();
        for (path, device) in evdev::enumerate() {
            let name = device.name().unwrap_or("Unknown").to_string();
            let device_path = path.to_str().unwrap_or_default();
            let keyboard = is_keyboard(&capabilities(&device));
            if matches_device_filter(&name, device_path, filter_names, keyboard) {
                log::info!("reading modifiers from {} ({})", name, device_path);
                keyboards.push(Keyboard { name, device });
            }
        }
        if keyboards.is_empty() {
            return Err(InputError::NoKeyboards);
        }
        Ok(Self { layout, keyboards })
    }

    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.keyboards.iter().map(|k| k.name.as_str())
    }

    /// Current state merged across all keyboards, `None` if none could be read
    pub fn keyboard_state(&self) -> Option<KeyboardState> {
        let mut merged: Option<KeyboardState> = None;
        for keyboard in &self.keyboards {
            match read_state(&keyboard.device) {
                Ok(state) => merged.get_or_insert_with(KeyboardState::default).merge(&state),
                Err(err) => log::warn!("cannot read state of {}: {}", keyboard.name, err),
            }
        }
        merged
    }
}

impl ModifierSource for EvdevSource {
    fn raw_state(&mut self) -> Option<ModifierMask> {
        self.keyboard_state().map(|state| state.mask(&self.layout))
    }
}

fn capabilities(device: &Device) -> DeviceCapabilities {
    let has_ev_key = device.supported_events().contains(EventType::KEY);
    let keys: Vec<u16> = device
        .supported_keys()
        .map(|keys| keys.iter().map(|key| key.code()).collect())
        .unwrap_or_default();
    DeviceCapabilities::new(has_ev_key, keys)
}

fn read_state(device: &Device) -> Result<KeyboardState, InputError> {
    let keys = device.get_key_state()?;
    let leds = device.get_led_state()?;
    Ok(state_from(
        keys.iter(),
        leds.contains(LedType::LED_CAPSL),
        leds.contains(LedType::LED_NUML),
    ))
}

fn state_from(keys: impl Iterator<Item = Key>, caps_lock: bool, num_lock: bool) -> KeyboardState {
    KeyboardState {
        pressed: keys.map(|key| key.code()).collect(),
        caps_lock,
        num_lock,
    }
}
