// Keymods Input Layer - Device Detection
// Keyboard detection and device filtering

/// Key capabilities of an input device
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    pub has_ev_key: bool,
    pub supported_keys: Vec<u16>,
}

impl DeviceCapabilities {
    pub fn new(has_ev_key: bool, supported_keys: Vec<u16>) -> Self {
        Self {
            has_ev_key,
            supported_keys,
        }
    }

    pub fn supports_key(&self, key_code: u16) -> bool {
        self.supported_keys.contains(&key_code)
    }
}

// Q, W, E, R, T, Y
const QWERTY_CODES: &[u16] = &[16, 17, 18, 19, 20, 21];

// SPACE, A, Z
const A_Z_SPACE_CODES: &[u16] = &[57, 30, 44];

/// A device is a keyboard if it has EV_KEY with the QWERTY row, A, Z and SPACE
pub fn is_keyboard(capabilities: &DeviceCapabilities) -> bool {
    if !capabilities.has_ev_key {
        return false;
    }
    QWERTY_CODES
        .iter()
        .chain(A_Z_SPACE_CODES)
        .all(|code| capabilities.supports_key(*code))
}

/// Decide whether a device should be read.
///
/// With explicit `filter_names` only devices matching by path or name are
/// used; otherwise every keyboard is.
pub fn matches_device_filter(
    device_name: &str,
    device_path: &str,
    filter_names: &[String],
    is_keyboard: bool,
) -> bool {
    if !filter_names.is_empty() {
        return filter_names
            .iter()
            .any(|name| device_path == name || device_name == name);
    }
    is_keyboard
}
