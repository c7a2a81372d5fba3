// Keymods Settings Handlers
// Change-notification registry shared by the store implementations

use std::fmt;

use super::SettingValue;

/// Callback invoked with the changed key and its new value
pub type ChangeHandler = Box<dyn FnMut(&str, &SettingValue)>;

/// Identifies a registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

struct Slot {
    id: HandlerId,
    key: String,
    blocked: u32,
    handler: ChangeHandler,
}

/// Registered change handlers, keyed by settings key
#[derive(Default)]
pub struct HandlerRegistry {
    slots: Vec<Slot>,
    next_id: u64,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, key: &str, handler: ChangeHandler) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.slots.push(Slot {
            id,
            key: key.to_string(),
            blocked: 0,
            handler,
        });
        id
    }

    pub fn disconnect(&mut self, id: HandlerId) {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        if self.slots.len() == before {
            log::debug!("{} was not connected", id);
        }
    }

    /// Blocks nest: a handler blocked twice needs two unblocks
    pub fn block(&mut self, id: HandlerId) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.id == id) {
            slot.blocked += 1;
        }
    }

    pub fn unblock(&mut self, id: HandlerId) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.id == id) {
            slot.blocked = slot.blocked.saturating_sub(1);
        }
    }

    /// Invoke every unblocked handler registered for `key`
    pub fn emit(&mut self, key: &str, value: &SettingValue) {
        for slot in self.slots.iter_mut() {
            if slot.key == key && slot.blocked == 0 {
                (slot.handler)(key, value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.slots.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
