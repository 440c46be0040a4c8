// Toggle binding - pure logic, no DOM access.
// A binding owns one boolean and mirrors every change into the saved store.

use std::rc::Rc;

use crate::settings::{get_saved_bool, set_saved_bool, SavedStore};

pub type OnChange = Box<dyn FnMut(bool)>;

/// One boolean control bound to one persisted setting.
pub struct ToggleBinding {
    key: String,
    state: bool,
    on_change: Option<OnChange>,
}

impl ToggleBinding {
    /// Reads the saved value for `key` (falling back to `default` without
    /// writing it) and runs `on_change` once with it.
    pub fn create(
        store: &dyn SavedStore,
        key: impl Into<String>,
        default: bool,
        on_change: Option<OnChange>,
    ) -> Self {
        let key = key.into();
        let state = get_saved_bool(store, &key, default);

        let mut binding = Self {
            key,
            state,
            on_change,
        };
        binding.notify();
        binding
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> bool {
        self.state
    }

    /// Flips the state, saves it, then runs `on_change`. Returns the new state.
    pub fn toggle(&mut self, store: &dyn SavedStore) -> bool {
        self.state = !self.state;
        set_saved_bool(store, &self.key, self.state);
        log::debug!("[Toggle] '{}' -> {}", self.key, self.state);
        self.notify();
        self.state
    }

    /// Turns the binding into a plain event handler.
    pub fn into_handler(mut self, store: Rc<dyn SavedStore>) -> impl FnMut() -> bool {
        move || self.toggle(store.as_ref())
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(self.state);
        }
    }
}

impl std::fmt::Debug for ToggleBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleBinding")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
