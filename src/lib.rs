// Keymap page controller entry point.
// Exposes the page logic so it can be driven by the browser host and tested
// natively.

// Shared state and seams
pub mod dom;
pub mod error;
pub mod state;

// Configuration, persistence and logging
pub mod config;
pub mod logging;
pub mod settings;

// Pure logic modules (no web-sys imports)
pub mod modules;

// Page wiring
pub mod page;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(test)]
mod test_support;

pub use config::{PageLayout, SideEffect, ToggleControl};
pub use error::{Error, Result};
pub use page::{Click, Opener, Page, PageEvent, PageHost};
pub use settings::{JsonFileStore, MemoryStore, SavedStore, SettingsRegistry};
pub use state::{ConnectionFlag, Display, FloatTrigger, TabPair, TabSet};
