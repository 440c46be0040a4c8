use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Settings the page knows about before any control is bound.
pub const KNOWN_SETTINGS: [&str; 3] = ["instant", "playback", "record"];

/// String-typed key-value persistence (`getSaved` / `setSaved`).
///
/// Callers own the conversion of booleans to `"true"` / `"false"`.
pub trait SavedStore {
    fn get_saved(&self, key: &str, default: &str) -> String;
    fn set_saved(&self, key: &str, value: &str);
}

/// Parses a stored boolean. Anything other than `"true"` / `"false"` counts as
/// absent.
pub fn parse_saved_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn get_saved_bool(store: &dyn SavedStore, key: &str, default: bool) -> bool {
    parse_saved_bool(&store.get_saved(key, &default.to_string())).unwrap_or(default)
}

pub fn set_saved_bool(store: &dyn SavedStore, key: &str, value: bool) {
    store.set_saved(key, &value.to_string());
}

/// Current value of every setting the page has bound, owned by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRegistry {
    values: HashMap<String, bool>,
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self {
            values: KNOWN_SETTINGS
                .iter()
                .map(|name| (name.to_string(), false))
                .collect(),
        }
    }
}

impl SettingsRegistry {
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// `false` for names never bound.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn set(&mut self, name: &str, enabled: bool) {
        self.values.insert(name.to_string(), enabled);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Session-only store. Used when the host has no persistent storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, without falling back to any default.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Number of saved keys.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SavedStore for MemoryStore {
    fn get_saved(&self, key: &str, default: &str) -> String {
        self.values
            .borrow()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set_saved(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Saved values kept as a pretty-printed JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing, unreadable or malformed file is
    /// treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("[Settings] {}, starting with no saved values", e);
                BTreeMap::new()
            }
        };
        Self {
            path,
            values: RefCell::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path).map_err(|e| Error::store_io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        let tmp_path = self.path.with_extension("tmp");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::store_io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&*self.values.borrow())?;

        // Write to tmp, then rename over the real file.
        fs::write(&tmp_path, json).map_err(|e| Error::store_io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| Error::store_io(&self.path, e))?;

        Ok(())
    }
}

impl SavedStore for JsonFileStore {
    fn get_saved(&self, key: &str, default: &str) -> String {
        self.values
            .borrow()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set_saved(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            log::warn!("[Settings] Failed to persist '{}': {}", key, e);
        }
    }
}
