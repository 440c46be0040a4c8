// Recording fakes for the DOM and page-action seams.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use crate::dom::{PageActions, PageDom};
use crate::state::Display;

/// Remembers the last value written per selector. Every selector matches one
/// element unless listed as missing.
#[derive(Debug, Default)]
pub struct RecordingDom {
    displays: RefCell<BTreeMap<String, Display>>,
    classes: RefCell<BTreeMap<String, BTreeSet<String>>>,
    checked: RefCell<BTreeMap<String, bool>>,
    missing: BTreeSet<String>,
}

impl RecordingDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing(selectors: &[&str]) -> Self {
        Self {
            missing: selectors.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn display_of(&self, selector: &str) -> Option<Display> {
        self.displays.borrow().get(selector).cloned()
    }

    pub fn checked_of(&self, selector: &str) -> Option<bool> {
        self.checked.borrow().get(selector).copied()
    }

    /// Selectors currently carrying the `active` class.
    pub fn active_tabs(&self) -> Vec<String> {
        self.classes
            .borrow()
            .iter()
            .filter(|(_, classes)| classes.contains("active"))
            .map(|(selector, _)| selector.clone())
            .collect()
    }

    /// Selectors whose last display value shows them.
    pub fn visible(&self) -> Vec<String> {
        self.displays
            .borrow()
            .iter()
            .filter(|(_, display)| display.is_visible())
            .map(|(selector, _)| selector.clone())
            .collect()
    }

    fn matches(&self, selector: &str) -> usize {
        usize::from(!self.missing.contains(selector))
    }
}

impl PageDom for RecordingDom {
    fn set_display(&self, selector: &str, display: &Display) -> usize {
        let matched = self.matches(selector);
        if matched > 0 {
            self.displays
                .borrow_mut()
                .insert(selector.to_string(), display.clone());
        }
        matched
    }

    fn set_class(&self, selector: &str, class: &str, enabled: bool) -> usize {
        let matched = self.matches(selector);
        if matched > 0 {
            let mut classes = self.classes.borrow_mut();
            let set = classes.entry(selector.to_string()).or_default();
            if enabled {
                set.insert(class.to_string());
            } else {
                set.remove(class);
            }
        }
        matched
    }

    fn set_checked(&self, selector: &str, checked: bool) -> usize {
        let matched = self.matches(selector);
        if matched > 0 {
            self.checked.borrow_mut().insert(selector.to_string(), checked);
        }
        matched
    }
}

#[derive(Debug, Default)]
pub struct RecordingActions {
    pub menu_closes: Cell<usize>,
    pub key_selections: Cell<usize>,
    pub commits: Cell<usize>,
}

impl PageActions for RecordingActions {
    fn menu_close(&self) {
        self.menu_closes.set(self.menu_closes.get() + 1);
    }

    fn select_key(&self) {
        self.key_selections.set(self.key_selections.get() + 1);
    }

    fn commit(&self) {
        self.commits.set(self.commits.get() + 1);
    }
}
