// Main container selection - pure logic over the PageDom seam.
// One state variable (the active container id), one transition (`select`).

use crate::dom::{id_selector, PageDom};
use crate::settings::SavedStore;
use crate::state::{Display, TabPair, TabSet};

/// Saved-store key holding the active container id.
pub const MAIN_CONTAINER_KEY: &str = "main-container";
/// Container shown when nothing was saved yet.
pub const DEFAULT_CONTAINER: &str = "mainboard-container";
/// Class carried by the selected tab control.
pub const ACTIVE_CLASS: &str = "active";

/// Exclusive selection over a fixed set of (tab, container) pairs.
#[derive(Debug, Clone)]
pub struct TabSelector {
    tabs: TabSet,
    /// Every container id rendered on select, tab targets first.
    containers: Vec<String>,
    active: Option<String>,
}

impl TabSelector {
    pub fn new(tabs: TabSet) -> Self {
        let containers = tabs.containers().into_iter().map(str::to_string).collect();
        Self {
            tabs,
            containers,
            active: None,
        }
    }

    /// Adds containers no tab points at. They are hidden on every select and
    /// shown only when selected by id.
    pub fn with_containers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if !self.containers.contains(&id) {
                self.containers.push(id);
            }
        }
        self
    }

    pub fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    /// Last selected container id, known to the tab set or not.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The pair that is currently marked active. `None` before the first
    /// selection and after selecting an id no tab points at.
    pub fn active_tab(&self) -> Option<&TabPair> {
        self.active.as_deref().and_then(|id| self.tabs.find(id))
    }

    /// Selects the saved container, or `default` when none was saved.
    pub fn restore(&mut self, dom: &dyn PageDom, store: &dyn SavedStore, default: &str) {
        let target = store.get_saved(MAIN_CONTAINER_KEY, default);
        self.select(dom, store, &target);
    }

    /// Marks the tab(s) for `target` active, shows its container and hides
    /// every other one, then saves `target`.
    ///
    /// Every tab and container is re-rendered, so no stale marker survives.
    /// An unknown `target` leaves nothing active or visible. Container ids
    /// need not be valid CSS identifiers.
    pub fn select(&mut self, dom: &dyn PageDom, store: &dyn SavedStore, target: &str) {
        for pair in self.tabs.pairs() {
            dom.set_class(&pair.tab, ACTIVE_CLASS, pair.container == target);
        }
        for container in &self.containers {
            let display = if container == target {
                Display::Flex
            } else {
                Display::None
            };
            dom.set_display(&id_selector(container), &display);
        }
        store.set_saved(MAIN_CONTAINER_KEY, target);

        if !self.containers.iter().any(|c| c == target) {
            log::warn!("[Tabs] No container has id '{}'", target);
        } else {
            log::info!("[Tabs] Selected '{}'", target);
        }
        self.active = Some(target.to_string());
    }
}
