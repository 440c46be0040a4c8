// Page controller: owns the settings registry and the three components, and
// turns DOM triggers into calls on them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::{PageLayout, ToggleControl};
use crate::dom::{id_selector, PageActions, PageDom};
use crate::modules::floats::FloatPanelController;
use crate::modules::tabs::TabSelector;
use crate::modules::toggles::{OnChange, ToggleBinding};
use crate::settings::{SavedStore, SettingsRegistry};
use crate::state::{ConnectionFlag, Display, FloatTrigger};

/// Collaborators the page runs against.
#[derive(Clone)]
pub struct PageHost {
    pub store: Rc<dyn SavedStore>,
    pub dom: Rc<dyn PageDom>,
    pub actions: Rc<dyn PageActions>,
    pub connection: ConnectionFlag,
}

/// A user trigger, already resolved from the DOM element that fired it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A bound checkbox changed; `key` is its saved-store key.
    Toggle { key: String },
    /// A `.close` control was clicked inside `closeable`.
    Close { closeable: String },
    /// A `[data-mainboard]` control was clicked.
    SelectTab { target: String },
    /// A `[data-open]` control was clicked.
    OpenFloat(FloatTrigger),
    /// The commit control was clicked.
    Commit,
}

/// What the host found around a clicked element: the nearest ancestor (or the
/// element itself) matching each trigger selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Click {
    /// Id of the `.closeable` around a clicked `.close`. Empty when that
    /// closeable has no id; the host hides it directly.
    pub closeable: Option<String>,
    /// `data-mainboard` of the nearest tab control.
    pub mainboard: Option<String>,
    /// The nearest `[data-open]` trigger.
    pub opener: Option<Opener>,
    /// Whether the click landed inside the commit control.
    pub commit: bool,
}

/// Attributes of a `[data-open]` trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opener {
    /// `data-open`: selector of the panel.
    pub panel: String,
    /// `data-display`, if present.
    pub display: Option<String>,
    /// Whether the trigger carries the `connect-enable` class.
    pub connect_enable: bool,
}

impl Click {
    /// Every page event this click stands for, in handler order: close, tab,
    /// float, commit.
    pub fn events(&self) -> Vec<PageEvent> {
        let mut events = Vec::new();

        if let Some(id) = self.closeable.as_deref().filter(|id| !id.is_empty()) {
            events.push(PageEvent::Close {
                closeable: id_selector(id),
            });
        }
        if let Some(target) = &self.mainboard {
            events.push(PageEvent::SelectTab {
                target: target.clone(),
            });
        }
        if let Some(opener) = &self.opener {
            events.push(PageEvent::OpenFloat(opener.trigger()));
        }
        if self.commit {
            events.push(PageEvent::Commit);
        }

        events
    }
}

impl Opener {
    /// A blank `data-display` means the `block` default.
    pub fn trigger(&self) -> FloatTrigger {
        let mut trigger = FloatTrigger::new(self.panel.clone());
        trigger.display = self
            .display
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .and_then(|d| d.parse::<Display>().ok());
        trigger.requires_connection = self.connect_enable;
        trigger
    }
}

pub struct Page {
    host: PageHost,
    settings: Rc<RefCell<SettingsRegistry>>,
    toggles: HashMap<String, ToggleBinding>,
    tabs: TabSelector,
    floats: FloatPanelController,
}

impl Page {
    /// Page-load initializer. Binds every toggle (each reflects its saved
    /// value immediately) and restores the saved main container.
    pub fn load(layout: &PageLayout, host: PageHost) -> Self {
        let settings = Rc::new(RefCell::new(SettingsRegistry::default()));

        let mut toggles = HashMap::with_capacity(layout.toggles.len());
        for control in &layout.toggles {
            let on_change = toggle_callback(control, &settings, &host.dom, &layout.commit);
            let binding = ToggleBinding::create(
                host.store.as_ref(),
                control.key.clone(),
                control.default,
                Some(on_change),
            );
            toggles.insert(control.key.clone(), binding);
        }

        let mut tabs = TabSelector::new(layout.tabs.clone()).with_containers(&layout.containers);
        tabs.restore(host.dom.as_ref(), host.store.as_ref(), &layout.default_container);

        log::info!(
            "[Page] Loaded with {} toggles, {} tabs and {} containers",
            toggles.len(),
            layout.tabs.pairs().len(),
            tabs.containers().len()
        );

        Self {
            host,
            settings,
            toggles,
            tabs,
            floats: FloatPanelController::new(),
        }
    }

    /// Applies one trigger. Returns whether it changed anything.
    pub fn dispatch(&mut self, event: PageEvent) -> bool {
        match event {
            PageEvent::Toggle { key } => self.toggle(&key).is_some(),
            PageEvent::Close { closeable } => self.close(&closeable),
            PageEvent::SelectTab { target } => {
                self.select_tab(&target);
                true
            }
            PageEvent::OpenFloat(trigger) => self.open_float(&trigger),
            PageEvent::Commit => {
                self.commit();
                true
            }
        }
    }

    /// Flips the toggle saved under `key`. `None` when no control uses it.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        match self.toggles.get_mut(key) {
            Some(binding) => Some(binding.toggle(self.host.store.as_ref())),
            None => {
                log::debug!("[Page] No toggle bound to '{}'", key);
                None
            }
        }
    }

    /// Closes the key picker, then switches the main container.
    pub fn select_tab(&mut self, target: &str) {
        self.host.actions.select_key();
        self.tabs
            .select(self.host.dom.as_ref(), self.host.store.as_ref(), target);
    }

    /// Opens a float and closes the menu. Opening a menu does not close
    /// floats.
    pub fn open_float(&mut self, trigger: &FloatTrigger) -> bool {
        let opened = self
            .floats
            .open(self.host.dom.as_ref(), &self.host.connection, trigger);
        if opened {
            self.host.actions.menu_close();
        }
        opened
    }

    /// Generic close action: hides `closeable` and forgets it as a float.
    pub fn close(&mut self, closeable: &str) -> bool {
        let hidden = self.host.dom.set_display(closeable, &Display::None) > 0;
        if self.floats.mark_closed(closeable) {
            log::debug!("[Page] Closed float '{}'", closeable);
        }
        hidden
    }

    pub fn commit(&self) {
        log::info!("[Page] Committing changes");
        self.host.actions.commit();
    }

    /// Snapshot of the settings registry.
    pub fn settings(&self) -> SettingsRegistry {
        self.settings.borrow().clone()
    }

    pub fn setting(&self, name: &str) -> Option<bool> {
        self.settings.borrow().get(name)
    }

    pub fn toggle_state(&self, key: &str) -> Option<bool> {
        self.toggles.get(key).map(ToggleBinding::state)
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.tabs.active_id()
    }

    pub fn is_float_open(&self, panel: &str) -> bool {
        self.floats.is_open(panel)
    }

    pub fn connection(&self) -> &ConnectionFlag {
        &self.host.connection
    }
}

/// Callback for one control: update the registry, mirror the checkbox, run the
/// control's side effect.
fn toggle_callback(
    control: &ToggleControl,
    settings: &Rc<RefCell<SettingsRegistry>>,
    dom: &Rc<dyn PageDom>,
    commit: &str,
) -> OnChange {
    let settings = Rc::clone(settings);
    let dom = Rc::clone(dom);
    let setting = control.setting.clone();
    let selector = control.selector.clone();
    let extra = control.extra;
    let commit = commit.to_string();

    Box::new(move |enabled: bool| {
        settings.borrow_mut().set(&setting, enabled);
        dom.set_checked(&selector, enabled);
        if let Some(effect) = extra {
            effect.apply(dom.as_ref(), &commit, enabled);
        }
    })
}
