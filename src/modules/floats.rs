use std::collections::BTreeSet;

use crate::dom::PageDom;
use crate::state::{ConnectionFlag, FloatTrigger};

/// Reveals float panels and remembers which ones are showing.
#[derive(Debug, Default)]
pub struct FloatPanelController {
    open: BTreeSet<String>,
}

impl FloatPanelController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the trigger's panel. Returns `false` without touching the DOM
    /// when the trigger needs a connection and there is none.
    ///
    /// Callers close the menu overlay when this returns `true`.
    pub fn open(
        &mut self,
        dom: &dyn PageDom,
        connection: &ConnectionFlag,
        trigger: &FloatTrigger,
    ) -> bool {
        if trigger.requires_connection && !connection.is_connected() {
            log::debug!("[Floats] '{}' needs a connection, ignoring", trigger.panel);
            return false;
        }

        let display = trigger.display.clone().unwrap_or_default();
        if dom.set_display(&trigger.panel, &display) == 0 {
            log::debug!("[Floats] '{}' matched no element", trigger.panel);
        }
        self.open.insert(trigger.panel.clone());
        true
    }

    /// Forgets a panel hidden by the generic close action.
    pub fn mark_closed(&mut self, panel: &str) -> bool {
        self.open.remove(panel)
    }

    pub fn is_open(&self, panel: &str) -> bool {
        self.open.contains(panel)
    }

    pub fn open_panels(&self) -> impl Iterator<Item = &str> {
        self.open.iter().map(String::as_str)
    }
}
