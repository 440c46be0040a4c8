// Shared state structs to avoid circular dependencies.
// These are used by the page controller and the pure logic modules, and can be
// tested independently.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A CSS `display` value the page assigns to elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Display {
    None,
    #[default]
    Block,
    Flex,
    InlineBlock,
    /// Any other token a trigger asks for (`grid`, `inline-flex`, ...).
    Other(String),
}

impl Display {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Block => "block",
            Self::Flex => "flex",
            Self::InlineBlock => "inline-block",
            Self::Other(token) => token.as_str(),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for Display {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "none" => Self::None,
            "block" => Self::Block,
            "flex" => Self::Flex,
            "inline-block" => Self::InlineBlock,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tab control and the container it reveals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabPair {
    /// Selector of the tab control (receives the `active` class).
    pub tab: String,
    /// Element id of the container (shown as `flex` when selected).
    pub container: String,
}

impl TabPair {
    pub fn new(tab: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            tab: tab.into(),
            container: container.into(),
        }
    }
}

/// The fixed, page-declared set of tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabSet {
    pairs: Vec<TabPair>,
}

impl TabSet {
    pub fn new(pairs: Vec<TabPair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[TabPair] {
        &self.pairs
    }

    pub fn find(&self, container: &str) -> Option<&TabPair> {
        self.pairs.iter().find(|p| p.container == container)
    }

    /// Container ids in declaration order, each listed once even when several
    /// tab controls point at it.
    pub fn containers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.pairs.len());
        for pair in &self.pairs {
            if !seen.contains(&pair.container.as_str()) {
                seen.push(&pair.container);
            }
        }
        seen
    }
}

/// What a `[data-open]` trigger asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatTrigger {
    /// Selector of the panel to reveal.
    pub panel: String,
    /// Requested display mode; `block` when the trigger names none.
    pub display: Option<Display>,
    /// Set when the trigger carries the `connect-enable` class.
    pub requires_connection: bool,
}

impl FloatTrigger {
    pub fn new(panel: impl Into<String>) -> Self {
        Self {
            panel: panel.into(),
            display: None,
            requires_connection: false,
        }
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    pub fn requiring_connection(mut self) -> Self {
        self.requires_connection = true;
        self
    }
}

/// Read-only view of the host's connectivity flag.
///
/// Clones share the same cell, so the host keeps one handle to flip and the
/// page keeps another to read.
#[derive(Debug, Clone, Default)]
pub struct ConnectionFlag(Rc<Cell<bool>>);

impl ConnectionFlag {
    pub fn new(connected: bool) -> Self {
        Self(Rc::new(Cell::new(connected)))
    }

    pub fn is_connected(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, connected: bool) {
        self.0.set(connected);
    }
}
