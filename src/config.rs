use serde::{Deserialize, Serialize};

use crate::dom::{attr_selector, PageDom};
use crate::error::{Error, Result};
use crate::modules::tabs::DEFAULT_CONTAINER;
use crate::state::{Display, TabPair, TabSet};

pub const COMMIT_SELECTOR: &str = "#commit";

/// Extra work a toggle does besides updating its setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SideEffect {
    /// Hides the commit control while enabled, shows it inline otherwise.
    HideCommit,
}

impl SideEffect {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "hideCommit" => Some(Self::HideCommit),
            _ => None,
        }
    }

    pub fn apply(self, dom: &dyn PageDom, commit: &str, enabled: bool) {
        match self {
            Self::HideCommit => {
                let display = if enabled {
                    Display::None
                } else {
                    Display::InlineBlock
                };
                dom.set_display(commit, &display);
            }
        }
    }
}

/// A checkbox bound to a saved setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleControl {
    /// Selector of the checkbox.
    pub selector: String,
    /// Name in the settings registry.
    pub setting: String,
    /// Saved-store key; unique per control.
    pub key: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub extra: Option<SideEffect>,
}

impl ToggleControl {
    pub fn new(setting: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            selector: attr_selector("input", "data-toggle-name", &key),
            setting: setting.into(),
            key,
            default: false,
            extra: None,
        }
    }

    pub fn with_extra(mut self, extra: SideEffect) -> Self {
        self.extra = Some(extra);
        self
    }
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_commit() -> String {
    COMMIT_SELECTOR.to_string()
}

/// Everything the page declares up front: its toggles, its tabs, its main
/// containers and the commit control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(default)]
    pub toggles: Vec<ToggleControl>,
    #[serde(default)]
    pub tabs: TabSet,
    /// Main container ids no tab has to point at; hidden on every select.
    #[serde(default)]
    pub containers: Vec<String>,
    #[serde(default = "default_container")]
    pub default_container: String,
    #[serde(default = "default_commit")]
    pub commit: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            toggles: vec![
                ToggleControl::new("instant", "instantToggle").with_extra(SideEffect::HideCommit),
                ToggleControl::new("playback", "playbackToggle"),
                ToggleControl::new("record", "recordToggle"),
            ],
            tabs: TabSet::new(
                ["mainboard-container", "combos-container", "overrides-container"]
                    .into_iter()
                    .map(main_tab)
                    .collect(),
            ),
            containers: Vec::new(),
            default_container: default_container(),
            commit: default_commit(),
        }
    }
}

impl PageLayout {
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Toggle keys must be non-empty and unique.
    pub fn validate(&self) -> Result<()> {
        for (i, toggle) in self.toggles.iter().enumerate() {
            if let Some(problem) = toggle_problem(&self.toggles[..i], toggle) {
                return Err(Error::Layout(problem));
            }
        }
        Ok(())
    }

    /// Drops every toggle `validate` would reject, keeping the first control
    /// for a repeated key. Returns how many were dropped.
    pub fn retain_valid_toggles(&mut self) -> usize {
        let mut kept: Vec<ToggleControl> = Vec::with_capacity(self.toggles.len());
        let mut dropped = 0;
        for toggle in std::mem::take(&mut self.toggles) {
            match toggle_problem(&kept, &toggle) {
                Some(problem) => {
                    log::warn!("[Layout] Skipping toggle: {}", problem);
                    dropped += 1;
                }
                None => kept.push(toggle),
            }
        }
        self.toggles = kept;
        dropped
    }

    pub fn toggle(&self, key: &str) -> Option<&ToggleControl> {
        self.toggles.iter().find(|t| t.key == key)
    }
}

/// Tab control for `container`: the `.main-select` whose `data-target` names it.
pub fn main_tab(container: &str) -> TabPair {
    TabPair::new(attr_selector(".main-select", "data-target", container), container)
}

fn toggle_problem(earlier: &[ToggleControl], toggle: &ToggleControl) -> Option<String> {
    if toggle.key.is_empty() {
        Some(format!("toggle '{}' has an empty key", toggle.selector))
    } else if earlier.iter().any(|t| t.key == toggle.key) {
        Some(format!("toggle key '{}' is declared twice", toggle.key))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingDom;
    use rstest::rstest;

    #[test]
    fn test_default_layout_is_valid() {
        let layout = PageLayout::default();
        layout.validate().unwrap();
        assert_eq!(layout.tabs.pairs().len(), 3);
        assert_eq!(layout.default_container, "mainboard-container");
        assert_eq!(layout.toggle("instantToggle").and_then(|t| t.extra), Some(SideEffect::HideCommit));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let layout = PageLayout::from_json(
            r##"{
                "toggles": [
                    { "selector": "#rec", "setting": "record", "key": "recordToggle" },
                    { "selector": "#inst", "setting": "instant", "key": "instantToggle",
                      "default": true, "extra": "hideCommit" }
                ],
                "tabs": [ { "tab": "#tab-main", "container": "mainboard-container" } ],
                "containers": [ "macros-container" ]
            }"##,
        )
        .unwrap();

        assert_eq!(layout.commit, "#commit");
        assert_eq!(layout.default_container, "mainboard-container");
        assert!(!layout.toggles[0].default);
        assert_eq!(layout.toggles[0].extra, None);
        assert!(layout.toggles[1].default);
        assert_eq!(layout.toggles[1].extra, Some(SideEffect::HideCommit));
        assert_eq!(layout.tabs.pairs()[0].tab, "#tab-main");
        assert_eq!(layout.containers, vec!["macros-container".to_string()]);
    }

    #[rstest]
    #[case(r##"{ "toggles": [ { "selector": "#a", "setting": "a", "key": "" } ] }"##)]
    #[case(r##"{ "toggles": [
        { "selector": "#a", "setting": "a", "key": "same" },
        { "selector": "#b", "setting": "b", "key": "same" } ] }"##)]
    fn test_invalid_toggles_are_rejected(#[case] json: &str) {
        assert!(matches!(PageLayout::from_json(json), Err(Error::Layout(_))));
    }

    #[test]
    fn test_retain_valid_toggles_keeps_the_rest() {
        let mut layout = PageLayout {
            toggles: vec![
                ToggleControl::new("record", ""),
                ToggleControl::new("record", "recordToggle"),
                ToggleControl::new("instant", "instantToggle"),
                ToggleControl::new("playback", "recordToggle"),
            ],
            ..PageLayout::default()
        };

        assert_eq!(layout.retain_valid_toggles(), 2);
        layout.validate().unwrap();
        let keys: Vec<&str> = layout.toggles.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["recordToggle", "instantToggle"]);
        assert_eq!(layout.toggle("recordToggle").map(|t| t.setting.as_str()), Some("record"));
        assert_eq!(layout.retain_valid_toggles(), 0);
    }

    #[test]
    fn test_selectors_quote_odd_values() {
        assert_eq!(
            ToggleControl::new("record", "rec \"1\"").selector,
            "input[data-toggle-name=\"rec \\\"1\\\"\"]"
        );
        assert_eq!(main_tab("2nd board").tab, ".main-select[data-target=\"2nd board\"]");
    }

    #[test]
    fn test_unknown_side_effect_is_a_json_error() {
        let json = r##"{ "toggles": [ { "selector": "#a", "setting": "a", "key": "a", "extra": "explode" } ] }"##;
        assert!(matches!(PageLayout::from_json(json), Err(Error::Json(_))));
    }

    #[rstest]
    #[case(true, Display::None)]
    #[case(false, Display::InlineBlock)]
    fn test_hide_commit(#[case] enabled: bool, #[case] expected: Display) {
        let dom = RecordingDom::new();
        SideEffect::HideCommit.apply(&dom, COMMIT_SELECTOR, enabled);
        assert_eq!(dom.display_of("#commit"), Some(expected));
    }

    #[test]
    fn test_side_effect_tokens() {
        assert_eq!(SideEffect::from_token("hideCommit"), Some(SideEffect::HideCommit));
        assert_eq!(SideEffect::from_token("showCommit"), None);
    }
}
