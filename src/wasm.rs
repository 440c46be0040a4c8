// Browser host: web-sys implementations of the page seams, layout discovery and
// the document-level listeners that feed `Page::dispatch`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Storage};

use crate::config::{main_tab, PageLayout, SideEffect, ToggleControl};
use crate::dom::{PageActions, PageDom};
use crate::error::{Error, Result};
use crate::logging;
use crate::page::{Click, Opener, Page, PageEvent, PageHost};
use crate::settings::{MemoryStore, SavedStore};
use crate::state::{ConnectionFlag, Display, TabPair, TabSet};

const LAYOUT_SCRIPT_ID: &str = "page-layout";
const TOGGLE_SELECTOR: &str = "input[type=\"checkbox\"][data-toggle]";
const TAB_SELECTOR: &str = ".main-select[data-target]";
const CONTAINER_SELECTOR: &str = ".main-container";

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    static CONNECTION: ConnectionFlag = ConnectionFlag::default();
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ACTION, js_name = menuClose)]
    fn action_menu_close() -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ACTION, js_name = selectKey)]
    fn action_select_key() -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = CHANGES, js_name = commit)]
    fn changes_commit() -> std::result::Result<(), JsValue>;
}

/// Called by the device layer whenever the keyboard connects or disconnects.
#[wasm_bindgen]
pub fn set_connected(connected: bool) {
    CONNECTION.with(|flag| flag.set(connected));
}

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init(logging::default_level());

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is unavailable"))?;

    if document.ready_state() == "loading" {
        listen(&document, "DOMContentLoaded", |_| {
            if let Err(e) = boot() {
                log::error!("[Page] Boot failed: {}", e);
            }
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))
    } else {
        boot().map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn boot() -> Result<()> {
    let window = web_sys::window().ok_or(Error::HostUnavailable("window"))?;
    let document = window
        .document()
        .ok_or(Error::HostUnavailable("document"))?;

    let store: Rc<dyn SavedStore> = match window.local_storage() {
        Ok(Some(storage)) => Rc::new(LocalStorageStore { storage }),
        _ => {
            log::warn!("[Page] localStorage is unavailable, settings last for this session only");
            Rc::new(MemoryStore::new())
        }
    };

    let layout = discover_layout(&document);
    let host = PageHost {
        store,
        dom: Rc::new(WebDom {
            document: document.clone(),
        }),
        actions: Rc::new(JsPageActions),
        connection: CONNECTION.with(ConnectionFlag::clone),
    };
    let page = Page::load(&layout, host);
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));

    let commit = layout.commit.clone();
    listen(&document, "click", move |event| {
        if let Some(target) = event_element(&event) {
            dispatch(click_at(&target, &commit).events());
        }
    })?;
    listen(&document, "change", |event| {
        if let Some(key) = event_element(&event)
            .and_then(|target| closest(&target, TOGGLE_SELECTOR))
            .and_then(|input| input.get_attribute("data-toggle-name"))
        {
            dispatch(vec![PageEvent::Toggle { key }]);
        }
    })?;

    Ok(())
}

fn dispatch(events: Vec<PageEvent>) {
    if events.is_empty() {
        return;
    }
    PAGE.with(|slot| match slot.try_borrow_mut() {
        Ok(mut page) => {
            if let Some(page) = page.as_mut() {
                for event in events {
                    page.dispatch(event);
                }
            }
        }
        Err(_) => log::warn!("[Page] Ignoring event raised while another is being handled"),
    });
}

fn listen(
    document: &Document,
    event: &'static str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<()> {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
    document
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|_| Error::Listener { event })?;
    // The listener lives as long as the page.
    callback.forget();
    Ok(())
}

fn event_element(event: &web_sys::Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}

/// Collects the trigger attributes around `target` for `Click::events`.
fn click_at(target: &Element, commit: &str) -> Click {
    let mut click = Click::default();

    if let Some(close) = closest(target, ".close") {
        match closest(&close, ".closeable") {
            Some(closeable) => {
                let id = closeable.id();
                // Without an id there is no selector to route through the page.
                if id.is_empty() {
                    hide(&closeable);
                }
                click.closeable = Some(id);
            }
            None => log::debug!("[Page] .close outside any .closeable"),
        }
    }

    click.mainboard = closest(target, "[data-mainboard]")
        .and_then(|tab| tab.get_attribute("data-mainboard"));

    click.opener = closest(target, "[data-open]").and_then(|opener| {
        Some(Opener {
            panel: opener.get_attribute("data-open")?,
            display: opener.get_attribute("data-display"),
            connect_enable: opener.class_list().contains("connect-enable"),
        })
    });

    click.commit = closest(target, commit).is_some();
    click
}

fn hide(element: &Element) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        set_style_display(element, &Display::None);
    }
}

fn set_style_display(element: &HtmlElement, display: &Display) {
    if let Err(e) = element.style().set_property("display", display.as_str()) {
        log::warn!("[Dom] Failed to set display '{}': {:?}", display, e);
    }
}

/// Reads the layout from an embedded JSON script, or from the markup itself.
///
/// Neither path fails the boot: a broken script falls back to the markup and
/// unusable toggles are skipped.
fn discover_layout(document: &Document) -> PageLayout {
    if let Some(script) = document.get_element_by_id(LAYOUT_SCRIPT_ID) {
        match PageLayout::from_json(&script.text_content().unwrap_or_default()) {
            Ok(layout) => {
                log::info!("[Page] Using embedded layout");
                return layout;
            }
            Err(e) => log::error!("[Page] Ignoring embedded layout: {}", e),
        }
    }

    let dom = WebDom {
        document: document.clone(),
    };

    let mut toggles = Vec::new();
    for input in dom.elements(TOGGLE_SELECTOR) {
        let key = input.get_attribute("data-toggle-name").unwrap_or_default();
        let setting = input.get_attribute("data-toggle").unwrap_or_default();
        let mut control = ToggleControl::new(setting, key);
        control.default = input.get_attribute("data-toggle-default").as_deref() == Some("true");
        control.extra = input
            .get_attribute("data-extra")
            .and_then(|token| SideEffect::from_token(&token));
        toggles.push(control);
    }

    let mut pairs: Vec<TabPair> = Vec::new();
    for tab in dom.elements(TAB_SELECTOR) {
        let Some(target) = tab.get_attribute("data-target") else {
            continue;
        };
        let pair = main_tab(&target);
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }

    let containers = dom
        .elements(CONTAINER_SELECTOR)
        .iter()
        .map(Element::id)
        .filter(|id| !id.is_empty())
        .collect();

    let mut layout = PageLayout {
        toggles,
        tabs: TabSet::new(pairs),
        containers,
        ..PageLayout::default()
    };
    layout.retain_valid_toggles();
    layout
}

struct WebDom {
    document: Document,
}

impl WebDom {
    fn elements(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            log::warn!("[Dom] Invalid selector '{}'", selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl PageDom for WebDom {
    fn set_display(&self, selector: &str, display: &Display) -> usize {
        let mut matched = 0;
        for element in self.elements(selector) {
            if let Some(element) = element.dyn_ref::<HtmlElement>() {
                set_style_display(element, display);
                matched += 1;
            }
        }
        matched
    }

    fn set_class(&self, selector: &str, class: &str, enabled: bool) -> usize {
        let elements = self.elements(selector);
        for element in &elements {
            if let Err(e) = element.class_list().toggle_with_force(class, enabled) {
                log::warn!("[Dom] Failed to toggle class '{}' on '{}': {:?}", class, selector, e);
            }
        }
        elements.len()
    }

    fn set_checked(&self, selector: &str, checked: bool) -> usize {
        let mut matched = 0;
        for element in self.elements(selector) {
            if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
                input.set_checked(checked);
                matched += 1;
            }
        }
        matched
    }
}

struct LocalStorageStore {
    storage: Storage,
}

impl SavedStore for LocalStorageStore {
    fn get_saved(&self, key: &str, default: &str) -> String {
        self.storage
            .get_item(key)
            .ok()
            .flatten()
            .unwrap_or_else(|| default.to_string())
    }

    fn set_saved(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            log::warn!("[Settings] Failed to save '{}': {:?}", key, e);
        }
    }
}

struct JsPageActions;

impl JsPageActions {
    fn call(name: &str, result: std::result::Result<(), JsValue>) {
        if let Err(e) = result {
            log::warn!("[Page] {} failed: {:?}", name, e);
        }
    }
}

impl PageActions for JsPageActions {
    fn menu_close(&self) {
        Self::call("ACTION.menuClose", action_menu_close());
    }

    fn select_key(&self) {
        Self::call("ACTION.selectKey", action_select_key());
    }

    fn commit(&self) {
        Self::call("CHANGES.commit", changes_commit());
    }
}
