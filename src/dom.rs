// Seams between the page logic and whatever renders the page.
// The browser host implements these over web-sys; tests use recording fakes.

use crate::state::Display;

/// The DOM mutations the page performs. Every method returns how many
/// elements the selector matched; zero is not an error.
pub trait PageDom {
    fn set_display(&self, selector: &str, display: &Display) -> usize;
    fn set_class(&self, selector: &str, class: &str, enabled: bool) -> usize;
    fn set_checked(&self, selector: &str, checked: bool) -> usize;
}

/// Page-wide actions owned by other scripts on the page.
pub trait PageActions {
    /// Closes the open menu overlay, if any.
    fn menu_close(&self);
    /// Clears the current key selection, closing the on-screen key picker.
    fn select_key(&self);
    /// Commits all pending changes.
    fn commit(&self);
}

/// Quotes `value` as a CSS string, so any attribute value fits in a selector.
pub fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => quoted.push_str(&format!("\\{:x} ", u32::from(c))),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Selector for the element(s) with id `id`.
///
/// Plain identifiers keep the short `#id` form; anything else (a leading
/// digit, spaces, dots, quotes) goes through an `[id="..."]` match.
pub fn id_selector(id: &str) -> String {
    if is_identifier(id) {
        format!("#{}", id)
    } else {
        format!("[id={}]", css_string(id))
    }
}

/// `base` narrowed to elements whose `attr` equals `value` exactly.
pub fn attr_selector(base: &str, attr: &str, value: &str) -> String {
    format!("{}[{}={}]", base, attr, css_string(value))
}

fn is_identifier(value: &str) -> bool {
    let name_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || !first.is_ascii() => {
            chars.all(name_char)
        }
        _ => false,
    }
}
