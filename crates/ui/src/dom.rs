use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement, HtmlInputElement, Window};

use crate::error::{Result, UiError};

/// Element ids the page is expected to provide
pub mod ids {
    pub const SEARCH_INPUT: &str = "search-input";
    pub const SEARCH_RESULTS: &str = "search-results";
    pub const SETTINGS_BUTTON: &str = "btn-settings";
    pub const SETTINGS_MODAL: &str = "settings-modal";
    pub const SETTINGS_CLOSE: &str = "btn-close-settings";
    pub const VOLUME_LEFT: &str = "vol-left";
    pub const VOLUME_RIGHT: &str = "vol-right";
    pub const AUTO_CHECKIN: &str = "auto-checkin";
}

/// Radio group names
pub mod groups {
    pub const NOTIFY: &str = "notify";
    pub const THEME: &str = "theme";
}

pub fn get_window() -> Result<Window> {
    window().ok_or(UiError::NoWindow)
}

pub fn get_document() -> Result<Document> {
    get_window()?.document().ok_or(UiError::NoWindow)
}

/// Look up an element and cast it, `None` if absent or of another type
pub fn find<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Like [`find`], but absence is an error naming the id
pub fn require<T: JsCast>(doc: &Document, id: &'static str) -> Result<T> {
    find(doc, id).ok_or(UiError::MissingElement(id))
}

/// Toggle `display` between `block` and `none`
pub fn set_displayed(el: &HtmlElement, shown: bool) {
    let display = if shown { "block" } else { "none" };
    let _ = el.style().set_property("display", display);
}

/// Toggle the `hidden` class
pub fn set_hidden_class(el: &Element, hidden: bool) {
    let classes = el.class_list();
    let _ = if hidden {
        classes.add_1("hidden")
    } else {
        classes.remove_1("hidden")
    };
}

/// All `<input name=...>` elements of a radio group, in document order
pub fn radio_group(doc: &Document, name: &str) -> Vec<HtmlInputElement> {
    let Ok(nodes) = doc.query_selector_all(&format!("input[name={name}]")) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect()
}

/// Check the radio whose value matches, uncheck the rest
pub fn select_radio(radios: &[HtmlInputElement], value: &str) {
    for radio in radios {
        radio.set_checked(radio.value() == value);
    }
}

/// Value of the checked radio, if any
pub fn checked_radio(radios: &[HtmlInputElement]) -> Option<String> {
    radios.iter().find(|r| r.checked()).map(HtmlInputElement::value)
}
