//! Settings modal
//!
//! Opening loads the stored preferences into the form controls and
//! applies the theme. Closing reads the controls back, writes all five
//! keys and re-applies the theme from storage.

use std::cell::Cell;
use std::rc::Rc;

use studydesk_protocol::{Notify, Settings, Theme, Volume};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::dom::{
    checked_radio, find, groups, ids, radio_group, require, select_radio, set_hidden_class,
};
use crate::error::Result;
use crate::storage::SettingsRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open,
}

/// Raw control values as read from the form
///
/// `None` for a volume or the toggle means the control is not on the
/// page; the stored value is kept. A radio group with nothing checked
/// falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub volume_left: Option<String>,
    pub volume_right: Option<String>,
    pub notify: Option<String>,
    pub auto_checkin: Option<bool>,
    pub theme: Option<String>,
}

impl FormSnapshot {
    pub fn into_settings(self, current: &Settings) -> Settings {
        Settings {
            theme: Theme::parse(self.theme.as_deref()),
            volume_left: self
                .volume_left
                .map_or(current.volume_left, |v| Volume::parse(Some(&v))),
            volume_right: self
                .volume_right
                .map_or(current.volume_right, |v| Volume::parse(Some(&v))),
            notify: Notify::parse(self.notify.as_deref()),
            auto_checkin: self.auto_checkin.unwrap_or(current.auto_checkin),
        }
    }
}

/// Form controls, theme target and modal visibility
pub trait SettingsView {
    fn fill(&self, settings: &Settings);
    fn read(&self) -> FormSnapshot;
    fn apply_theme(&self, theme: &Theme);
    fn set_open(&self, open: bool);
}

pub struct SettingsPanel<V> {
    repo: Rc<SettingsRepository>,
    view: V,
    state: Cell<PanelState>,
}

impl<V: SettingsView> SettingsPanel<V> {
    pub const fn new(repo: Rc<SettingsRepository>, view: V) -> Self {
        Self {
            repo,
            view,
            state: Cell::new(PanelState::Closed),
        }
    }

    pub fn state(&self) -> PanelState {
        self.state.get()
    }

    pub fn open(&self) {
        let settings = self.repo.load();
        self.view.fill(&settings);
        self.view.apply_theme(&settings.theme);
        self.view.set_open(true);
        tracing::debug!(from = ?self.state(), ?settings, "settings panel opened");
        self.state.set(PanelState::Open);
    }

    pub fn close(&self) {
        let current = self.repo.load();
        let settings = self.view.read().into_settings(&current);
        if let Err(e) = self.repo.save(&settings) {
            tracing::warn!(error = %e, "settings not fully saved");
        }
        self.view.apply_theme(&self.repo.theme());
        self.view.set_open(false);
        self.state.set(PanelState::Closed);
        tracing::debug!(?settings, "settings panel closed");
    }
}

/// The real modal and its controls
pub struct DomSettingsView {
    body: Option<HtmlElement>,
    modal: Element,
    volume_left: Option<HtmlInputElement>,
    volume_right: Option<HtmlInputElement>,
    auto_checkin: Option<HtmlInputElement>,
    notify: Vec<HtmlInputElement>,
    theme: Vec<HtmlInputElement>,
}

impl DomSettingsView {
    pub fn new(doc: &Document, modal: Element) -> Self {
        Self {
            body: doc.body(),
            modal,
            volume_left: find(doc, ids::VOLUME_LEFT),
            volume_right: find(doc, ids::VOLUME_RIGHT),
            auto_checkin: find(doc, ids::AUTO_CHECKIN),
            notify: radio_group(doc, groups::NOTIFY),
            theme: radio_group(doc, groups::THEME),
        }
    }
}

impl SettingsView for DomSettingsView {
    fn fill(&self, settings: &Settings) {
        if let Some(el) = &self.volume_left {
            el.set_value(&settings.volume_left.to_string());
        }
        if let Some(el) = &self.volume_right {
            el.set_value(&settings.volume_right.to_string());
        }
        select_radio(&self.notify, settings.notify.as_str());
        if let Some(el) = &self.auto_checkin {
            el.set_checked(settings.auto_checkin);
        }
    }

    fn read(&self) -> FormSnapshot {
        FormSnapshot {
            volume_left: self.volume_left.as_ref().map(HtmlInputElement::value),
            volume_right: self.volume_right.as_ref().map(HtmlInputElement::value),
            notify: checked_radio(&self.notify),
            auto_checkin: self.auto_checkin.as_ref().map(HtmlInputElement::checked),
            theme: checked_radio(&self.theme),
        }
    }

    fn apply_theme(&self, theme: &Theme) {
        if let Some(body) = &self.body {
            let _ = body.dataset().set("theme", theme.as_str());
        }
        select_radio(&self.theme, theme.as_str());
    }

    fn set_open(&self, open: bool) {
        set_hidden_class(&self.modal, !open);
    }
}

/// Wire the settings button and close button
///
/// Needs `#btn-settings`, `#settings-modal` and `#btn-close-settings`;
/// without all three the panel stays unwired.
pub fn mount(doc: &Document, repo: Rc<SettingsRepository>) -> Result<()> {
    let (open_btn, modal, close_btn) = match (
        require::<Element>(doc, ids::SETTINGS_BUTTON),
        require::<Element>(doc, ids::SETTINGS_MODAL),
        require::<Element>(doc, ids::SETTINGS_CLOSE),
    ) {
        (Ok(open), Ok(modal), Ok(close)) => (open, modal, close),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            tracing::debug!(reason = %e, "settings panel not wired");
            return Ok(());
        }
    };

    let view = DomSettingsView::new(doc, modal);
    view.apply_theme(&repo.theme());
    let panel = Rc::new(SettingsPanel::new(repo, view));

    let open_panel = panel.clone();
    let on_open = Closure::wrap(Box::new(move || {
        open_panel.open();
    }) as Box<dyn FnMut()>);
    open_btn.add_event_listener_with_callback("click", on_open.as_ref().unchecked_ref())?;
    on_open.forget();

    let on_close = Closure::wrap(Box::new(move || {
        panel.close();
    }) as Box<dyn FnMut()>);
    close_btn.add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())?;
    on_close.forget();

    tracing::debug!("settings panel mounted");
    Ok(())
}
