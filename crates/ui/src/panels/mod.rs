use std::rc::Rc;

use web_sys::Document;

use crate::config::UiConfig;
use crate::error::Result;
use crate::storage::SettingsRepository;

pub mod search;
pub mod settings;

/// Wire every panel present on the page
///
/// Panels are independent: one failing to wire leaves the others alone.
pub fn init(doc: &Document, repo: Rc<SettingsRepository>, config: &UiConfig) {
    report("search", search::mount(doc, config));
    report("settings", settings::mount(doc, repo));
}

/// Log a failed mount; `true` when the panel is wired
fn report(panel: &'static str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(panel, error = %e, "panel not wired");
            false
        }
    }
}
