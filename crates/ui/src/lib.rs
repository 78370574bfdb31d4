//! Study Desk page front-end
//!
//! Three independent widgets share one page: search-as-you-type, the
//! settings modal, and an ambient stereo tone generator. They only meet
//! through the persisted preferences in [`storage::SettingsRepository`].

mod audio;
mod config;
mod dom;
mod error;
mod logging;
mod panels;
mod storage;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::config::UiConfig;
use crate::dom::{get_document, get_window};
use crate::storage::SettingsRepository;

pub use crate::error::UiError;

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = get_window()?;
    let document = get_document()?;

    let (config, config_err) = UiConfig::from_document(&document);
    logging::init(config.max_level());
    if let Some(e) = config_err {
        tracing::warn!(error = %e, "ignoring malformed page config");
    }

    let repo = Rc::new(SettingsRepository::from_window(&window));

    panels::init(&document, repo.clone(), &config);

    // Audio is best-effort; a half-built graph must not take the page down
    if let Err(e) = audio::start(&window, &document, repo, &config.audio) {
        tracing::warn!(error = %e, "ambient audio not started");
    }

    tracing::info!("studydesk ui ready");
    Ok(())
}
