use wasm_bindgen::JsValue;

/// Front-end error type
///
/// Nothing here is fatal to the page; callers log and carry on.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("No global `window` exists")]
    NoWindow,
    #[error("Element not found: #{0}")]
    MissingElement(&'static str),
    #[error("JS error: {0}")]
    Js(String),
    #[error("HTTP error: status {status}")]
    Http { status: u16 },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<JsValue> for UiError {
    fn from(value: JsValue) -> Self {
        Self::Js(describe_js(&value))
    }
}

impl From<UiError> for JsValue {
    fn from(err: UiError) -> Self {
        Self::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UiError>;

/// Best-effort text for a thrown JS value
pub fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
