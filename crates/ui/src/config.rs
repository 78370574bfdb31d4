//! Page configuration
//!
//! Read from an optional `<script id="studydesk-config" type="application/json">`
//! element. Every field has a default, so the page works without one.

use serde::{Deserialize, Deserializer};
use web_sys::Document;

pub const CONFIG_ELEMENT_ID: &str = "studydesk-config";

/// Ambient audio tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Starting oscillator frequency: `min + U[0, span)` Hz
    #[serde(deserialize_with = "initial_hz")]
    pub initial_hz: HzRange,
    /// Drift target frequency: `min + U[0, span)` Hz
    #[serde(deserialize_with = "target_hz")]
    pub target_hz: HzRange,
    /// Drift period per voice: `min + U[0, jitter)` ms
    pub interval_ms: IntervalRange,
    pub ramp_secs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HzRange {
    pub min: f32,
    pub span: f32,
}

impl HzRange {
    pub const INITIAL: Self = Self {
        min: 220.0,
        span: 200.0,
    };
    pub const TARGET: Self = Self {
        min: 220.0,
        span: 300.0,
    };
}

/// Either half of an `HzRange` may be left out of the page config
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HzOverride {
    min: Option<f32>,
    span: Option<f32>,
}

impl HzOverride {
    fn over(self, base: HzRange) -> HzRange {
        HzRange {
            min: self.min.unwrap_or(base.min),
            span: self.span.unwrap_or(base.span),
        }
    }
}

fn initial_hz<'de, D: Deserializer<'de>>(d: D) -> Result<HzRange, D::Error> {
    Ok(HzOverride::deserialize(d)?.over(HzRange::INITIAL))
}

fn target_hz<'de, D: Deserializer<'de>>(d: D) -> Result<HzRange, D::Error> {
    Ok(HzOverride::deserialize(d)?.over(HzRange::TARGET))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntervalRange {
    pub min: u32,
    pub jitter: u32,
}

impl Default for IntervalRange {
    fn default() -> Self {
        Self {
            min: 1800,
            jitter: 800,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_hz: HzRange::INITIAL,
            target_hz: HzRange::TARGET,
            interval_ms: IntervalRange::default(),
            ramp_secs: 2.0,
        }
    }
}

/// Full front-end configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub search_endpoint: String,
    pub log_level: String,
    pub audio: AudioConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_endpoint: "/search".to_string(),
            log_level: "info".to_string(),
            audio: AudioConfig::default(),
        }
    }
}

impl UiConfig {
    /// Load from the page, falling back to defaults
    ///
    /// Logging is not up yet when this runs, so a parse failure is
    /// handed back for the caller to report.
    pub fn from_document(doc: &Document) -> (Self, Option<serde_json::Error>) {
        let text = doc
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
            .unwrap_or_default();
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> (Self, Option<serde_json::Error>) {
        if text.trim().is_empty() {
            return (Self::default(), None);
        }
        match serde_json::from_str(text) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn max_level(&self) -> tracing::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_gives_defaults() {
        let (config, err) = UiConfig::from_json("  ");
        assert!(err.is_none());
        assert_eq!(config, UiConfig::default());
        assert_eq!(config.search_endpoint, "/search");
        assert_eq!(config.audio.interval_ms.min, 1800);
    }

    #[test]
    fn test_partial_override() {
        let (config, err) =
            UiConfig::from_json(r#"{"search_endpoint":"/api/search","audio":{"enabled":false}}"#);
        assert!(err.is_none());
        assert_eq!(config.search_endpoint, "/api/search");
        assert!(!config.audio.enabled);
        assert_eq!(config.audio.ramp_secs, 2.0);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_nested_override_keeps_other_fields() {
        let (config, err) = UiConfig::from_json(
            r#"{"search_endpoint":"/api/search","audio":{"interval_ms":{"min":1000},"target_hz":{"span":50}}}"#,
        );
        assert!(err.is_none(), "{err:?}");
        assert_eq!(config.search_endpoint, "/api/search");
        assert_eq!(config.audio.interval_ms, IntervalRange { min: 1000, jitter: 800 });
        assert_eq!(config.audio.target_hz, HzRange { min: 220.0, span: 50.0 });
        assert_eq!(config.audio.initial_hz, HzRange::INITIAL);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let (config, err) = UiConfig::from_json("{not json");
        assert!(err.is_some());
        assert_eq!(config, UiConfig::default());
    }

    #[test]
    fn test_max_level() {
        let (config, _) = UiConfig::from_json(r#"{"log_level":"DEBUG"}"#);
        assert_eq!(config.max_level(), tracing::Level::DEBUG);
        let (config, _) = UiConfig::from_json(r#"{"log_level":"chatty"}"#);
        assert_eq!(config.max_level(), tracing::Level::INFO);
    }
}
