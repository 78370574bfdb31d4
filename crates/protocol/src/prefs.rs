//! Typed preference values
//!
//! Everything is a string at rest. Parsing never fails: a missing or
//! malformed value turns into the documented default, so the store can
//! be empty, stale, or written by another version of the page.

use crate::keys::PreferenceKey;

/// Visual theme, applied as `data-theme` on the document body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Color,
    Dark,
    Light,
    /// A theme this build does not know about, kept verbatim
    Other(String),
}

impl Theme {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::default(),
            Some("color") => Self::Color,
            Some("dark") => Self::Dark,
            Some("light") => Self::Light,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Color => "color",
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification preference
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Notify {
    #[default]
    On,
    Off,
    Other(String),
}

impl Notify {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::default(),
            Some("on") => Self::On,
            Some("off") => Self::Off,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for Notify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel gain in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    pub const DEFAULT: Self = Self(0.3);

    /// Clamp into range; non-finite input yields the default
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self::DEFAULT
        }
    }

    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<f32>().ok())
            .map_or(Self::DEFAULT, Self::new)
    }

    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Only the exact string `true` counts as enabled
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// Stereo channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const fn key(self) -> PreferenceKey {
        match self {
            Self::Left => PreferenceKey::VolumeLeft,
            Self::Right => PreferenceKey::VolumeRight,
        }
    }

    /// Merger input index for this channel
    pub const fn index(self) -> u32 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// All persisted preferences
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub theme: Theme,
    pub volume_left: Volume,
    pub volume_right: Volume,
    pub notify: Notify,
    pub auto_checkin: bool,
}

impl Settings {
    /// Build from raw stored strings
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&PreferenceKey) -> Option<String>,
    {
        Self {
            theme: Theme::parse(lookup(&PreferenceKey::Theme).as_deref()),
            volume_left: Volume::parse(lookup(&PreferenceKey::VolumeLeft).as_deref()),
            volume_right: Volume::parse(lookup(&PreferenceKey::VolumeRight).as_deref()),
            notify: Notify::parse(lookup(&PreferenceKey::Notify).as_deref()),
            auto_checkin: parse_flag(lookup(&PreferenceKey::AutoCheckin).as_deref()),
        }
    }

    /// String encoding of every value, ready to store
    pub fn to_pairs(&self) -> Vec<(PreferenceKey, String)> {
        vec![
            (PreferenceKey::VolumeLeft, self.volume_left.to_string()),
            (PreferenceKey::VolumeRight, self.volume_right.to_string()),
            (PreferenceKey::Notify, self.notify.to_string()),
            (PreferenceKey::AutoCheckin, self.auto_checkin.to_string()),
            (PreferenceKey::Theme, self.theme.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_empty_store() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.theme, Theme::Color);
        assert_eq!(settings.volume_left.get(), 0.3);
        assert_eq!(settings.volume_right.get(), 0.3);
        assert_eq!(settings.notify, Notify::On);
        assert!(!settings.auto_checkin);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_volume_parse_malformed_falls_back() {
        assert_eq!(Volume::parse(Some("loud")), Volume::DEFAULT);
        assert_eq!(Volume::parse(Some("NaN")), Volume::DEFAULT);
        assert_eq!(Volume::parse(Some("inf")), Volume::DEFAULT);
        assert_eq!(Volume::parse(Some("")), Volume::DEFAULT);
    }

    #[test]
    fn test_volume_parse_clamps() {
        assert_eq!(Volume::parse(Some("1.5")).get(), 1.0);
        assert_eq!(Volume::parse(Some("-0.2")).get(), 0.0);
        assert_eq!(Volume::parse(Some(" 0.7 ")).get(), 0.7);
    }

    #[test]
    fn test_volume_display_is_storable() {
        assert_eq!(Volume::new(0.7).to_string(), "0.7");
        assert_eq!(Volume::parse(Some(&Volume::new(0.25).to_string())).get(), 0.25);
    }

    #[test]
    fn test_flag_only_exact_true() {
        assert!(parse_flag(Some("true")));
        assert!(!parse_flag(Some("TRUE")));
        assert!(!parse_flag(Some("1")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_unknown_theme_survives() {
        let theme = Theme::parse(Some("sepia"));
        assert_eq!(theme, Theme::Other("sepia".to_string()));
        assert_eq!(theme.as_str(), "sepia");
        assert_eq!(Theme::parse(Some("")), Theme::Color);
    }

    #[test]
    fn test_to_pairs_round_trip() {
        let settings = Settings {
            theme: Theme::Dark,
            volume_left: Volume::new(0.7),
            volume_right: Volume::new(0.1),
            notify: Notify::Off,
            auto_checkin: true,
        };
        let stored: HashMap<String, String> = settings
            .to_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(stored["theme"], "dark");
        assert_eq!(stored["autoCheckin"], "true");

        let reloaded = Settings::from_lookup(|key| stored.get(key.as_str()).cloned());
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_channel_keys() {
        assert_eq!(Channel::Left.key(), PreferenceKey::VolumeLeft);
        assert_eq!(Channel::Right.key().as_str(), "volRight");
        assert_eq!(Channel::Right.index(), 1);
    }
}
