/// Persisted preference keys
///
/// Values live in browser local storage under these exact names, so
/// other pages (and older versions of this one) can read them too.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Theme,       // theme
    VolumeLeft,  // volLeft
    VolumeRight, // volRight
    Notify,      // notify
    AutoCheckin, // autoCheckin

    Unknown(String),
}

impl PreferenceKey {
    /// Every key the settings panel reads and writes
    pub const ALL: [Self; 5] = [
        Self::Theme,
        Self::VolumeLeft,
        Self::VolumeRight,
        Self::Notify,
        Self::AutoCheckin,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Theme => "theme",
            Self::VolumeLeft => "volLeft",
            Self::VolumeRight => "volRight",
            Self::Notify => "notify",
            Self::AutoCheckin => "autoCheckin",
            Self::Unknown(s) => s,
        }
    }
}

impl From<&str> for PreferenceKey {
    fn from(s: &str) -> Self {
        match s {
            "theme" => Self::Theme,
            "volLeft" => Self::VolumeLeft,
            "volRight" => Self::VolumeRight,
            "notify" => Self::Notify,
            "autoCheckin" => Self::AutoCheckin,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
