//! Runtime monitor settings changed through `/set`.

use std::str::FromStr;

use super::error::DomainError;
use super::keyword::MatchMode;

/// Accepted no-repeat windows, in minutes. Zero disables suppression.
pub const NO_REPEAT_CHOICES: [u32; 8] = [0, 10, 30, 60, 720, 1440, 21600, 43200];

/// Persisted switches that steer the message monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Master switch for matching and forwarding.
    pub push_enabled: bool,
    pub keyword_mode: MatchMode,
    pub blacklist_mode: MatchMode,
    /// Minutes during which a sender's further matches in the same group
    /// are suppressed.
    pub no_repeat_minutes: u32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            push_enabled: true,
            keyword_mode: MatchMode::Contains,
            blacklist_mode: MatchMode::Exact,
            no_repeat_minutes: 0,
        }
    }
}

impl MonitorSettings {
    /// Return a copy with `update` applied.
    #[must_use]
    pub fn with(mut self, update: SettingUpdate) -> Self {
        match update {
            SettingUpdate::PushEnabled(value) => self.push_enabled = value,
            SettingUpdate::KeywordMode(mode) => self.keyword_mode = mode,
            SettingUpdate::BlacklistMode(mode) => self.blacklist_mode = mode,
            SettingUpdate::NoRepeatMinutes(minutes) => self.no_repeat_minutes = minutes,
        }
        self
    }

    /// Key/value pairs for storage.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (SettingKey::PushEnabled.as_str(), self.push_enabled.to_string()),
            (SettingKey::KeywordMode.as_str(), self.keyword_mode.to_string()),
            (SettingKey::BlacklistMode.as_str(), self.blacklist_mode.to_string()),
            (
                SettingKey::NoRepeatMinutes.as_str(),
                self.no_repeat_minutes.to_string(),
            ),
        ]
    }

    /// Rebuild settings from stored pairs.
    ///
    /// Unknown keys and unparsable values are skipped so a damaged row falls
    /// back to its default instead of disabling the monitor.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.parse::<SettingKey>().ok()?;
                SettingUpdate::parse(key, value).ok()
            })
            .fold(Self::default(), Self::with)
    }
}

/// Names of the settings exposed through `/set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    PushEnabled,
    KeywordMode,
    BlacklistMode,
    NoRepeatMinutes,
}

impl SettingKey {
    /// Canonical storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PushEnabled => "push_enabled",
            Self::KeywordMode => "keyword_mode",
            Self::BlacklistMode => "blacklist_mode",
            Self::NoRepeatMinutes => "no_repeat_minutes",
        }
    }
}

impl FromStr for SettingKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push" | "push_enabled" => Ok(Self::PushEnabled),
            "keyword_mode" | "match_mode" | "keyword_match_mode" => Ok(Self::KeywordMode),
            "blacklist_mode" | "blacklist_match_mode" => Ok(Self::BlacklistMode),
            "no_repeat" | "no_repeat_minutes" | "no_repeat_duration" => Ok(Self::NoRepeatMinutes),
            other => Err(DomainError::UnknownSetting(other.to_string())),
        }
    }
}

/// A typed change to one setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingUpdate {
    PushEnabled(bool),
    KeywordMode(MatchMode),
    BlacklistMode(MatchMode),
    NoRepeatMinutes(u32),
}

impl SettingUpdate {
    /// Parse a raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSetting`] when the value does not fit
    /// the key.
    pub fn parse(key: SettingKey, raw: &str) -> Result<Self, DomainError> {
        let value = raw.trim();
        let invalid = |reason: &str| DomainError::InvalidSetting {
            key: key.as_str(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            SettingKey::PushEnabled => parse_switch(value)
                .map(Self::PushEnabled)
                .ok_or_else(|| invalid("use on or off")),
            SettingKey::KeywordMode => value
                .parse()
                .map(Self::KeywordMode)
                .map_err(|_| invalid("use contains or exact")),
            SettingKey::BlacklistMode => value
                .parse()
                .map(Self::BlacklistMode)
                .map_err(|_| invalid("use contains or exact")),
            SettingKey::NoRepeatMinutes => {
                let allowed = || {
                    let choices: Vec<String> =
                        NO_REPEAT_CHOICES.iter().map(u32::to_string).collect();
                    format!("use one of {}", choices.join(", "))
                };
                let minutes: u32 = value.parse().map_err(|_| invalid(&allowed()))?;
                if NO_REPEAT_CHOICES.contains(&minutes) {
                    Ok(Self::NoRepeatMinutes(minutes))
                } else {
                    Err(invalid(&allowed()))
                }
            }
        }
    }

    #[must_use]
    pub const fn key(self) -> SettingKey {
        match self {
            Self::PushEnabled(_) => SettingKey::PushEnabled,
            Self::KeywordMode(_) => SettingKey::KeywordMode,
            Self::BlacklistMode(_) => SettingKey::BlacklistMode,
            Self::NoRepeatMinutes(_) => SettingKey::NoRepeatMinutes,
        }
    }
}

/// Parse an on/off style switch.
#[must_use]
pub fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" | "enable" | "enabled" => Some(true),
        "off" | "false" | "no" | "0" | "disable" | "disabled" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fresh_install() {
        let settings = MonitorSettings::default();
        assert!(settings.push_enabled);
        assert_eq!(settings.keyword_mode, MatchMode::Contains);
        assert_eq!(settings.blacklist_mode, MatchMode::Exact);
        assert_eq!(settings.no_repeat_minutes, 0);
    }

    #[test]
    fn setting_key_accepts_aliases() {
        assert_eq!("push".parse::<SettingKey>().unwrap(), SettingKey::PushEnabled);
        assert_eq!(
            "match_mode".parse::<SettingKey>().unwrap(),
            SettingKey::KeywordMode
        );
        assert_eq!(
            "no_repeat".parse::<SettingKey>().unwrap(),
            SettingKey::NoRepeatMinutes
        );
        assert!(matches!(
            "volume".parse::<SettingKey>(),
            Err(DomainError::UnknownSetting(_))
        ));
    }

    #[test]
    fn update_parses_typed_values() {
        assert_eq!(
            SettingUpdate::parse(SettingKey::PushEnabled, "off").unwrap(),
            SettingUpdate::PushEnabled(false)
        );
        assert_eq!(
            SettingUpdate::parse(SettingKey::KeywordMode, "exact").unwrap(),
            SettingUpdate::KeywordMode(MatchMode::Exact)
        );
        assert_eq!(
            SettingUpdate::parse(SettingKey::NoRepeatMinutes, "60").unwrap(),
            SettingUpdate::NoRepeatMinutes(60)
        );
    }

    #[test]
    fn no_repeat_rejects_unlisted_windows() {
        let err = SettingUpdate::parse(SettingKey::NoRepeatMinutes, "45").unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidSetting {
                key: "no_repeat_minutes",
                ..
            }
        ));
    }

    #[test]
    fn pairs_survive_storage() {
        let settings = MonitorSettings::default()
            .with(SettingUpdate::PushEnabled(false))
            .with(SettingUpdate::NoRepeatMinutes(30));
        let stored = settings.to_pairs();
        let restored =
            MonitorSettings::from_pairs(stored.iter().map(|(k, v)| (*k, v.as_str())));
        assert_eq!(restored, settings);
    }

    #[test]
    fn damaged_pairs_fall_back_to_defaults() {
        let restored = MonitorSettings::from_pairs([
            ("push_enabled", "maybe"),
            ("mystery", "1"),
            ("keyword_mode", "exact"),
        ]);
        assert!(restored.push_enabled);
        assert_eq!(restored.keyword_mode, MatchMode::Exact);
    }
}
