//! Message monitor and notification configuration.

use serde::Deserialize;

const fn default_max_keywords() -> usize {
    100
}

const fn default_max_groups() -> usize {
    50
}

const fn default_content_preview_len() -> usize {
    500
}

const fn default_true() -> bool {
    true
}

/// Matching limits and case policy.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Compare keywords case-sensitively (default: false).
    #[serde(default)]
    pub case_sensitive: bool,
    /// Maximum number of stored keywords (default: 100).
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
    /// Maximum number of monitored groups (default: 50).
    #[serde(default = "default_max_groups")]
    pub max_groups: usize,
    /// Characters of message text kept in match events (default: 500).
    #[serde(default = "default_content_preview_len")]
    pub content_preview_len: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            max_keywords: default_max_keywords(),
            max_groups: default_max_groups(),
            content_preview_len: default_content_preview_len(),
        }
    }
}

/// Who receives match alerts.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Forward matches and membership changes at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Only owners receive alerts; ordinary admins do not.
    #[serde(default)]
    pub owners_only: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            owners_only: false,
        }
    }
}
