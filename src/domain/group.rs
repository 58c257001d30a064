//! Monitored target groups.

use chrono::{DateTime, Utc};

use super::id::ChatId;

/// A chat the bot watches for keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroup {
    pub id: ChatId,
    pub title: Option<String>,
    /// Messages that passed the sender and content filters.
    pub message_count: u64,
    /// Messages that produced a match event.
    pub hit_count: u64,
    pub joined_at: DateTime<Utc>,
}

impl TargetGroup {
    /// Title if known, otherwise the numeric chat ID.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => self.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(title: Option<&str>) -> TargetGroup {
        TargetGroup {
            id: ChatId::new(-100_42),
            title: title.map(str::to_string),
            message_count: 0,
            hit_count: 0,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_prefers_title() {
        assert_eq!(group(Some("Deals")).display_name(), "Deals");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(group(None).display_name(), "-10042");
        assert_eq!(group(Some("  ")).display_name(), "-10042");
    }
}
