//! Match events recorded by the message monitor.

use chrono::{DateTime, Utc};

use super::id::{ChatId, UserId};

/// One keyword match found in one monitored message.
///
/// Immutable once recorded. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub id: Option<i64>,
    /// The keyword text as stored when the match happened.
    pub keyword: String,
    pub group: ChatId,
    pub group_title: Option<String>,
    pub sender: UserId,
    pub sender_username: Option<String>,
    /// Telegram message ID inside `group`.
    pub message_id: i32,
    /// Message text, truncated to the configured preview length.
    pub content: String,
    pub matched_at: DateTime<Utc>,
}

impl MatchEvent {
    /// `@username` when known, otherwise the numeric sender ID.
    #[must_use]
    pub fn sender_label(&self) -> String {
        match self.sender_username.as_deref() {
            Some(name) => format!("@{name}"),
            None => self.sender.to_string(),
        }
    }

    /// Group title when known, otherwise the numeric chat ID.
    #[must_use]
    pub fn group_label(&self) -> String {
        self.group_title
            .clone()
            .unwrap_or_else(|| self.group.to_string())
    }
}

/// Truncate `text` to at most `max` characters, appending an ellipsis when cut.
#[must_use]
pub fn truncate_content(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
