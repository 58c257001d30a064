//! Senders excluded from matching.

use chrono::{DateTime, Utc};

use super::id::UserId;

/// A user whose messages are never matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedUser {
    pub id: UserId,
    pub reason: Option<String>,
    pub blocked_by: Option<UserId>,
    pub blocked_at: DateTime<Utc>,
}
