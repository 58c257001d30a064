//! Persistence ports for keywords, groups, admins, and match events.
//!
//! Each capability is its own trait so that test doubles and alternative
//! backends can be assembled piecemeal. [`Store`] bundles them for the
//! application layer.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{
    admin::AdminUser, blocklist::BlockedUser, event::MatchEvent, group::TargetGroup,
    id::ChatId, id::UserId, keyword::Keyword, keyword::KeywordRecord,
    settings::MonitorSettings,
};
use crate::error::Result;

/// Result of adding an item to a set-like store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The item was already present. Nothing changed.
    AlreadyExists,
}

impl AddOutcome {
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Result of removing an item from a set-like store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The item was not present. Nothing changed.
    NotFound,
}

impl RemoveOutcome {
    #[must_use]
    pub const fn is_removed(self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// Storage operations for watched keywords.
pub trait KeywordStore: Send + Sync {
    /// Add a keyword. Adding an existing keyword is a no-op.
    fn add_keyword(
        &self,
        keyword: &Keyword,
        added_by: UserId,
    ) -> impl Future<Output = Result<AddOutcome>> + Send;

    /// Remove a keyword by exact text.
    fn remove_keyword(&self, keyword: &Keyword)
        -> impl Future<Output = Result<RemoveOutcome>> + Send;

    /// List keywords in insertion order.
    fn list_keywords(&self) -> impl Future<Output = Result<Vec<KeywordRecord>>> + Send;
}

/// Storage operations for monitored groups.
pub trait GroupStore: Send + Sync {
    /// Register a group. An existing group keeps its counters; a supplied
    /// title replaces the stored one.
    fn add_group(
        &self,
        chat: ChatId,
        title: Option<&str>,
    ) -> impl Future<Output = Result<AddOutcome>> + Send;

    fn remove_group(&self, chat: ChatId) -> impl Future<Output = Result<RemoveOutcome>> + Send;

    /// List groups in registration order.
    fn list_groups(&self) -> impl Future<Output = Result<Vec<TargetGroup>>> + Send;

    /// Look up a single group. `None` means the chat is not monitored.
    fn get_group(&self, chat: ChatId) -> impl Future<Output = Result<Option<TargetGroup>>> + Send;

    /// Count one message that reached keyword matching.
    fn record_group_message(&self, chat: ChatId) -> impl Future<Output = Result<()>> + Send;
}

/// Storage operations for ordinary admins and notification preferences.
///
/// Owners come from configuration and are never stored here.
pub trait AdminStore: Send + Sync {
    fn add_admin(
        &self,
        user: UserId,
        username: Option<&str>,
        added_by: UserId,
    ) -> impl Future<Output = Result<AddOutcome>> + Send;

    fn remove_admin(&self, user: UserId) -> impl Future<Output = Result<RemoveOutcome>> + Send;

    /// List ordinary admins in promotion order.
    fn list_admins(&self) -> impl Future<Output = Result<Vec<AdminUser>>> + Send;

    fn is_admin(&self, user: UserId) -> impl Future<Output = Result<bool>> + Send;

    /// Opt a user in or out of match notifications.
    fn set_notify(&self, user: UserId, enabled: bool) -> impl Future<Output = Result<()>> + Send;

    /// Whether a user receives match notifications. Defaults to `true`.
    fn notify_enabled(&self, user: UserId) -> impl Future<Output = Result<bool>> + Send;
}

/// Log of match events.
pub trait MatchLog: Send + Sync {
    /// Append an event and return its assigned ID.
    ///
    /// The same write increments the hit counters of the event's keyword and
    /// group and stamps the sender's push time in that group. Either all of
    /// it is stored or none of it is.
    fn record_match(&self, event: &MatchEvent) -> impl Future<Output = Result<i64>> + Send;

    /// Delete one event by ID. Counters are left as they are.
    fn delete_match(&self, id: i64) -> impl Future<Output = Result<RemoveOutcome>> + Send;

    /// Most recent events first.
    fn recent_matches(&self, limit: usize)
        -> impl Future<Output = Result<Vec<MatchEvent>>> + Send;

    /// Most recent events from one sender first.
    fn matches_by_sender(
        &self,
        sender: UserId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<MatchEvent>>> + Send;

    fn count_matches(&self) -> impl Future<Output = Result<u64>> + Send;
}

/// Storage operations for blocked senders.
pub trait BlocklistStore: Send + Sync {
    fn block_user(
        &self,
        user: UserId,
        reason: Option<&str>,
        blocked_by: UserId,
    ) -> impl Future<Output = Result<AddOutcome>> + Send;

    fn unblock_user(&self, user: UserId) -> impl Future<Output = Result<RemoveOutcome>> + Send;

    fn list_blocked(&self) -> impl Future<Output = Result<Vec<BlockedUser>>> + Send;

    fn is_blocked(&self, user: UserId) -> impl Future<Output = Result<bool>> + Send;
}

/// Storage operations for blacklist terms that veto a message.
pub trait BlacklistStore: Send + Sync {
    fn add_blacklist_term(
        &self,
        term: &Keyword,
        added_by: UserId,
    ) -> impl Future<Output = Result<AddOutcome>> + Send;

    fn remove_blacklist_term(
        &self,
        term: &Keyword,
    ) -> impl Future<Output = Result<RemoveOutcome>> + Send;

    /// List terms in insertion order.
    fn list_blacklist(&self) -> impl Future<Output = Result<Vec<Keyword>>> + Send;
}

/// Storage operations for monitor settings and push history.
pub trait SettingsStore: Send + Sync {
    /// Load settings, falling back to defaults for missing keys.
    fn load_settings(&self) -> impl Future<Output = Result<MonitorSettings>> + Send;

    fn save_settings(&self, settings: &MonitorSettings)
        -> impl Future<Output = Result<()>> + Send;

    /// When a match was last recorded for this sender in this group.
    ///
    /// Push times are written by [`MatchLog::record_match`].
    fn last_push(
        &self,
        sender: UserId,
        chat: ChatId,
    ) -> impl Future<Output = Result<Option<DateTime<Utc>>>> + Send;

    /// Drop push records older than `cutoff` and return how many went.
    fn prune_push_records(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// Every storage capability the bot needs.
pub trait Store:
    KeywordStore
    + GroupStore
    + AdminStore
    + MatchLog
    + BlocklistStore
    + BlacklistStore
    + SettingsStore
    + 'static
{
}

impl<T> Store for T where
    T: KeywordStore
        + GroupStore
        + AdminStore
        + MatchLog
        + BlocklistStore
        + BlacklistStore
        + SettingsStore
        + 'static
{
}
