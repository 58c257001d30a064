//! In-memory store implementing every storage port.
//!
//! Behaves like the SQLite store (insertion order, idempotent adds,
//! default preferences) and can be switched into a failing mode to exercise
//! storage error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{
    admin::AdminRole, admin::AdminUser, blocklist::BlockedUser, event::MatchEvent,
    group::TargetGroup, id::ChatId, id::UserId, keyword::Keyword, keyword::KeywordRecord,
    settings::MonitorSettings,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    AddOutcome, AdminStore, BlacklistStore, BlocklistStore, GroupStore, KeywordStore, MatchLog,
    RemoveOutcome, SettingsStore,
};

#[derive(Default)]
struct State {
    keywords: Vec<KeywordRecord>,
    groups: Vec<TargetGroup>,
    admins: Vec<AdminUser>,
    preferences: HashMap<UserId, bool>,
    matches: Vec<MatchEvent>,
    last_match_id: i64,
    blocked: Vec<BlockedUser>,
    blacklist: Vec<Keyword>,
    settings: Option<MonitorSettings>,
    pushes: HashMap<(UserId, ChatId), DateTime<Utc>>,
}

/// Thread-safe in-memory store for tests.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    failing: AtomicBool,
    failing_match_writes: AtomicBool,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make only [`MatchLog::record_match`] fail; reads keep working.
    pub fn set_failing_match_writes(&self, failing: bool) {
        self.failing_match_writes.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of recorded match events, oldest first.
    #[must_use]
    pub fn matches(&self) -> Vec<MatchEvent> {
        self.state.read().matches.clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Database("injected failure".to_string()));
        }
        Ok(())
    }
}

fn outcome_added(added: bool) -> AddOutcome {
    if added {
        AddOutcome::Added
    } else {
        AddOutcome::AlreadyExists
    }
}

fn outcome_removed(removed: bool) -> RemoveOutcome {
    if removed {
        RemoveOutcome::Removed
    } else {
        RemoveOutcome::NotFound
    }
}

impl KeywordStore for InMemoryStore {
    async fn add_keyword(&self, keyword: &Keyword, added_by: UserId) -> Result<AddOutcome> {
        self.check()?;
        let mut state = self.state.write();
        if state.keywords.iter().any(|r| &r.keyword == keyword) {
            return Ok(AddOutcome::AlreadyExists);
        }
        state.keywords.push(KeywordRecord {
            keyword: keyword.clone(),
            hit_count: 0,
            added_by: Some(added_by),
            created_at: Utc::now(),
        });
        Ok(AddOutcome::Added)
    }

    async fn remove_keyword(&self, keyword: &Keyword) -> Result<RemoveOutcome> {
        self.check()?;
        let mut state = self.state.write();
        let before = state.keywords.len();
        state.keywords.retain(|r| &r.keyword != keyword);
        Ok(outcome_removed(state.keywords.len() < before))
    }

    async fn list_keywords(&self) -> Result<Vec<KeywordRecord>> {
        self.check()?;
        Ok(self.state.read().keywords.clone())
    }
}

impl GroupStore for InMemoryStore {
    async fn add_group(&self, chat: ChatId, title: Option<&str>) -> Result<AddOutcome> {
        self.check()?;
        let mut state = self.state.write();
        if let Some(group) = state.groups.iter_mut().find(|g| g.id == chat) {
            if let Some(title) = title {
                group.title = Some(title.to_string());
            }
            return Ok(AddOutcome::AlreadyExists);
        }
        state.groups.push(TargetGroup {
            id: chat,
            title: title.map(str::to_string),
            message_count: 0,
            hit_count: 0,
            joined_at: Utc::now(),
        });
        Ok(AddOutcome::Added)
    }

    async fn remove_group(&self, chat: ChatId) -> Result<RemoveOutcome> {
        self.check()?;
        let mut state = self.state.write();
        let before = state.groups.len();
        state.groups.retain(|g| g.id != chat);
        Ok(outcome_removed(state.groups.len() < before))
    }

    async fn list_groups(&self) -> Result<Vec<TargetGroup>> {
        self.check()?;
        Ok(self.state.read().groups.clone())
    }

    async fn get_group(&self, chat: ChatId) -> Result<Option<TargetGroup>> {
        self.check()?;
        Ok(self.state.read().groups.iter().find(|g| g.id == chat).cloned())
    }

    async fn record_group_message(&self, chat: ChatId) -> Result<()> {
        self.check()?;
        let mut state = self.state.write();
        if let Some(group) = state.groups.iter_mut().find(|g| g.id == chat) {
            group.message_count += 1;
        }
        Ok(())
    }
}

impl AdminStore for InMemoryStore {
    async fn add_admin(
        &self,
        user: UserId,
        username: Option<&str>,
        added_by: UserId,
    ) -> Result<AddOutcome> {
        self.check()?;
        let mut state = self.state.write();
        if state.admins.iter().any(|a| a.id == user) {
            return Ok(AddOutcome::AlreadyExists);
        }
        state.admins.push(AdminUser {
            id: user,
            username: username.map(str::to_string),
            role: AdminRole::Admin,
            added_by: Some(added_by),
            added_at: Some(Utc::now()),
        });
        Ok(AddOutcome::Added)
    }

    async fn remove_admin(&self, user: UserId) -> Result<RemoveOutcome> {
        self.check()?;
        let mut state = self.state.write();
        let before = state.admins.len();
        state.admins.retain(|a| a.id != user);
        Ok(outcome_removed(state.admins.len() < before))
    }

    async fn list_admins(&self) -> Result<Vec<AdminUser>> {
        self.check()?;
        Ok(self.state.read().admins.clone())
    }

    async fn is_admin(&self, user: UserId) -> Result<bool> {
        self.check()?;
        Ok(self.state.read().admins.iter().any(|a| a.id == user))
    }

    async fn set_notify(&self, user: UserId, enabled: bool) -> Result<()> {
        self.check()?;
        self.state.write().preferences.insert(user, enabled);
        Ok(())
    }

    async fn notify_enabled(&self, user: UserId) -> Result<bool> {
        self.check()?;
        Ok(self
            .state
            .read()
            .preferences
            .get(&user)
            .copied()
            .unwrap_or(true))
    }
}

impl MatchLog for InMemoryStore {
    async fn record_match(&self, event: &MatchEvent) -> Result<i64> {
        self.check()?;
        if self.failing_match_writes.load(Ordering::SeqCst) {
            return Err(Error::Database("injected match write failure".to_string()));
        }
        let mut state = self.state.write();
        state.last_match_id += 1;
        let id = state.last_match_id;
        let mut stored = event.clone();
        stored.id = Some(id);
        state.matches.push(stored);

        if let Some(record) = state
            .keywords
            .iter_mut()
            .find(|r| r.keyword.as_str() == event.keyword)
        {
            record.hit_count += 1;
        }
        if let Some(group) = state.groups.iter_mut().find(|g| g.id == event.group) {
            group.hit_count += 1;
        }
        state
            .pushes
            .insert((event.sender, event.group), event.matched_at);
        Ok(id)
    }

    async fn delete_match(&self, id: i64) -> Result<RemoveOutcome> {
        self.check()?;
        let mut state = self.state.write();
        let before = state.matches.len();
        state.matches.retain(|m| m.id != Some(id));
        Ok(outcome_removed(state.matches.len() < before))
    }

    async fn recent_matches(&self, limit: usize) -> Result<Vec<MatchEvent>> {
        self.check()?;
        Ok(self
            .state
            .read()
            .matches
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn matches_by_sender(&self, sender: UserId, limit: usize) -> Result<Vec<MatchEvent>> {
        self.check()?;
        Ok(self
            .state
            .read()
            .matches
            .iter()
            .rev()
            .filter(|m| m.sender == sender)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_matches(&self) -> Result<u64> {
        self.check()?;
        Ok(self.state.read().matches.len() as u64)
    }
}

impl BlocklistStore for InMemoryStore {
    async fn block_user(
        &self,
        user: UserId,
        reason: Option<&str>,
        blocked_by: UserId,
    ) -> Result<AddOutcome> {
        self.check()?;
        let mut state = self.state.write();
        let exists = state.blocked.iter().any(|b| b.id == user);
        if !exists {
            state.blocked.push(BlockedUser {
                id: user,
                reason: reason.map(str::to_string),
                blocked_by: Some(blocked_by),
                blocked_at: Utc::now(),
            });
        }
        Ok(outcome_added(!exists))
    }

    async fn unblock_user(&self, user: UserId) -> Result<RemoveOutcome> {
        self.check()?;
        let mut state = self.state.write();
        let before = state.blocked.len();
        state.blocked.retain(|b| b.id != user);
        Ok(outcome_removed(state.blocked.len() < before))
    }

    async fn list_blocked(&self) -> Result<Vec<BlockedUser>> {
        self.check()?;
        Ok(self.state.read().blocked.clone())
    }

    async fn is_blocked(&self, user: UserId) -> Result<bool> {
        self.check()?;
        Ok(self.state.read().blocked.iter().any(|b| b.id == user))
    }
}

impl BlacklistStore for InMemoryStore {
    async fn add_blacklist_term(&self, term: &Keyword, _added_by: UserId) -> Result<AddOutcome> {
        self.check()?;
        let mut state = self.state.write();
        let exists = state.blacklist.contains(term);
        if !exists {
            state.blacklist.push(term.clone());
        }
        Ok(outcome_added(!exists))
    }

    async fn remove_blacklist_term(&self, term: &Keyword) -> Result<RemoveOutcome> {
        self.check()?;
        let mut state = self.state.write();
        let before = state.blacklist.len();
        state.blacklist.retain(|t| t != term);
        Ok(outcome_removed(state.blacklist.len() < before))
    }

    async fn list_blacklist(&self) -> Result<Vec<Keyword>> {
        self.check()?;
        Ok(self.state.read().blacklist.clone())
    }
}

impl SettingsStore for InMemoryStore {
    async fn load_settings(&self) -> Result<MonitorSettings> {
        self.check()?;
        Ok(self.state.read().settings.unwrap_or_default())
    }

    async fn save_settings(&self, settings: &MonitorSettings) -> Result<()> {
        self.check()?;
        self.state.write().settings = Some(*settings);
        Ok(())
    }

    async fn last_push(&self, sender: UserId, chat: ChatId) -> Result<Option<DateTime<Utc>>> {
        self.check()?;
        Ok(self.state.read().pushes.get(&(sender, chat)).copied())
    }

    async fn prune_push_records(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        self.check()?;
        let mut state = self.state.write();
        let before = state.pushes.len();
        state.pushes.retain(|_, at| *at >= cutoff);
        Ok((before - state.pushes.len()) as u64)
    }
}
