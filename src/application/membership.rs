//! Target group registration driven by the bot's own membership.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::notify::owner_recipients;
use crate::domain::group::TargetGroup;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::membership::{BotMembership, MembershipChange};
use crate::port::outbound::notifier::{Event, Notifier};
use crate::port::outbound::store::Store;

/// Result of handling a membership change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipOutcome {
    Registered(TargetGroup),
    AlreadyRegistered,
    Unregistered,
    NotRegistered,
    /// The group limit is reached; the group was not registered.
    LimitReached,
    /// Private chats and channels are never monitored.
    Ignored,
    StoreFailed,
}

/// Keeps the target group set in step with the groups the bot is in.
pub struct MembershipTracker<S> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    config: Arc<Config>,
}

impl<S: Store> MembershipTracker<S> {
    #[must_use]
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>, config: Arc<Config>) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Apply one membership change.
    pub async fn handle(&self, change: &BotMembership) -> MembershipOutcome {
        if !change.chat_kind.is_group() {
            return MembershipOutcome::Ignored;
        }

        let result = match change.change {
            MembershipChange::Joined => self.joined(change).await,
            MembershipChange::Left => self.left(change).await,
        };
        result.unwrap_or_else(|e| {
            error!(chat = %change.chat_id, error = %e, "Failed to update target groups");
            MembershipOutcome::StoreFailed
        })
    }

    async fn joined(&self, change: &BotMembership) -> Result<MembershipOutcome> {
        let title = change.chat_title.as_deref();

        if self.store.get_group(change.chat_id).await?.is_some() {
            self.store.add_group(change.chat_id, title).await?;
            return Ok(MembershipOutcome::AlreadyRegistered);
        }

        let count = self.store.list_groups().await?.len();
        if count >= self.config.monitor.max_groups {
            warn!(
                chat = %change.chat_id,
                limit = self.config.monitor.max_groups,
                "Group limit reached, not monitoring new group"
            );
            return Ok(MembershipOutcome::LimitReached);
        }

        self.store.add_group(change.chat_id, title).await?;
        let Some(group) = self.store.get_group(change.chat_id).await? else {
            return Ok(MembershipOutcome::NotRegistered);
        };
        info!(chat = %group.id, title = ?group.title, "Bot joined group");

        if self.config.notify.enabled {
            self.notifier.notify(Event::GroupJoined {
                group: group.clone(),
                added_by: change.actor,
                recipients: owner_recipients(&self.config),
            });
        }
        Ok(MembershipOutcome::Registered(group))
    }

    async fn left(&self, change: &BotMembership) -> Result<MembershipOutcome> {
        let removed = self.store.remove_group(change.chat_id).await?;
        if !removed.is_removed() {
            return Ok(MembershipOutcome::NotRegistered);
        }
        info!(chat = %change.chat_id, "Bot left group");

        if self.config.notify.enabled {
            self.notifier.notify(Event::GroupLeft {
                chat: change.chat_id,
                title: change.chat_title.clone(),
                recipients: owner_recipients(&self.config),
            });
        }
        Ok(MembershipOutcome::Unregistered)
    }
}
