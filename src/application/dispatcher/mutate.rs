use tracing::info;

use crate::domain::id::{ChatId, UserId};
use crate::domain::keyword::Keyword;
use crate::domain::settings::SettingUpdate;
use crate::error::Result;
use crate::port::outbound::store::{AddOutcome, RemoveOutcome, Store};

use super::CommandDispatcher;

impl<S: Store> CommandDispatcher<S> {
    pub(super) async fn add_keyword(&self, by: UserId, keyword: &Keyword) -> Result<String> {
        let existing = self.store.list_keywords().await?;
        if existing.iter().any(|record| record.keyword == *keyword) {
            return Ok(format!("ℹ️ Keyword already exists: {keyword}"));
        }
        let limit = self.config.monitor.max_keywords;
        if existing.len() >= limit {
            return Ok(format!(
                "❌ Keyword limit reached ({limit}). Remove one with /delkw first."
            ));
        }

        match self.store.add_keyword(keyword, by).await? {
            AddOutcome::Added => {
                info!(keyword = %keyword, by = %by, "Keyword added");
                Ok(format!(
                    "✅ Keyword added: {keyword}\nTotal: {}/{limit}",
                    existing.len() + 1
                ))
            }
            AddOutcome::AlreadyExists => Ok(format!("ℹ️ Keyword already exists: {keyword}")),
        }
    }

    pub(super) async fn remove_keyword(&self, keyword: &Keyword) -> Result<String> {
        match self.store.remove_keyword(keyword).await? {
            RemoveOutcome::Removed => {
                info!(keyword = %keyword, "Keyword removed");
                Ok(format!("🗑️ Keyword removed: {keyword}"))
            }
            RemoveOutcome::NotFound => Ok(format!("ℹ️ Keyword not found: {keyword}")),
        }
    }

    pub(super) async fn add_group(&self, chat: ChatId, title: Option<&str>) -> Result<String> {
        if self.store.get_group(chat).await?.is_some() {
            self.store.add_group(chat, title).await?;
            return Ok(format!("ℹ️ Group {chat} is already monitored"));
        }
        let count = self.store.list_groups().await?.len();
        let limit = self.config.monitor.max_groups;
        if count >= limit {
            return Ok(format!(
                "❌ Group limit reached ({limit}). Remove one with /delgroup first."
            ));
        }

        self.store.add_group(chat, title).await?;
        info!(chat = %chat, title = ?title, "Group added");
        let name = title.map_or_else(|| chat.to_string(), |title| format!("{title} ({chat})"));
        Ok(format!("✅ Now monitoring {name}\nTotal: {}/{limit}", count + 1))
    }

    pub(super) async fn remove_group(&self, chat: ChatId) -> Result<String> {
        match self.store.remove_group(chat).await? {
            RemoveOutcome::Removed => {
                info!(chat = %chat, "Group removed");
                Ok(format!("🗑️ Stopped monitoring {chat}"))
            }
            RemoveOutcome::NotFound => Ok(format!("ℹ️ Group {chat} is not monitored")),
        }
    }

    pub(super) async fn add_admin(
        &self,
        by: UserId,
        user: UserId,
        username: Option<&str>,
    ) -> Result<String> {
        if self.config.is_owner(user) {
            return Ok(format!("ℹ️ {user} is an owner"));
        }
        match self.store.add_admin(user, username, by).await? {
            AddOutcome::Added => {
                info!(user = %user, by = %by, "Admin added");
                Ok(format!("✅ Admin added: {user}"))
            }
            AddOutcome::AlreadyExists => Ok(format!("ℹ️ {user} is already an admin")),
        }
    }

    pub(super) async fn remove_admin(&self, by: UserId, user: UserId) -> Result<String> {
        if self.config.is_owner(user) {
            return Ok("❌ Owners are set in the config file and cannot be removed.".to_string());
        }
        match self.store.remove_admin(user).await? {
            RemoveOutcome::Removed => {
                info!(user = %user, by = %by, "Admin removed");
                Ok(format!("🗑️ Admin removed: {user}"))
            }
            RemoveOutcome::NotFound => Ok(format!("ℹ️ {user} is not an admin")),
        }
    }

    pub(super) async fn add_blacklist(&self, by: UserId, term: &Keyword) -> Result<String> {
        match self.store.add_blacklist_term(term, by).await? {
            AddOutcome::Added => {
                info!(term = %term, by = %by, "Blacklist term added");
                Ok(format!("✅ Blacklist term added: {term}"))
            }
            AddOutcome::AlreadyExists => Ok(format!("ℹ️ Already blacklisted: {term}")),
        }
    }

    pub(super) async fn remove_blacklist(&self, term: &Keyword) -> Result<String> {
        match self.store.remove_blacklist_term(term).await? {
            RemoveOutcome::Removed => {
                info!(term = %term, "Blacklist term removed");
                Ok(format!("🗑️ Blacklist term removed: {term}"))
            }
            RemoveOutcome::NotFound => Ok(format!("ℹ️ Not blacklisted: {term}")),
        }
    }

    pub(super) async fn block(
        &self,
        by: UserId,
        user: UserId,
        reason: Option<&str>,
    ) -> Result<String> {
        if self.config.is_owner(user) {
            return Ok("❌ Owners cannot be blocked.".to_string());
        }
        match self.store.block_user(user, reason, by).await? {
            AddOutcome::Added => {
                info!(user = %user, by = %by, "User blocked");
                Ok(format!("🚫 Blocked {user}"))
            }
            AddOutcome::AlreadyExists => Ok(format!("ℹ️ {user} is already blocked")),
        }
    }

    pub(super) async fn unblock(&self, user: UserId) -> Result<String> {
        match self.store.unblock_user(user).await? {
            RemoveOutcome::Removed => {
                info!(user = %user, "User unblocked");
                Ok(format!("✅ Unblocked {user}"))
            }
            RemoveOutcome::NotFound => Ok(format!("ℹ️ {user} is not blocked")),
        }
    }

    pub(super) async fn delete_match(&self, by: UserId, id: i64) -> Result<String> {
        match self.store.delete_match(id).await? {
            RemoveOutcome::Removed => {
                info!(id, by = %by, "Match deleted");
                Ok(format!("🗑️ Match #{id} deleted"))
            }
            RemoveOutcome::NotFound => Ok(format!("ℹ️ Match #{id} not found")),
        }
    }

    pub(super) async fn set_setting(&self, by: UserId, update: SettingUpdate) -> Result<String> {
        let settings = self.store.load_settings().await?.with(update);
        self.store.save_settings(&settings).await?;
        info!(key = update.key().as_str(), by = %by, "Setting updated");
        Ok(format!(
            "✅ Updated {}\n\n{}",
            update.key().as_str(),
            super::render::settings_body(&settings)
        ))
    }

    pub(super) async fn set_notify(&self, user: UserId, enabled: bool) -> Result<String> {
        self.store.set_notify(user, enabled).await?;
        info!(user = %user, enabled, "Notification preference updated");
        Ok(if enabled {
            "🔔 Match alerts on".to_string()
        } else {
            "🔕 Match alerts off".to_string()
        })
    }
}
