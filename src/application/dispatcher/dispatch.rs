use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::domain::admin::{AdminRole, Permission};
use crate::domain::id::UserId;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::action::AlertAction;
use crate::port::inbound::message::{ChatKind, Sender};
use crate::port::outbound::store::Store;

use super::command::{
    command_help, parse_command, required_permission, split_command, Command, CommandParseError,
};
use super::{ActionReply, CommandDispatcher, PERMISSION_DENIED, STORAGE_FAILURE};

impl<S: Store> CommandDispatcher<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: Arc<Config>) -> Self {
        Self {
            store,
            config,
            started_at: Utc::now(),
        }
    }

    /// Allowlist tier of `user`, or `None` for everyone else.
    ///
    /// # Errors
    /// Returns an error if the admin store cannot be read.
    pub async fn role_of(&self, user: UserId) -> Result<Option<AdminRole>> {
        if self.config.is_owner(user) {
            return Ok(Some(AdminRole::Owner));
        }
        Ok(self
            .store
            .is_admin(user)
            .await?
            .then_some(AdminRole::Admin))
    }

    /// Reply to a private message sent to the bot, or `None` to stay silent.
    ///
    /// Non-commands and unknown commands from non-admins get no reply. A
    /// recognised command the sender may not run is refused without touching
    /// the store. Admins get a usage error with the help text for unknown
    /// commands or bad arguments.
    pub async fn respond(&self, sender: &Sender, text: &str) -> Option<String> {
        self.respond_in(ChatKind::Private, sender, text).await
    }

    /// Like [`respond`](Self::respond), for a message posted in a chat of
    /// `kind`.
    ///
    /// Group members routinely send `/start` or `/help` meant for other bots,
    /// so refusals are only spoken in private chats. Groups get silence.
    pub async fn respond_in(&self, kind: ChatKind, sender: &Sender, text: &str) -> Option<String> {
        if sender.is_bot {
            return None;
        }
        let (name, _) = split_command(text).ok()?;
        let permission = required_permission(&name);

        let role = match self.role_of(sender.id).await {
            Ok(role) => role,
            Err(e) => {
                error!(user = %sender.id, error = %e, "Failed to resolve sender role");
                return permission.map(|_| STORAGE_FAILURE.to_string());
            }
        };

        let Some(permission) = permission else {
            let err = CommandParseError::UnknownCommand(format!("/{name}"));
            return role.map(|role| usage_error(&err, role));
        };
        if !permission.allows(role) {
            info!(user = %sender.id, command = %name, "Permission denied");
            return (kind == ChatKind::Private).then(|| PERMISSION_DENIED.to_string());
        }

        let command = match parse_command(text) {
            Ok(command) => command,
            Err(err) => {
                debug!(user = %sender.id, error = %err, "Rejected command arguments");
                return Some(match role {
                    Some(role) => usage_error(&err, role),
                    None => format!("❌ Invalid command: {err}"),
                });
            }
        };

        Some(self.execute(sender, role, command).await)
    }

    /// Carry out a button pressed under a match alert.
    ///
    /// Buttons run the matching admin command, so the same authorization
    /// applies: only admins and owners may press them.
    pub async fn act(&self, sender: &Sender, action: AlertAction) -> ActionReply {
        let role = match self.role_of(sender.id).await {
            Ok(role) => role,
            Err(e) => {
                error!(user = %sender.id, error = %e, "Failed to resolve sender role");
                return ActionReply::notice(STORAGE_FAILURE);
            }
        };
        if sender.is_bot || !Permission::Admin.allows(role) {
            info!(user = %sender.id, action = %action, "Alert action denied");
            return ActionReply::notice(PERMISSION_DENIED);
        }

        let command = match action {
            AlertAction::History(user) => Command::History(user),
            AlertAction::DeleteMatch(id) => Command::DeleteMatch(id),
            AlertAction::Block(user) => Command::Block { user, reason: None },
        };
        let text = self.execute(sender, role, command).await;

        match action {
            AlertAction::History(_) => ActionReply {
                notice: None,
                message: Some(text),
                remove_alert: false,
            },
            AlertAction::DeleteMatch(_) => ActionReply {
                remove_alert: text != STORAGE_FAILURE,
                ..ActionReply::notice(&text)
            },
            AlertAction::Block(_) => ActionReply::notice(&text),
        }
    }

    /// Execute one authorized command and return response text.
    async fn execute(&self, sender: &Sender, role: Option<AdminRole>, command: Command) -> String {
        debug!(user = %sender.id, command = ?command, "Executing command");
        let by = sender.id;

        let result = match command {
            Command::Start | Command::Help => {
                Ok(command_help(role.unwrap_or(AdminRole::Admin)))
            }
            Command::Status => self.status_text().await,
            Command::MyInfo => Ok(self.my_info_text(sender, role)),
            Command::AddKeyword(keyword) => self.add_keyword(by, &keyword).await,
            Command::RemoveKeyword(keyword) => self.remove_keyword(&keyword).await,
            Command::ListKeywords => self.keywords_text().await,
            Command::AddGroup { chat, title } => self.add_group(chat, title.as_deref()).await,
            Command::RemoveGroup(chat) => self.remove_group(chat).await,
            Command::ListGroups => self.groups_text().await,
            Command::AddAdmin { user, username } => {
                self.add_admin(by, user, username.as_deref()).await
            }
            Command::RemoveAdmin(user) => self.remove_admin(by, user).await,
            Command::ListAdmins => self.admins_text().await,
            Command::AddBlacklist(term) => self.add_blacklist(by, &term).await,
            Command::RemoveBlacklist(term) => self.remove_blacklist(&term).await,
            Command::ListBlacklist => self.blacklist_text().await,
            Command::Block { user, reason } => self.block(by, user, reason.as_deref()).await,
            Command::Unblock(user) => self.unblock(user).await,
            Command::ListBlocked => self.blocked_text().await,
            Command::Recent(limit) => self.recent_text(limit).await,
            Command::History(user) => self.history_text(user).await,
            Command::DeleteMatch(id) => self.delete_match(by, id).await,
            Command::Settings => self.settings_text().await,
            Command::Set(update) => self.set_setting(by, update).await,
            Command::Notify(enabled) => self.set_notify(by, enabled).await,
        };

        result.unwrap_or_else(|e| match e {
            Error::Domain(err) => format!("❌ {err}"),
            other => {
                error!(user = %sender.id, error = %other, "Command failed");
                STORAGE_FAILURE.to_string()
            }
        })
    }
}

fn usage_error(err: &CommandParseError, role: AdminRole) -> String {
    format!("❌ Invalid command: {err}\n\n{}", command_help(role))
}
