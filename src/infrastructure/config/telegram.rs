//! Telegram bot configuration.

use serde::Deserialize;

use crate::domain::id::UserId;

/// Environment variable that overrides `[telegram] bot_token`.
pub const BOT_TOKEN_ENV: &str = "GROUPWATCH_BOT_TOKEN";

/// Placeholder shipped in the configuration template.
pub const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN";

const fn default_true() -> bool {
    true
}

/// Telegram bot configuration.
#[derive(Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Bot API token obtained from BotFather.
    #[serde(default)]
    pub bot_token: String,
    /// User IDs with owner rights. Owners manage ordinary admins.
    #[serde(default)]
    pub owners: Vec<UserId>,
    /// Publish the command list to Telegram's "/" menu at startup.
    #[serde(default = "default_true")]
    pub register_commands: bool,
}

impl TelegramAppConfig {
    /// Token with everything after the bot ID hidden, for display.
    #[must_use]
    pub fn redacted_token(&self) -> String {
        match self.bot_token.split_once(':') {
            Some((bot_id, secret)) if !secret.is_empty() => format!("{bot_id}:***"),
            _ if self.bot_token.is_empty() => "(not set)".to_string(),
            _ => "***".to_string(),
        }
    }
}

impl std::fmt::Debug for TelegramAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramAppConfig")
            .field("bot_token", &self.redacted_token())
            .field("owners", &self.owners)
            .field("register_commands", &self.register_commands)
            .finish()
    }
}
