//! Bot command handling: authorize, execute against the store, render a reply.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::infrastructure::config::settings::Config;

pub mod command;
mod dispatch;
mod mutate;
mod render;

pub use command::{bot_commands, command_help, parse_command, Command, CommandParseError};

/// Reply sent when a recognised command is not allowed for the sender.
pub const PERMISSION_DENIED: &str = "⛔ You do not have permission to use this command.";

/// Reply sent when the store fails while executing a command.
pub const STORAGE_FAILURE: &str = "❌ Storage error, please try again later.";

/// What to show after an alert button was pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReply {
    /// Short toast shown on the pressed button.
    pub notice: Option<String>,
    /// Longer text sent as a separate message.
    pub message: Option<String>,
    /// Remove the alert the button belongs to.
    pub remove_alert: bool,
}

impl ActionReply {
    fn notice(text: &str) -> Self {
        Self {
            notice: Some(text.to_string()),
            message: None,
            remove_alert: false,
        }
    }
}

/// Executes bot commands for admins.
pub struct CommandDispatcher<S> {
    store: Arc<S>,
    config: Arc<Config>,
    started_at: DateTime<Utc>,
}
