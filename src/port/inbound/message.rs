//! Incoming chat messages.

use chrono::{DateTime, Utc};

use crate::domain::id::{ChatId, UserId};

/// Kind of chat a message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Group and supergroup chats are the only ones the monitor watches.
    #[must_use]
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }
}

/// Author of an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub username: Option<String>,
    pub is_bot: bool,
}

impl Sender {
    /// A human sender.
    #[must_use]
    pub fn user(id: UserId, username: Option<&str>) -> Self {
        Self {
            id,
            username: username.map(str::to_string),
            is_bot: false,
        }
    }
}

/// A text message as seen by the monitor and dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    pub chat_title: Option<String>,
    /// `None` for anonymous admins and channel posts.
    pub sender: Option<Sender>,
    pub message_id: i32,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl IncomingMessage {
    /// Whether the text starts with a bot command.
    #[must_use]
    pub fn is_command(&self) -> bool {
        self.text.trim_start().starts_with('/')
    }
}
