//! Changes to the bot's own membership in a chat.

use crate::domain::id::{ChatId, UserId};

use super::message::ChatKind;

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// The bot was added to the chat.
    Joined,
    /// The bot was removed from, or left, the chat.
    Left,
}

/// The bot's membership changed in a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotMembership {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    pub chat_title: Option<String>,
    pub change: MembershipChange,
    /// User who added or removed the bot.
    pub actor: Option<UserId>,
}
