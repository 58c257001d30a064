//! Builders for domain primitives and inbound messages used across tests.

use chrono::Utc;

use crate::domain::id::{ChatId, UserId};
use crate::domain::keyword::Keyword;
use crate::port::inbound::membership::{BotMembership, MembershipChange};
use crate::port::inbound::message::{ChatKind, IncomingMessage, Sender};

/// A valid keyword.
///
/// # Panics
/// Panics if `term` is not a valid keyword.
#[must_use]
pub fn keyword(term: &str) -> Keyword {
    Keyword::parse(term).expect("valid test keyword")
}

/// A human sender without a username.
#[must_use]
pub fn sender(id: i64) -> Sender {
    Sender::user(UserId::new(id), None)
}

/// A human sender with a username.
#[must_use]
pub fn named_sender(id: i64, username: &str) -> Sender {
    Sender::user(UserId::new(id), Some(username))
}

/// A text message posted in a supergroup.
#[must_use]
pub fn group_message(chat: i64, from: i64, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: ChatId::new(chat),
        chat_kind: ChatKind::Supergroup,
        chat_title: Some(format!("Group {chat}")),
        sender: Some(sender(from)),
        message_id: 1,
        text: text.to_string(),
        sent_at: Utc::now(),
    }
}

/// A text message sent to the bot in a private chat.
#[must_use]
pub fn private_message(from: i64, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: ChatId::new(from),
        chat_kind: ChatKind::Private,
        chat_title: None,
        sender: Some(sender(from)),
        message_id: 1,
        text: text.to_string(),
        sent_at: Utc::now(),
    }
}

/// The bot was added to a supergroup by `actor`.
#[must_use]
pub fn joined(chat: i64, title: &str, actor: i64) -> BotMembership {
    BotMembership {
        chat_id: ChatId::new(chat),
        chat_kind: ChatKind::Supergroup,
        chat_title: Some(title.to_string()),
        change: MembershipChange::Joined,
        actor: Some(UserId::new(actor)),
    }
}

/// The bot was removed from a supergroup.
#[must_use]
pub fn left(chat: i64) -> BotMembership {
    BotMembership {
        chat_id: ChatId::new(chat),
        chat_kind: ChatKind::Supergroup,
        chat_title: None,
        change: MembershipChange::Left,
        actor: None,
    }
}
