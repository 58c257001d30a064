//! Conversion from `teloxide` types to inbound port types.

use teloxide::types::{Chat, ChatMemberUpdated, Message, User};

use crate::domain::id::{ChatId, UserId};
use crate::port::inbound::membership::{BotMembership, MembershipChange};
use crate::port::inbound::message::{ChatKind, IncomingMessage, Sender};

pub(super) fn chat_kind(chat: &Chat) -> ChatKind {
    if chat.is_supergroup() {
        ChatKind::Supergroup
    } else if chat.is_group() {
        ChatKind::Group
    } else if chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Private
    }
}

pub(super) fn user_id(user: &User) -> Option<UserId> {
    i64::try_from(user.id.0).ok().map(UserId::new)
}

pub(super) fn sender(user: &User) -> Option<Sender> {
    Some(Sender {
        id: user_id(user)?,
        username: user.username.clone(),
        is_bot: user.is_bot,
    })
}

/// Text or caption of a message, as seen by the monitor.
///
/// Returns `None` for messages without any text.
pub(super) fn incoming_message(msg: &Message) -> Option<IncomingMessage> {
    let text = msg.text().or_else(|| msg.caption())?;
    Some(IncomingMessage {
        chat_id: ChatId::new(msg.chat.id.0),
        chat_kind: chat_kind(&msg.chat),
        chat_title: msg.chat.title().map(str::to_string),
        sender: msg.from.as_ref().and_then(sender),
        message_id: msg.id.0,
        text: text.to_string(),
        sent_at: msg.date,
    })
}

/// The bot's own membership change, if the update is one.
pub(super) fn bot_membership(update: &ChatMemberUpdated) -> Option<BotMembership> {
    let was_present = update.old_chat_member.kind.is_present();
    let is_present = update.new_chat_member.kind.is_present();
    let change = match (was_present, is_present) {
        (false, true) => MembershipChange::Joined,
        (true, false) => MembershipChange::Left,
        _ => return None,
    };
    Some(BotMembership {
        chat_id: ChatId::new(update.chat.id.0),
        chat_kind: chat_kind(&update.chat),
        chat_title: update.chat.title().map(str::to_string),
        change,
        actor: user_id(&update.from),
    })
}

/// Whether a command is explicitly addressed to another bot (`/cmd@other_bot`).
pub(super) fn addressed_to_other_bot(text: &str, own_username: Option<&str>) -> bool {
    let Some(head) = text.trim_start().split_whitespace().next() else {
        return false;
    };
    match (head.split_once('@'), own_username) {
        (Some((_, mention)), Some(own)) => !mention.eq_ignore_ascii_case(own),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_without_mention_are_ours() {
        assert!(!addressed_to_other_bot("/status", Some("watch_bot")));
        assert!(!addressed_to_other_bot("/addkw sale", None));
    }

    #[test]
    fn mention_must_match_own_username() {
        assert!(!addressed_to_other_bot("/status@watch_bot", Some("watch_bot")));
        assert!(!addressed_to_other_bot("/status@Watch_Bot", Some("watch_bot")));
        assert!(addressed_to_other_bot("/status@other_bot", Some("watch_bot")));
    }

    #[test]
    fn unknown_own_username_accepts_any_mention() {
        assert!(!addressed_to_other_bot("/status@other_bot", None));
    }
}
