//! Message formatting for Telegram notifications.

use crate::domain::event::MatchEvent;
use crate::domain::id::ChatId;
use crate::port::outbound::notifier::Event;

/// Upper bound on quoted message text, well below Telegram's message limit.
const MAX_QUOTE_CHARS: usize = 3000;

/// Format an event into a `MarkdownV2` Telegram message.
pub fn format_event_message(event: &Event) -> String {
    match event {
        Event::KeywordMatched { event, .. } => format_match(event),
        Event::GroupJoined {
            group, added_by, ..
        } => {
            let added_by = added_by.map_or_else(|| "unknown".to_string(), |id| id.to_string());
            format!(
                "➕ *Now monitoring group*\n\
                \n\
                👥 {}\n\
                🆔 `{}`\n\
                👤 Added by: `{}`",
                escape_markdown(&group.display_name()),
                escape_markdown(&group.id.to_string()),
                escape_markdown(&added_by)
            )
        }
        Event::GroupLeft { chat, title, .. } => {
            let name = title.clone().unwrap_or_else(|| chat.to_string());
            format!(
                "➖ *Stopped monitoring group*\n\
                \n\
                👥 {}\n\
                🆔 `{}`",
                escape_markdown(&name),
                escape_markdown(&chat.to_string())
            )
        }
    }
}

fn format_match(event: &MatchEvent) -> String {
    let mut msg = format!(
        "🎯 *Keyword match*\n\
        \n\
        🔑 Keyword: `{}`\n\
        👥 Group: {}\n\
        👤 From: {} \\(`{}`\\)\n\
        🕐 {}\n\
        \n\
        {}",
        escape_markdown(&event.keyword),
        escape_markdown(&event.group_label()),
        escape_markdown(&event.sender_label()),
        event.sender,
        escape_markdown(&event.matched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        escape_markdown(&truncate(&event.content, MAX_QUOTE_CHARS))
    );
    if let Some(link) = message_link(event.group, event.message_id) {
        msg.push_str(&format!("\n\n[Open message]({})", escape_link(&link)));
    }
    msg
}

/// Public link to a supergroup message.
///
/// Only supergroups (`-100…` IDs) have linkable messages.
fn message_link(chat: ChatId, message_id: i32) -> Option<String> {
    let internal = chat.get().to_string();
    let internal = internal.strip_prefix("-100")?;
    if internal.is_empty() {
        return None;
    }
    Some(format!("https://t.me/c/{internal}/{message_id}"))
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
        '\\',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Escape a URL inside a `MarkdownV2` inline link.
fn escape_link(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::group::TargetGroup;
    use crate::domain::id::UserId;
    use chrono::{TimeZone, Utc};

    fn match_event(chat: i64) -> MatchEvent {
        MatchEvent {
            id: Some(1),
            keyword: "sale".to_string(),
            group: ChatId::new(chat),
            group_title: Some("Deals & Co.".to_string()),
            sender: UserId::new(77),
            sender_username: Some("bob_smith".to_string()),
            message_id: 42,
            content: "big sale today!".to_string(),
            matched_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("hello"), "hello");
        assert_eq!(escape_markdown("hello_world"), "hello\\_world");
        assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
        assert_eq!(escape_markdown("test.com"), "test\\.com");
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn test_truncate_unicode() {
        // Handles multi-byte UTF-8 characters without panic
        assert_eq!(truncate("日本語テスト", 3), "日本語...");
        assert_eq!(truncate("🎯🚀💰", 2), "🎯🚀...");
    }

    #[test]
    fn match_alert_escapes_user_text() {
        let text = format_event_message(&Event::KeywordMatched {
            event: match_event(-1001234),
            recipients: vec![],
        });
        assert!(text.contains("Deals & Co\\."));
        assert!(text.contains("@bob\\_smith"));
        assert!(text.contains("big sale today\\!"));
        assert!(text.contains("2026\\-03\\-01 12:30:00 UTC"));
    }

    #[test]
    fn supergroup_matches_link_to_message() {
        let text = format_event_message(&Event::KeywordMatched {
            event: match_event(-1001234),
            recipients: vec![],
        });
        assert!(text.contains("(https://t.me/c/1234/42)"));
    }

    #[test]
    fn basic_group_matches_have_no_link() {
        let text = format_event_message(&Event::KeywordMatched {
            event: match_event(-4321),
            recipients: vec![],
        });
        assert!(!text.contains("t.me"));
    }

    #[test]
    fn membership_events_name_the_group() {
        let group = TargetGroup {
            id: ChatId::new(-100),
            title: Some("Deals".to_string()),
            message_count: 0,
            hit_count: 0,
            joined_at: Utc::now(),
        };
        let joined = format_event_message(&Event::GroupJoined {
            group,
            added_by: Some(UserId::new(5)),
            recipients: vec![],
        });
        assert!(joined.contains("Now monitoring group"));
        assert!(joined.contains("`5`"));

        let left = format_event_message(&Event::GroupLeft {
            chat: ChatId::new(-100),
            title: None,
            recipients: vec![],
        });
        assert!(left.contains("\\-100"));
    }
}
