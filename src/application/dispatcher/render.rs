use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::domain::admin::AdminRole;
use crate::domain::event::{truncate_content, MatchEvent};
use crate::domain::id::UserId;
use crate::domain::settings::MonitorSettings;
use crate::error::Result;
use crate::port::inbound::message::Sender;
use crate::port::outbound::store::Store;

use super::CommandDispatcher;

const STATUS_KEYWORD_PREVIEW: usize = 10;
const STATUS_GROUP_PREVIEW: usize = 5;
const HISTORY_LIMIT: usize = 20;
const EVENT_PREVIEW_LEN: usize = 80;

impl<S: Store> CommandDispatcher<S> {
    pub(super) async fn status_text(&self) -> Result<String> {
        let keywords = self.store.list_keywords().await?;
        let groups = self.store.list_groups().await?;
        let matches = self.store.count_matches().await?;
        let admins = self.store.list_admins().await?;
        let settings = self.store.load_settings().await?;

        let keyword_hits: u64 = keywords.iter().map(|r| r.hit_count).sum();
        let messages: u64 = groups.iter().map(|g| g.message_count).sum();
        let admin_count = self.config.owners().len()
            + admins
                .iter()
                .filter(|a| !self.config.is_owner(a.id))
                .count();

        let mut text = format!(
            "📊 Status\n\n\
            ⏱️ Uptime: {}\n\
            📡 Push: {}\n\
            🔍 Keyword mode: {}\n\
            🚫 Blacklist mode: {}\n\n\
            🔑 Keywords: {} ({} hits)\n\
            👥 Groups: {} ({} messages)\n\
            🎯 Matches: {}\n\
            🛡️ Admins: {}",
            format_uptime(self.started_at),
            on_off(settings.push_enabled),
            settings.keyword_mode,
            settings.blacklist_mode,
            keywords.len(),
            keyword_hits,
            groups.len(),
            messages,
            matches,
            admin_count,
        );

        if !keywords.is_empty() {
            text.push_str("\n\n🔑 Keywords\n");
            let shown: Vec<&str> = keywords
                .iter()
                .take(STATUS_KEYWORD_PREVIEW)
                .map(|r| r.keyword.as_str())
                .collect();
            text.push_str(&shown.join(", "));
            push_more(&mut text, keywords.len(), STATUS_KEYWORD_PREVIEW);
        }
        if !groups.is_empty() {
            text.push_str("\n\n👥 Groups");
            for group in groups.iter().take(STATUS_GROUP_PREVIEW) {
                let _ = write!(text, "\n• {}", group.display_name());
            }
            push_more(&mut text, groups.len(), STATUS_GROUP_PREVIEW);
        }
        Ok(text)
    }

    pub(super) fn my_info_text(&self, sender: &Sender, role: Option<AdminRole>) -> String {
        let username = sender
            .username
            .as_deref()
            .map_or_else(|| "(none)".to_string(), |name| format!("@{name}"));
        let role = role.map_or("none", AdminRole::as_str);
        format!(
            "👤 Your info\n\n\
            🆔 User ID: {}\n\
            📛 Username: {}\n\
            🛡️ Role: {}",
            sender.id, username, role
        )
    }

    pub(super) async fn keywords_text(&self) -> Result<String> {
        let keywords = self.store.list_keywords().await?;
        if keywords.is_empty() {
            return Ok("📭 No keywords yet. Add one with /addkw <keyword>".to_string());
        }
        let mut text = format!(
            "🔑 Keywords ({}/{})\n",
            keywords.len(),
            self.config.monitor.max_keywords
        );
        for (i, record) in keywords.iter().enumerate() {
            let _ = write!(
                text,
                "\n{}. {} ({} hits)",
                i + 1,
                record.keyword,
                record.hit_count
            );
        }
        Ok(text)
    }

    pub(super) async fn groups_text(&self) -> Result<String> {
        let groups = self.store.list_groups().await?;
        if groups.is_empty() {
            return Ok(
                "📭 No monitored groups. Add the bot to a group or use /addgroup <chat_id>"
                    .to_string(),
            );
        }
        let mut text = format!(
            "👥 Groups ({}/{})\n",
            groups.len(),
            self.config.monitor.max_groups
        );
        for (i, group) in groups.iter().enumerate() {
            let _ = write!(
                text,
                "\n{}. {}\n   🆔 {} · 💬 {} messages · 🎯 {} hits",
                i + 1,
                group.display_name(),
                group.id,
                group.message_count,
                group.hit_count
            );
        }
        Ok(text)
    }

    pub(super) async fn admins_text(&self) -> Result<String> {
        let admins = self.store.list_admins().await?;
        let mut text = String::from("🛡️ Admins\n");
        for owner in self.config.owners() {
            let _ = write!(text, "\n👑 {owner} (owner)");
        }
        for admin in admins.iter().filter(|a| !self.config.is_owner(a.id)) {
            let _ = write!(text, "\n• {}", admin.id);
            if let Some(name) = admin.username.as_deref() {
                let _ = write!(text, " @{name}");
            }
        }
        Ok(text)
    }

    pub(super) async fn blacklist_text(&self) -> Result<String> {
        let terms = self.store.list_blacklist().await?;
        if terms.is_empty() {
            return Ok("📭 Blacklist is empty".to_string());
        }
        let mut text = format!("🚫 Blacklist ({})\n", terms.len());
        for (i, term) in terms.iter().enumerate() {
            let _ = write!(text, "\n{}. {}", i + 1, term);
        }
        Ok(text)
    }

    pub(super) async fn blocked_text(&self) -> Result<String> {
        let blocked = self.store.list_blocked().await?;
        if blocked.is_empty() {
            return Ok("📭 No blocked users".to_string());
        }
        let mut text = format!("🚫 Blocked users ({})\n", blocked.len());
        for user in &blocked {
            let _ = write!(text, "\n• {}", user.id);
            if let Some(reason) = user.reason.as_deref() {
                let _ = write!(text, ": {reason}");
            }
        }
        Ok(text)
    }

    pub(super) async fn recent_text(&self, limit: usize) -> Result<String> {
        let events = self.store.recent_matches(limit).await?;
        if events.is_empty() {
            return Ok("📭 No matches yet".to_string());
        }
        Ok(render_events(
            &format!("🎯 Recent matches ({})", events.len()),
            &events,
        ))
    }

    pub(super) async fn history_text(&self, user: UserId) -> Result<String> {
        let events = self.store.matches_by_sender(user, HISTORY_LIMIT).await?;
        if events.is_empty() {
            return Ok(format!("📭 No matches from {user}"));
        }
        Ok(render_events(
            &format!("📜 Matches from {user} ({})", events.len()),
            &events,
        ))
    }

    pub(super) async fn settings_text(&self) -> Result<String> {
        let settings = self.store.load_settings().await?;
        Ok(format!(
            "⚙️ Settings\n\n{}\n\nChange with /set <key> <value>",
            settings_body(&settings)
        ))
    }
}

pub(super) fn settings_body(settings: &MonitorSettings) -> String {
    let no_repeat = if settings.no_repeat_minutes == 0 {
        "off".to_string()
    } else {
        format!("{} min", settings.no_repeat_minutes)
    };
    format!(
        "• push: {}\n\
        • keyword_mode: {}\n\
        • blacklist_mode: {}\n\
        • no_repeat: {}",
        on_off(settings.push_enabled),
        settings.keyword_mode,
        settings.blacklist_mode,
        no_repeat
    )
}

fn render_events(title: &str, events: &[MatchEvent]) -> String {
    let mut text = format!("{title}\n");
    for (i, event) in events.iter().enumerate() {
        let _ = write!(
            text,
            "\n{}. #{} [{}] {} in {} by {}\n   {}",
            i + 1,
            event.id.unwrap_or_default(),
            event.matched_at.format("%Y-%m-%d %H:%M"),
            event.keyword,
            event.group_label(),
            event.sender_label(),
            truncate_content(&event.content, EVENT_PREVIEW_LEN)
        );
    }
    text
}

fn push_more(text: &mut String, total: usize, shown: usize) {
    if total > shown {
        let _ = write!(text, "\n… and {} more", total - shown);
    }
}

const fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub(super) fn format_uptime(started_at: DateTime<Utc>) -> String {
    let elapsed = Utc::now() - started_at;
    let total_seconds = elapsed.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
