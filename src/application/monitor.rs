//! Keyword monitoring for group messages.
//!
//! Every inbound group message passes a chain of gates before keyword
//! matching. A failed gate has no observable effect. Storage failures are
//! logged and the message is dropped.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use crate::application::notify::match_recipients;
use crate::domain::event::{truncate_content, MatchEvent};
use crate::domain::keyword::Matcher;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::message::IncomingMessage;
use crate::port::outbound::notifier::{Event, Notifier};
use crate::port::outbound::store::Store;

/// Why a message was not considered for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyText,
    /// Commands belong to the dispatcher.
    Command,
    NotGroup,
    /// Anonymous admins and channel posts have no sender.
    NoSender,
    BotSender,
    PushDisabled,
    NotTarget,
    BlockedSender,
    Blacklisted,
}

impl IgnoreReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyText => "empty_text",
            Self::Command => "command",
            Self::NotGroup => "not_group",
            Self::NoSender => "no_sender",
            Self::BotSender => "bot_sender",
            Self::PushDisabled => "push_disabled",
            Self::NotTarget => "not_target",
            Self::BlockedSender => "blocked_sender",
            Self::Blacklisted => "blacklisted",
        }
    }
}

/// Result of processing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
    Ignored(IgnoreReason),
    /// Counted, but no keyword matched.
    NoMatch,
    /// Matched inside the sender's no-repeat window.
    Suppressed,
    Matched(MatchEvent),
    StoreFailed,
}

impl MonitorOutcome {
    /// The recorded event, if the message matched.
    #[must_use]
    pub const fn event(&self) -> Option<&MatchEvent> {
        match self {
            Self::Matched(event) => Some(event),
            _ => None,
        }
    }
}

/// Matches group messages against the keyword store.
pub struct MessageMonitor<S> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    config: Arc<Config>,
    matcher: Matcher,
}

impl<S: Store> MessageMonitor<S> {
    #[must_use]
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>, config: Arc<Config>) -> Self {
        let matcher = Matcher::new(config.monitor.case_sensitive);
        Self {
            store,
            notifier,
            config,
            matcher,
        }
    }

    /// Process one inbound message.
    ///
    /// Never fails: storage errors are logged and reported as
    /// [`MonitorOutcome::StoreFailed`].
    pub async fn handle(&self, message: &IncomingMessage) -> MonitorOutcome {
        match self.process(message).await {
            Ok(MonitorOutcome::Ignored(reason)) => {
                debug!(
                    chat = %message.chat_id,
                    message_id = message.message_id,
                    reason = reason.as_str(),
                    "Message ignored"
                );
                MonitorOutcome::Ignored(reason)
            }
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    chat = %message.chat_id,
                    message_id = message.message_id,
                    error = %e,
                    "Failed to process group message"
                );
                MonitorOutcome::StoreFailed
            }
        }
    }

    async fn process(&self, message: &IncomingMessage) -> Result<MonitorOutcome> {
        let text = message.text.trim();
        if text.is_empty() {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::EmptyText));
        }
        if message.is_command() {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::Command));
        }
        if !message.chat_kind.is_group() {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::NotGroup));
        }
        let Some(sender) = message.sender.as_ref() else {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::NoSender));
        };
        if sender.is_bot {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::BotSender));
        }

        let settings = self.store.load_settings().await?;
        if !settings.push_enabled {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::PushDisabled));
        }

        let Some(group) = self.store.get_group(message.chat_id).await? else {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::NotTarget));
        };

        if self.store.is_blocked(sender.id).await? {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::BlockedSender));
        }

        let blacklist = self.store.list_blacklist().await?;
        if self
            .matcher
            .first_match(text, &blacklist, settings.blacklist_mode)
            .is_some()
        {
            return Ok(MonitorOutcome::Ignored(IgnoreReason::Blacklisted));
        }

        if let Err(e) = self.store.record_group_message(group.id).await {
            warn!(chat = %group.id, error = %e, "Failed to count group message");
        }

        let records = self.store.list_keywords().await?;
        let Some(keyword) = self
            .matcher
            .first_match(
                text,
                records.iter().map(|r| &r.keyword),
                settings.keyword_mode,
            )
            .cloned()
        else {
            return Ok(MonitorOutcome::NoMatch);
        };

        if settings.no_repeat_minutes > 0 {
            let window = Duration::minutes(i64::from(settings.no_repeat_minutes));
            if let Some(last) = self.store.last_push(sender.id, group.id).await? {
                if message.sent_at - last < window {
                    debug!(
                        chat = %group.id,
                        sender = %sender.id,
                        keyword = %keyword,
                        "Match suppressed by no-repeat window"
                    );
                    return Ok(MonitorOutcome::Suppressed);
                }
            }
        }

        let mut event = MatchEvent {
            id: None,
            keyword: keyword.as_str().to_string(),
            group: group.id,
            group_title: message.chat_title.clone().or(group.title),
            sender: sender.id,
            sender_username: sender.username.clone(),
            message_id: message.message_id,
            content: truncate_content(text, self.config.monitor.content_preview_len),
            matched_at: message.sent_at,
        };
        event.id = Some(self.store.record_match(&event).await?);

        info!(
            keyword = %keyword,
            chat = %event.group,
            sender = %event.sender,
            message_id = event.message_id,
            "Keyword matched"
        );

        if self.config.notify.enabled {
            let recipients = match_recipients(self.store.as_ref(), &self.config).await?;
            self.notifier.notify(Event::KeywordMatched {
                event: event.clone(),
                recipients,
            });
        }

        Ok(MonitorOutcome::Matched(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::{ChatId, UserId};
    use crate::domain::settings::{MonitorSettings, SettingUpdate};
    use crate::port::inbound::message::{ChatKind, Sender};
    use crate::port::outbound::store::{
        AdminStore, BlacklistStore, BlocklistStore, GroupStore, KeywordStore, SettingsStore,
    };
    use crate::testkit::domain::{group_message, keyword};
    use crate::testkit::notifier::RecordingNotifier;
    use crate::testkit::{config, store::InMemoryStore};

    const GROUP: i64 = -100_500;
    const SENDER: i64 = 77;

    struct Fixture {
        store: Arc<InMemoryStore>,
        notifier: RecordingNotifier,
        monitor: MessageMonitor<InMemoryStore>,
    }

    async fn fixture_with(config: Config) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        store.add_group(ChatId::new(GROUP), Some("Deals")).await.unwrap();
        let notifier = RecordingNotifier::new();
        let monitor = MessageMonitor::new(
            Arc::clone(&store),
            Arc::new(notifier.clone()),
            Arc::new(config),
        );
        Fixture {
            store,
            notifier,
            monitor,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(config::config()).await
    }

    async fn add_keywords(store: &InMemoryStore, terms: &[&str]) {
        for term in terms {
            store
                .add_keyword(&keyword(term), UserId::new(config::OWNER))
                .await
                .unwrap();
        }
    }

    async fn update(store: &InMemoryStore, update: SettingUpdate) {
        let settings = store.load_settings().await.unwrap().with(update);
        store.save_settings(&settings).await.unwrap();
    }

    // -------------------------------------------------------------------------
    // Gates
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn ignores_empty_text() {
        let f = fixture().await;
        let outcome = f.monitor.handle(&group_message(GROUP, SENDER, "   ")).await;
        assert_eq!(outcome, MonitorOutcome::Ignored(IgnoreReason::EmptyText));
    }

    #[tokio::test]
    async fn ignores_private_chats() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        let mut message = group_message(GROUP, SENDER, "sale");
        message.chat_kind = ChatKind::Private;
        let outcome = f.monitor.handle(&message).await;
        assert_eq!(outcome, MonitorOutcome::Ignored(IgnoreReason::NotGroup));
    }

    #[tokio::test]
    async fn ignores_bots_and_anonymous_senders() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;

        let mut from_bot = group_message(GROUP, SENDER, "sale");
        from_bot.sender = Some(Sender {
            is_bot: true,
            ..Sender::user(UserId::new(SENDER), None)
        });
        assert_eq!(
            f.monitor.handle(&from_bot).await,
            MonitorOutcome::Ignored(IgnoreReason::BotSender)
        );

        let mut anonymous = group_message(GROUP, SENDER, "sale");
        anonymous.sender = None;
        assert_eq!(
            f.monitor.handle(&anonymous).await,
            MonitorOutcome::Ignored(IgnoreReason::NoSender)
        );
    }

    #[tokio::test]
    async fn ignores_non_target_groups() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        let outcome = f.monitor.handle(&group_message(-1, SENDER, "sale")).await;
        assert_eq!(outcome, MonitorOutcome::Ignored(IgnoreReason::NotTarget));
        assert!(f.store.matches().is_empty());
    }

    #[tokio::test]
    async fn ignores_commands() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        let outcome = f
            .monitor
            .handle(&group_message(GROUP, SENDER, "/addkw sale"))
            .await;
        assert_eq!(outcome, MonitorOutcome::Ignored(IgnoreReason::Command));
    }

    #[tokio::test]
    async fn push_disabled_stops_matching() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        update(&f.store, SettingUpdate::PushEnabled(false)).await;

        let outcome = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert_eq!(outcome, MonitorOutcome::Ignored(IgnoreReason::PushDisabled));
        assert!(f.notifier.is_empty());
    }

    #[tokio::test]
    async fn blocked_sender_is_ignored() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        f.store
            .block_user(UserId::new(SENDER), None, UserId::new(config::OWNER))
            .await
            .unwrap();

        let outcome = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert_eq!(outcome, MonitorOutcome::Ignored(IgnoreReason::BlockedSender));
    }

    #[tokio::test]
    async fn blacklist_vetoes_under_its_mode() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        f.store
            .add_blacklist_term(&keyword("spam"), UserId::new(config::OWNER))
            .await
            .unwrap();

        // Exact mode: only a message equal to the term is vetoed.
        let outcome = f
            .monitor
            .handle(&group_message(GROUP, SENDER, "spam sale"))
            .await;
        assert!(matches!(outcome, MonitorOutcome::Matched(_)));

        update(
            &f.store,
            SettingUpdate::BlacklistMode(crate::domain::keyword::MatchMode::Contains),
        )
        .await;
        let outcome = f
            .monitor
            .handle(&group_message(GROUP, SENDER + 1, "spam sale"))
            .await;
        assert_eq!(outcome, MonitorOutcome::Ignored(IgnoreReason::Blacklisted));
    }

    // -------------------------------------------------------------------------
    // Matching
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn first_keyword_in_store_order_wins() {
        let f = fixture().await;
        add_keywords(&f.store, &["today", "sale"]).await;

        let outcome = f
            .monitor
            .handle(&group_message(GROUP, SENDER, "big sale today"))
            .await;
        let event = outcome.event().expect("matched");
        assert_eq!(event.keyword, "today");
        assert_eq!(f.store.matches().len(), 1);
    }

    #[tokio::test]
    async fn matching_ignores_case_by_default() {
        let f = fixture().await;
        add_keywords(&f.store, &["Sale"]).await;
        let outcome = f
            .monitor
            .handle(&group_message(GROUP, SENDER, "BIG SALE"))
            .await;
        assert!(matches!(outcome, MonitorOutcome::Matched(_)));
    }

    #[tokio::test]
    async fn case_sensitive_config_is_respected() {
        let mut config = config::config();
        config.monitor.case_sensitive = true;
        let f = fixture_with(config).await;
        add_keywords(&f.store, &["Sale"]).await;

        let outcome = f
            .monitor
            .handle(&group_message(GROUP, SENDER, "big sale"))
            .await;
        assert_eq!(outcome, MonitorOutcome::NoMatch);
    }

    #[tokio::test]
    async fn no_match_still_counts_message() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        let outcome = f
            .monitor
            .handle(&group_message(GROUP, SENDER, "hello"))
            .await;
        assert_eq!(outcome, MonitorOutcome::NoMatch);

        let group = f.store.get_group(ChatId::new(GROUP)).await.unwrap().unwrap();
        assert_eq!(group.message_count, 1);
        assert_eq!(group.hit_count, 0);
    }

    #[tokio::test]
    async fn match_updates_counters_and_notifies() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        f.store
            .add_admin(UserId::new(5), None, UserId::new(config::OWNER))
            .await
            .unwrap();

        let mut message = group_message(GROUP, SENDER, "big sale today");
        message.message_id = 42;
        let outcome = f.monitor.handle(&message).await;
        let event = outcome.event().expect("matched").clone();
        assert_eq!(event.id, Some(1));
        assert_eq!(event.message_id, 42);
        assert_eq!(event.sender, UserId::new(SENDER));

        let keywords = f.store.list_keywords().await.unwrap();
        assert_eq!(keywords[0].hit_count, 1);
        let group = f.store.get_group(ChatId::new(GROUP)).await.unwrap().unwrap();
        assert_eq!(group.hit_count, 1);

        assert_eq!(
            f.notifier.events(),
            vec![Event::KeywordMatched {
                event,
                recipients: vec![UserId::new(config::OWNER), UserId::new(5)],
            }]
        );
    }

    #[tokio::test]
    async fn content_is_truncated_to_preview_length() {
        let mut config = config::config();
        config.monitor.content_preview_len = 10;
        let f = fixture_with(config).await;
        add_keywords(&f.store, &["sale"]).await;

        let outcome = f
            .monitor
            .handle(&group_message(GROUP, SENDER, "sale sale sale sale"))
            .await;
        assert_eq!(outcome.event().unwrap().content.chars().count(), 10);
    }

    #[tokio::test]
    async fn notify_disabled_records_without_event() {
        let mut config = config::config();
        config.notify.enabled = false;
        let f = fixture_with(config).await;
        add_keywords(&f.store, &["sale"]).await;

        let outcome = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert!(matches!(outcome, MonitorOutcome::Matched(_)));
        assert!(f.notifier.is_empty());
    }

    // -------------------------------------------------------------------------
    // No-repeat window
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn no_repeat_window_suppresses_second_match() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        update(&f.store, SettingUpdate::NoRepeatMinutes(10)).await;

        let first = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert!(matches!(first, MonitorOutcome::Matched(_)));

        let second = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert_eq!(second, MonitorOutcome::Suppressed);

        let other_sender = f
            .monitor
            .handle(&group_message(GROUP, SENDER + 1, "sale"))
            .await;
        assert!(matches!(other_sender, MonitorOutcome::Matched(_)));
        assert_eq!(f.store.matches().len(), 2);
    }

    #[tokio::test]
    async fn expired_window_allows_match() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        update(&f.store, SettingUpdate::NoRepeatMinutes(10)).await;

        let mut first = group_message(GROUP, SENDER, "sale");
        first.sent_at -= Duration::minutes(11);
        f.monitor.handle(&first).await;

        let second = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert!(matches!(second, MonitorOutcome::Matched(_)));
    }

    #[tokio::test]
    async fn unlimited_window_never_suppresses() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        assert_eq!(MonitorSettings::default().no_repeat_minutes, 0);

        f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        let second = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert!(matches!(second, MonitorOutcome::Matched(_)));
    }

    // -------------------------------------------------------------------------
    // Storage failures
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn storage_failure_is_reported_not_raised() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        f.store.set_failing(true);

        let outcome = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert_eq!(outcome, MonitorOutcome::StoreFailed);
        assert!(f.notifier.is_empty());
    }

    #[tokio::test]
    async fn failed_match_write_leaves_no_trace() {
        let f = fixture().await;
        add_keywords(&f.store, &["sale"]).await;
        update(&f.store, SettingUpdate::NoRepeatMinutes(10)).await;

        f.store.set_failing_match_writes(true);
        let first = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert_eq!(first, MonitorOutcome::StoreFailed);
        assert!(f.notifier.is_empty());

        let keywords = f.store.list_keywords().await.unwrap();
        assert_eq!(keywords[0].hit_count, 0);
        let group = f.store.get_group(ChatId::new(GROUP)).await.unwrap().unwrap();
        assert_eq!(group.hit_count, 0);
        assert!(f
            .store
            .last_push(UserId::new(SENDER), ChatId::new(GROUP))
            .await
            .unwrap()
            .is_none());

        f.store.set_failing_match_writes(false);
        let second = f.monitor.handle(&group_message(GROUP, SENDER, "sale")).await;
        assert!(matches!(second, MonitorOutcome::Matched(_)));
        assert_eq!(f.store.matches().len(), 1);
        assert_eq!(f.notifier.len(), 1);
    }
}
