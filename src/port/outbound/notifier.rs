//! Notifier port for match alerts and membership changes.
//!
//! Events carry their own recipient list, computed by the application layer
//! from the admin allowlist and notification preferences. Adapters only
//! deliver.

use crate::domain::{event::MatchEvent, group::TargetGroup, id::ChatId, id::UserId};

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A monitored message matched a keyword.
    KeywordMatched {
        event: MatchEvent,
        recipients: Vec<UserId>,
    },
    /// The bot was added to a group and started monitoring it.
    GroupJoined {
        group: TargetGroup,
        added_by: Option<UserId>,
        recipients: Vec<UserId>,
    },
    /// The bot was removed from a monitored group.
    GroupLeft {
        chat: ChatId,
        title: Option<String>,
        recipients: Vec<UserId>,
    },
}

impl Event {
    /// Users this event should be delivered to.
    #[must_use]
    pub fn recipients(&self) -> &[UserId] {
        match self {
            Self::KeywordMatched { recipients, .. }
            | Self::GroupJoined { recipients, .. }
            | Self::GroupLeft { recipients, .. } => recipients,
        }
    }
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget. Implementations must be thread-safe
/// and should queue slow I/O instead of performing it inside `notify`.
pub trait Notifier: Send + Sync {
    /// Handle an event. Must return quickly.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }
}

/// A notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::info;
        match event {
            Event::KeywordMatched { event, recipients } => {
                info!(
                    keyword = %event.keyword,
                    group = %event.group,
                    sender = %event.sender,
                    message_id = event.message_id,
                    recipients = recipients.len(),
                    "Keyword matched"
                );
            }
            Event::GroupJoined {
                group, added_by, ..
            } => {
                info!(
                    group = %group.id,
                    title = group.title.as_deref().unwrap_or(""),
                    added_by = added_by.map(UserId::get),
                    "Joined group"
                );
            }
            Event::GroupLeft { chat, title, .. } => {
                info!(
                    group = %chat,
                    title = title.as_deref().unwrap_or(""),
                    "Left group"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingNotifier(Arc<AtomicUsize>);

    impl Notifier for CountingNotifier {
        fn notify(&self, _event: Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn left_event() -> Event {
        Event::GroupLeft {
            chat: ChatId::new(-1),
            title: None,
            recipients: vec![UserId::new(1), UserId::new(2)],
        }
    }

    #[test]
    fn registry_broadcasts_to_all() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(CountingNotifier(Arc::clone(&count))));
        registry.register(Box::new(CountingNotifier(Arc::clone(&count))));

        registry.notify(left_event());

        assert_eq!(registry.len(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_registry_is_harmless() {
        let registry = NotifierRegistry::default();
        assert!(registry.is_empty());
        registry.notify(left_event());
    }

    #[test]
    fn recipients_are_exposed_for_every_variant() {
        assert_eq!(left_event().recipients().len(), 2);
    }
}
