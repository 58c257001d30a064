//! Telegram notifier.
//!
//! Provides the [`TelegramNotifier`] for delivering match alerts. Events are
//! queued on a channel and sent by a background worker so that
//! [`Notifier::notify`] never blocks the message monitor. Match alerts carry
//! buttons for the sender's history, deleting the match, and blocking the
//! sender.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::port::inbound::action::AlertAction;
use crate::port::outbound::notifier::{Event, Notifier};

use super::format::format_event_message;

/// Telegram notifier that sends direct messages to event recipients.
pub struct TelegramNotifier {
    /// Channel sender for queuing outbound notifications.
    sender: mpsc::UnboundedSender<Event>,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier and spawn the background worker.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(telegram_worker(bot, receiver));
        Self { sender }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!("Telegram notifier channel closed");
        }
    }
}

/// Background worker that sends Telegram messages.
async fn telegram_worker(bot: Bot, mut receiver: mpsc::UnboundedReceiver<Event>) {
    info!("Telegram notifier started");

    while let Some(event) = receiver.recv().await {
        let text = format_event_message(&event);
        let keyboard = alert_keyboard(&event);

        for recipient in event.recipients() {
            let mut request = bot
                .send_message(ChatId(recipient.get()), &text)
                .parse_mode(ParseMode::MarkdownV2);
            if let Some(keyboard) = &keyboard {
                request = request.reply_markup(keyboard.clone());
            }
            match request.await {
                Ok(_) => debug!(recipient = %recipient, "Alert delivered"),
                Err(e) => {
                    error!(recipient = %recipient, error = %e, "Failed to send Telegram message");
                }
            }
        }
    }

    warn!("Telegram notifier worker shutting down");
}

/// Actions offered under an alert, in button order.
fn alert_actions(event: &Event) -> Vec<AlertAction> {
    let Event::KeywordMatched { event, .. } = event else {
        return Vec::new();
    };
    let mut actions = vec![AlertAction::History(event.sender)];
    if let Some(id) = event.id {
        actions.push(AlertAction::DeleteMatch(id));
    }
    actions.push(AlertAction::Block(event.sender));
    actions
}

fn alert_keyboard(event: &Event) -> Option<InlineKeyboardMarkup> {
    let row: Vec<InlineKeyboardButton> = alert_actions(event)
        .into_iter()
        .map(|action| InlineKeyboardButton::callback(action.label(), action.to_string()))
        .collect();
    (!row.is_empty()).then(|| InlineKeyboardMarkup::new([row]))
}
