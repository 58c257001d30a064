//! Telegram delivery of match alerts.
//!
//! Alerts are sent as direct messages to each recipient carried by the
//! event.

mod format;

pub mod notifier;

pub use notifier::TelegramNotifier;
