//! Telegram update handling.
//!
//! Long-polls the Bot API through `teloxide` and routes updates: commands to
//! the command dispatcher, other group text to the message monitor, the
//! bot's own membership changes to the membership tracker, and presses on
//! match-alert buttons back to the dispatcher.

mod convert;

pub mod bot;

pub use bot::{run_bot, BotServices};
