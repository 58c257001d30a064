//! Inbound (driving) ports consumed by inbound adapters.
//!
//! The Telegram adapter converts raw updates into these types before handing
//! them to the application layer, which keeps the monitor and dispatcher
//! testable without a bot connection. [`action`] also defines the callback
//! data carried by the buttons under match alerts.

pub mod action;
pub mod membership;
pub mod message;
