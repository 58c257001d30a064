//! Notification adapters.
//!
//! Implements the `port::outbound::notifier::Notifier` trait for delivery
//! backends.

pub mod telegram;
