//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`store`]: `InMemoryStore`, a test double for every storage port.
//! - [`notifier`]: `RecordingNotifier`, collects events for assertions.
//! - [`domain`]: builders for messages, senders and membership changes.
//! - [`config`]: canonical test configurations.

pub mod config;
pub mod domain;
pub mod notifier;
pub mod store;
