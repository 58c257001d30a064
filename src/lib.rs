//! groupwatch - Telegram group keyword monitor.
//!
//! A bot that watches the groups it is a member of for configured keywords
//! and forwards every match to its administrators by direct message.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] - Keywords, groups, admins, match events and settings
//! - [`port`] - Inbound message types and outbound store/notifier traits
//! - [`application`] - Message monitor, command dispatcher, membership tracker
//! - [`adapter`] - Telegram and CLI entry points, SQLite store, Telegram alerts
//! - [`infrastructure`] - Configuration and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - In-memory store, recording notifier and fixtures for tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
