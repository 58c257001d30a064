//! SQLite persistence adapter.
//!
//! Implements every storage port on top of a single SQLite file using
//! Diesel ORM with an r2d2 connection pool.

pub mod database;
pub mod store;

pub use store::SqliteStore;
