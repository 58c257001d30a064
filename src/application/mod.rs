//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases. Each service receives the
//! immutable [`Config`](crate::infrastructure::config::settings::Config) and
//! an injected [`Store`](crate::port::outbound::store::Store) at construction.

pub mod dispatcher;
pub mod membership;
pub mod monitor;
pub mod notify;
