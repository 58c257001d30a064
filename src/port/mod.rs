//! Trait definitions and boundary types (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │Telegram │            │   Store     │              │ Notifier  │
//! │ Updates │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! - [`inbound`]: transport-neutral views of Telegram updates
//! - [`outbound`]: persistence and notification contracts

pub mod inbound;
pub mod outbound;
