//! Domain validation errors.
//!
//! Returned by constructors such as [`Keyword::parse`](super::keyword::Keyword::parse)
//! and [`SettingUpdate::parse`](super::settings::SettingUpdate::parse) when an
//! input violates a domain rule.
//!
//! ```
//! use groupwatch::domain::error::DomainError;
//! use groupwatch::domain::keyword::Keyword;
//!
//! let result = Keyword::parse("   ");
//! assert!(matches!(result, Err(DomainError::EmptyTerm)));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Keywords and blacklist terms must contain visible text.
    #[error("term cannot be empty")]
    EmptyTerm,

    /// Terms are capped so that list replies stay readable.
    #[error("term is longer than {max} characters")]
    TermTooLong {
        /// The maximum accepted length.
        max: usize,
    },

    /// Terms are matched against single messages, never across lines.
    #[error("term must fit on a single line")]
    MultilineTerm,

    /// Unrecognised match mode name.
    #[error("unknown match mode `{0}` (use: contains, exact)")]
    UnknownMatchMode(String),

    /// Unrecognised setting key.
    #[error("unknown setting `{0}` (use: push, keyword_mode, blacklist_mode, no_repeat)")]
    UnknownSetting(String),

    /// A setting key was given a value it cannot hold.
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidSetting {
        /// The setting being changed.
        key: &'static str,
        /// The rejected raw value.
        value: String,
        /// What the setting accepts.
        reason: String,
    },
}
