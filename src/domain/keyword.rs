//! Keywords, match modes, and the text matcher.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::UserId;

/// Maximum length of a keyword or blacklist term, in characters.
pub const MAX_TERM_LEN: usize = 100;

/// A validated search term.
///
/// Used both for watched keywords and for blacklist terms. The text is
/// stored trimmed and exactly as entered; case folding happens at match
/// time so that `/listkw` shows what the admin typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Validate and normalise raw input.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if the trimmed text is empty, spans more
    /// than one line, or exceeds [`MAX_TERM_LEN`] characters.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let term = raw.trim();
        if term.is_empty() {
            return Err(DomainError::EmptyTerm);
        }
        if term.contains(['\n', '\r']) {
            return Err(DomainError::MultilineTerm);
        }
        if term.chars().count() > MAX_TERM_LEN {
            return Err(DomainError::TermTooLong { max: MAX_TERM_LEN });
        }
        Ok(Self(term.to_string()))
    }

    /// Get the keyword as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Keyword {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Keyword> for String {
    fn from(keyword: Keyword) -> Self {
        keyword.0
    }
}

/// A stored keyword with its usage counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRecord {
    pub keyword: Keyword,
    /// Number of match events attributed to this keyword.
    pub hit_count: u64,
    pub added_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// How a term is compared against message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The term occurs anywhere in the message.
    #[default]
    Contains,
    /// The whole trimmed message equals the term.
    Exact,
}

impl MatchMode {
    /// Canonical name used in storage and replies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contains" | "fuzzy" | "substring" => Ok(Self::Contains),
            "exact" => Ok(Self::Exact),
            other => Err(DomainError::UnknownMatchMode(other.to_string())),
        }
    }
}

/// Compares message text against terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    case_sensitive: bool,
}

impl Matcher {
    /// Create a matcher with the given case policy.
    #[must_use]
    pub const fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    fn fold<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }

    /// Whether `term` matches `text` under `mode`.
    #[must_use]
    pub fn matches(&self, text: &str, term: &Keyword, mode: MatchMode) -> bool {
        let text = self.fold(text);
        self.matches_folded(&text, term, mode)
    }

    fn matches_folded(&self, folded_text: &str, term: &Keyword, mode: MatchMode) -> bool {
        let term = self.fold(term.as_str());
        match mode {
            MatchMode::Contains => folded_text.contains(term.as_ref()),
            MatchMode::Exact => folded_text.trim() == term.as_ref(),
        }
    }

    /// Return the first term in `terms` that matches `text`.
    ///
    /// Order is significant: callers pass terms in store order and the
    /// earliest match wins.
    #[must_use]
    pub fn first_match<'a, I>(&self, text: &str, terms: I, mode: MatchMode) -> Option<&'a Keyword>
    where
        I: IntoIterator<Item = &'a Keyword>,
    {
        let text = self.fold(text);
        terms
            .into_iter()
            .find(|term| self.matches_folded(&text, term, mode))
    }
}
