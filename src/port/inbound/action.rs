//! Buttons attached to match alerts.
//!
//! Each action travels as Telegram callback data, which is limited to 64
//! bytes, so the encoding is a short tag and one numeric ID.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::id::UserId;

/// What an admin asked for by pressing a button under a match alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Show the sender's recent matches.
    History(UserId),
    /// Delete the match event the alert was sent for.
    DeleteMatch(i64),
    /// Block the sender.
    Block(UserId),
}

impl AlertAction {
    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::History(_) => "📜 History",
            Self::DeleteMatch(_) => "🗑️ Delete",
            Self::Block(_) => "🚫 Block",
        }
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::History(user) => write!(f, "history:{user}"),
            Self::DeleteMatch(id) => write!(f, "delete:{id}"),
            Self::Block(user) => write!(f, "block:{user}"),
        }
    }
}

/// Callback data that is not an [`AlertAction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised callback data `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for AlertAction {
    type Err = UnknownAction;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownAction(data.to_string());
        let (tag, id) = data.split_once(':').ok_or_else(unknown)?;
        let id: i64 = id.parse().map_err(|_| unknown())?;
        if id <= 0 {
            return Err(unknown());
        }
        match tag {
            "history" => Ok(Self::History(UserId::new(id))),
            "delete" => Ok(Self::DeleteMatch(id)),
            "block" => Ok(Self::Block(UserId::new(id))),
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_data_parses_back() {
        for action in [
            AlertAction::History(UserId::new(77)),
            AlertAction::DeleteMatch(12),
            AlertAction::Block(UserId::new(5)),
        ] {
            assert_eq!(action.to_string().parse::<AlertAction>(), Ok(action));
        }
    }

    #[test]
    fn callback_data_fits_telegram_limit() {
        let widest = AlertAction::History(UserId::new(i64::MAX)).to_string();
        assert!(widest.len() <= 64);
    }

    #[test]
    fn foreign_or_malformed_data_is_rejected() {
        assert!("history".parse::<AlertAction>().is_err());
        assert!("history:abc".parse::<AlertAction>().is_err());
        assert!("delete:-4".parse::<AlertAction>().is_err());
        assert!("mute:5".parse::<AlertAction>().is_err());
    }
}
