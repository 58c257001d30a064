//! Admin tiers and command permissions.

use std::fmt;

use chrono::{DateTime, Utc};

use super::id::UserId;

/// Tier of a user on the admin allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdminRole {
    /// Ordinary admin, managed by owners.
    Admin,
    /// Configured owner. Never stored, never removable at runtime.
    Owner,
}

impl AdminRole {
    /// Whether this role satisfies `permission`.
    #[must_use]
    pub const fn grants(self, permission: Permission) -> bool {
        match permission {
            Permission::Anyone | Permission::Admin => true,
            Permission::Owner => matches!(self, Self::Owner),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum tier a command requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Anyone,
    Admin,
    Owner,
}

impl Permission {
    /// Whether a sender with `role` (or none) may proceed.
    #[must_use]
    pub const fn allows(self, role: Option<AdminRole>) -> bool {
        match (self, role) {
            (Self::Anyone, _) => true,
            (_, None) => false,
            (permission, Some(role)) => role.grants(permission),
        }
    }
}

/// A member of the admin allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub id: UserId,
    pub username: Option<String>,
    pub role: AdminRole,
    /// Owner who promoted this admin. `None` for owners.
    pub added_by: Option<UserId>,
    /// When the admin was promoted. `None` for owners.
    pub added_at: Option<DateTime<Utc>>,
}

impl AdminUser {
    /// Build the allowlist entry for a configured owner.
    #[must_use]
    pub const fn owner(id: UserId) -> Self {
        Self {
            id,
            username: None,
            role: AdminRole::Owner,
            added_by: None,
            added_at: None,
        }
    }
}
