//! Transport-agnostic domain types: keywords, groups, admins, and match events.

pub mod admin;
pub mod blocklist;
pub mod error;
pub mod event;
pub mod group;
pub mod id;
pub mod keyword;
pub mod settings;

pub use admin::{AdminRole, AdminUser, Permission};
pub use blocklist::BlockedUser;
pub use event::MatchEvent;
pub use group::TargetGroup;
pub use id::{ChatId, UserId};
pub use keyword::{Keyword, KeywordRecord, MatchMode, Matcher};
pub use settings::{MonitorSettings, SettingKey, SettingUpdate};
