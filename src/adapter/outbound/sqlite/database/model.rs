//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{
    admin_preferences, admins, blacklist_terms, blocked_users, keywords, match_events,
    push_records, system_settings, target_groups,
};

/// Database row for a keyword (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = keywords)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KeywordRow {
    pub id: Option<i32>,
    pub keyword: String,
    pub hit_count: i64,
    pub added_by: Option<i64>,
    pub created_at: String,
}

/// Database row for a keyword (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = keywords)]
pub struct NewKeywordRow<'a> {
    pub keyword: &'a str,
    pub added_by: Option<i64>,
    pub created_at: String,
}

/// Database row for a target group (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = target_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TargetGroupRow {
    pub id: Option<i32>,
    pub chat_id: i64,
    pub title: Option<String>,
    pub message_count: i64,
    pub hit_count: i64,
    pub joined_at: String,
}

/// Database row for a target group (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = target_groups)]
pub struct NewTargetGroupRow<'a> {
    pub chat_id: i64,
    pub title: Option<&'a str>,
    pub joined_at: String,
}

/// Database row for an ordinary admin (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AdminRow {
    pub id: Option<i32>,
    pub user_id: i64,
    pub username: Option<String>,
    pub added_by: i64,
    pub created_at: String,
}

/// Database row for an ordinary admin (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = admins)]
pub struct NewAdminRow<'a> {
    pub user_id: i64,
    pub username: Option<&'a str>,
    pub added_by: i64,
    pub created_at: String,
}

/// Database row for a notification preference.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = admin_preferences)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PreferenceRow {
    pub user_id: i64,
    pub notify_enabled: bool,
}

/// Database row for a match event (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = match_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MatchEventRow {
    pub id: Option<i32>,
    pub keyword: String,
    pub chat_id: i64,
    pub chat_title: Option<String>,
    pub sender_id: i64,
    pub sender_username: Option<String>,
    pub message_id: i32,
    pub content: String,
    pub matched_at: String,
}

/// Database row for a match event (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = match_events)]
pub struct NewMatchEventRow<'a> {
    pub keyword: &'a str,
    pub chat_id: i64,
    pub chat_title: Option<&'a str>,
    pub sender_id: i64,
    pub sender_username: Option<&'a str>,
    pub message_id: i32,
    pub content: &'a str,
    pub matched_at: String,
}

/// Database row for a blacklist term (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = blacklist_terms)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BlacklistTermRow {
    pub id: Option<i32>,
    pub term: String,
    pub added_by: Option<i64>,
    pub created_at: String,
}

/// Database row for a blacklist term (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = blacklist_terms)]
pub struct NewBlacklistTermRow<'a> {
    pub term: &'a str,
    pub added_by: Option<i64>,
    pub created_at: String,
}

/// Database row for a blocked user.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = blocked_users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BlockedUserRow {
    pub user_id: i64,
    pub reason: Option<String>,
    pub blocked_by: Option<i64>,
    pub blocked_at: String,
}

/// Database row for a system setting.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = system_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SettingRow {
    pub key: String,
    pub value: String,
}

/// Database row for the last push of a sender in a group.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = push_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PushRecordRow {
    pub sender_id: i64,
    pub chat_id: i64,
    pub pushed_at: String,
}
