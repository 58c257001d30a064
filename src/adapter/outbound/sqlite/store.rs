//! SQLite store implementation.
//!
//! Provides persistent storage for every storage port using SQLite and
//! Diesel ORM. Timestamps are stored as RFC 3339 text.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sql_types::BigInt;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    AdminRow, BlacklistTermRow, BlockedUserRow, KeywordRow, MatchEventRow, NewAdminRow,
    NewBlacklistTermRow, NewKeywordRow, NewMatchEventRow, NewTargetGroupRow, PreferenceRow,
    PushRecordRow, SettingRow, TargetGroupRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    admin_preferences, admins, blacklist_terms, blocked_users, keywords, match_events,
    push_records, system_settings, target_groups,
};
use crate::domain::{
    admin::AdminRole, admin::AdminUser, blocklist::BlockedUser, event::MatchEvent,
    group::TargetGroup, id::ChatId, id::UserId, keyword::Keyword, keyword::KeywordRecord,
    settings::MonitorSettings,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    AddOutcome, AdminStore, BlacklistStore, BlocklistStore, GroupStore, KeywordStore, MatchLog,
    RemoveOutcome, SettingsStore,
};

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed store.
///
/// Implements every storage port over one connection pool.
pub struct SqliteStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<Conn> {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

fn db_err(e: diesel::result::Error) -> Error {
    Error::Database(e.to_string())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

fn stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_term(raw: &str) -> Result<Keyword> {
    Keyword::parse(raw).map_err(|e| Error::Parse(format!("stored term `{raw}`: {e}")))
}

fn counter(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn added(rows: usize) -> AddOutcome {
    if rows > 0 {
        AddOutcome::Added
    } else {
        AddOutcome::AlreadyExists
    }
}

fn removed(rows: usize) -> RemoveOutcome {
    if rows > 0 {
        RemoveOutcome::Removed
    } else {
        RemoveOutcome::NotFound
    }
}

impl KeywordRow {
    fn into_domain(self) -> Result<KeywordRecord> {
        Ok(KeywordRecord {
            keyword: parse_term(&self.keyword)?,
            hit_count: counter(self.hit_count),
            added_by: self.added_by.map(UserId::new),
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl TargetGroupRow {
    fn into_domain(self) -> Result<TargetGroup> {
        Ok(TargetGroup {
            id: ChatId::new(self.chat_id),
            title: self.title,
            message_count: counter(self.message_count),
            hit_count: counter(self.hit_count),
            joined_at: parse_timestamp(&self.joined_at)?,
        })
    }
}

impl AdminRow {
    fn into_domain(self) -> Result<AdminUser> {
        Ok(AdminUser {
            id: UserId::new(self.user_id),
            username: self.username,
            role: AdminRole::Admin,
            added_by: Some(UserId::new(self.added_by)),
            added_at: Some(parse_timestamp(&self.created_at)?),
        })
    }
}

impl MatchEventRow {
    fn into_domain(self) -> Result<MatchEvent> {
        Ok(MatchEvent {
            id: self.id.map(i64::from),
            keyword: self.keyword,
            group: ChatId::new(self.chat_id),
            group_title: self.chat_title,
            sender: UserId::new(self.sender_id),
            sender_username: self.sender_username,
            message_id: self.message_id,
            content: self.content,
            matched_at: parse_timestamp(&self.matched_at)?,
        })
    }
}

impl BlockedUserRow {
    fn into_domain(self) -> Result<BlockedUser> {
        Ok(BlockedUser {
            id: UserId::new(self.user_id),
            reason: self.reason,
            blocked_by: self.blocked_by.map(UserId::new),
            blocked_at: parse_timestamp(&self.blocked_at)?,
        })
    }
}

impl KeywordStore for SqliteStore {
    async fn add_keyword(&self, keyword: &Keyword, added_by: UserId) -> Result<AddOutcome> {
        let mut conn = self.conn()?;
        let row = NewKeywordRow {
            keyword: keyword.as_str(),
            added_by: Some(added_by.get()),
            created_at: Utc::now().to_rfc3339(),
        };

        let rows = diesel::insert_or_ignore_into(keywords::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_err)?;

        Ok(added(rows))
    }

    async fn remove_keyword(&self, keyword: &Keyword) -> Result<RemoveOutcome> {
        let mut conn = self.conn()?;
        let rows = diesel::delete(keywords::table.filter(keywords::keyword.eq(keyword.as_str())))
            .execute(&mut conn)
            .map_err(db_err)?;

        Ok(removed(rows))
    }

    async fn list_keywords(&self) -> Result<Vec<KeywordRecord>> {
        let mut conn = self.conn()?;
        let rows: Vec<KeywordRow> = keywords::table
            .order(keywords::id.asc())
            .select(KeywordRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;

        rows.into_iter().map(KeywordRow::into_domain).collect()
    }
}

impl GroupStore for SqliteStore {
    async fn add_group(&self, chat: ChatId, title: Option<&str>) -> Result<AddOutcome> {
        let mut conn = self.conn()?;
        let row = NewTargetGroupRow {
            chat_id: chat.get(),
            title,
            joined_at: Utc::now().to_rfc3339(),
        };

        let rows = diesel::insert_or_ignore_into(target_groups::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_err)?;

        if rows == 0 {
            if let Some(title) = title {
                diesel::update(target_groups::table.filter(target_groups::chat_id.eq(chat.get())))
                    .set(target_groups::title.eq(title))
                    .execute(&mut conn)
                    .map_err(db_err)?;
            }
        }

        Ok(added(rows))
    }

    async fn remove_group(&self, chat: ChatId) -> Result<RemoveOutcome> {
        let mut conn = self.conn()?;
        let rows = diesel::delete(
            target_groups::table.filter(target_groups::chat_id.eq(chat.get())),
        )
        .execute(&mut conn)
        .map_err(db_err)?;

        Ok(removed(rows))
    }

    async fn list_groups(&self) -> Result<Vec<TargetGroup>> {
        let mut conn = self.conn()?;
        let rows: Vec<TargetGroupRow> = target_groups::table
            .order(target_groups::id.asc())
            .select(TargetGroupRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;

        rows.into_iter().map(TargetGroupRow::into_domain).collect()
    }

    async fn get_group(&self, chat: ChatId) -> Result<Option<TargetGroup>> {
        let mut conn = self.conn()?;
        let row: Option<TargetGroupRow> = target_groups::table
            .filter(target_groups::chat_id.eq(chat.get()))
            .select(TargetGroupRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(db_err)?;

        row.map(TargetGroupRow::into_domain).transpose()
    }

    async fn record_group_message(&self, chat: ChatId) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::update(target_groups::table.filter(target_groups::chat_id.eq(chat.get())))
            .set(target_groups::message_count.eq(target_groups::message_count + 1_i64))
            .execute(&mut conn)
            .map_err(db_err)?;
        Ok(())
    }
}

impl AdminStore for SqliteStore {
    async fn add_admin(
        &self,
        user: UserId,
        username: Option<&str>,
        added_by: UserId,
    ) -> Result<AddOutcome> {
        let mut conn = self.conn()?;
        let row = NewAdminRow {
            user_id: user.get(),
            username,
            added_by: added_by.get(),
            created_at: Utc::now().to_rfc3339(),
        };

        let rows = diesel::insert_or_ignore_into(admins::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_err)?;

        Ok(added(rows))
    }

    async fn remove_admin(&self, user: UserId) -> Result<RemoveOutcome> {
        let mut conn = self.conn()?;
        let rows = diesel::delete(admins::table.filter(admins::user_id.eq(user.get())))
            .execute(&mut conn)
            .map_err(db_err)?;

        Ok(removed(rows))
    }

    async fn list_admins(&self) -> Result<Vec<AdminUser>> {
        let mut conn = self.conn()?;
        let rows: Vec<AdminRow> = admins::table
            .order(admins::id.asc())
            .select(AdminRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;

        rows.into_iter().map(AdminRow::into_domain).collect()
    }

    async fn is_admin(&self, user: UserId) -> Result<bool> {
        let mut conn = self.conn()?;
        let count: i64 = admins::table
            .filter(admins::user_id.eq(user.get()))
            .count()
            .get_result(&mut conn)
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn set_notify(&self, user: UserId, enabled: bool) -> Result<()> {
        let mut conn = self.conn()?;
        let row = PreferenceRow {
            user_id: user.get(),
            notify_enabled: enabled,
        };
        diesel::replace_into(admin_preferences::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_err)?;
        Ok(())
    }

    async fn notify_enabled(&self, user: UserId) -> Result<bool> {
        let mut conn = self.conn()?;
        let enabled: Option<bool> = admin_preferences::table
            .find(user.get())
            .select(admin_preferences::notify_enabled)
            .first(&mut conn)
            .optional()
            .map_err(db_err)?;
        Ok(enabled.unwrap_or(true))
    }
}

impl MatchLog for SqliteStore {
    async fn record_match(&self, event: &MatchEvent) -> Result<i64> {
        let mut conn = self.conn()?;
        let row = NewMatchEventRow {
            keyword: &event.keyword,
            chat_id: event.group.get(),
            chat_title: event.group_title.as_deref(),
            sender_id: event.sender.get(),
            sender_username: event.sender_username.as_deref(),
            message_id: event.message_id,
            content: &event.content,
            matched_at: stamp(event.matched_at),
        };

        let push = PushRecordRow {
            sender_id: event.sender.get(),
            chat_id: event.group.get(),
            pushed_at: stamp(event.matched_at),
        };

        conn.transaction(|conn| {
            diesel::insert_into(match_events::table)
                .values(&row)
                .execute(conn)?;
            let id: i64 = diesel::select(diesel::dsl::sql::<BigInt>("last_insert_rowid()"))
                .get_result(conn)?;

            diesel::update(keywords::table.filter(keywords::keyword.eq(event.keyword.as_str())))
                .set(keywords::hit_count.eq(keywords::hit_count + 1_i64))
                .execute(conn)?;
            diesel::update(
                target_groups::table.filter(target_groups::chat_id.eq(event.group.get())),
            )
            .set(target_groups::hit_count.eq(target_groups::hit_count + 1_i64))
            .execute(conn)?;
            diesel::replace_into(push_records::table)
                .values(&push)
                .execute(conn)?;
            Ok::<_, diesel::result::Error>(id)
        })
        .map_err(db_err)
    }

    async fn delete_match(&self, id: i64) -> Result<RemoveOutcome> {
        let mut conn = self.conn()?;
        let Ok(id) = i32::try_from(id) else {
            return Ok(RemoveOutcome::NotFound);
        };
        let rows = diesel::delete(match_events::table.filter(match_events::id.eq(id)))
            .execute(&mut conn)
            .map_err(db_err)?;

        Ok(removed(rows))
    }

    async fn recent_matches(&self, limit: usize) -> Result<Vec<MatchEvent>> {
        let mut conn = self.conn()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<MatchEventRow> = match_events::table
            .order(match_events::id.desc())
            .limit(limit)
            .select(MatchEventRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;

        rows.into_iter().map(MatchEventRow::into_domain).collect()
    }

    async fn matches_by_sender(&self, sender: UserId, limit: usize) -> Result<Vec<MatchEvent>> {
        let mut conn = self.conn()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<MatchEventRow> = match_events::table
            .filter(match_events::sender_id.eq(sender.get()))
            .order(match_events::id.desc())
            .limit(limit)
            .select(MatchEventRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;

        rows.into_iter().map(MatchEventRow::into_domain).collect()
    }

    async fn count_matches(&self) -> Result<u64> {
        let mut conn = self.conn()?;
        let count: i64 = match_events::table
            .count()
            .get_result(&mut conn)
            .map_err(db_err)?;
        Ok(counter(count))
    }
}

impl BlocklistStore for SqliteStore {
    async fn block_user(
        &self,
        user: UserId,
        reason: Option<&str>,
        blocked_by: UserId,
    ) -> Result<AddOutcome> {
        let mut conn = self.conn()?;
        let row = BlockedUserRow {
            user_id: user.get(),
            reason: reason.map(str::to_string),
            blocked_by: Some(blocked_by.get()),
            blocked_at: Utc::now().to_rfc3339(),
        };

        let rows = diesel::insert_or_ignore_into(blocked_users::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_err)?;

        Ok(added(rows))
    }

    async fn unblock_user(&self, user: UserId) -> Result<RemoveOutcome> {
        let mut conn = self.conn()?;
        let rows = diesel::delete(blocked_users::table.find(user.get()))
            .execute(&mut conn)
            .map_err(db_err)?;

        Ok(removed(rows))
    }

    async fn list_blocked(&self) -> Result<Vec<BlockedUser>> {
        let mut conn = self.conn()?;
        let rows: Vec<BlockedUserRow> = blocked_users::table
            .order(blocked_users::blocked_at.asc())
            .select(BlockedUserRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;

        rows.into_iter().map(BlockedUserRow::into_domain).collect()
    }

    async fn is_blocked(&self, user: UserId) -> Result<bool> {
        let mut conn = self.conn()?;
        let count: i64 = blocked_users::table
            .find(user.get())
            .count()
            .get_result(&mut conn)
            .map_err(db_err)?;
        Ok(count > 0)
    }
}

impl BlacklistStore for SqliteStore {
    async fn add_blacklist_term(&self, term: &Keyword, added_by: UserId) -> Result<AddOutcome> {
        let mut conn = self.conn()?;
        let row = NewBlacklistTermRow {
            term: term.as_str(),
            added_by: Some(added_by.get()),
            created_at: Utc::now().to_rfc3339(),
        };

        let rows = diesel::insert_or_ignore_into(blacklist_terms::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_err)?;

        Ok(added(rows))
    }

    async fn remove_blacklist_term(&self, term: &Keyword) -> Result<RemoveOutcome> {
        let mut conn = self.conn()?;
        let rows = diesel::delete(
            blacklist_terms::table.filter(blacklist_terms::term.eq(term.as_str())),
        )
        .execute(&mut conn)
        .map_err(db_err)?;

        Ok(removed(rows))
    }

    async fn list_blacklist(&self) -> Result<Vec<Keyword>> {
        let mut conn = self.conn()?;
        let rows: Vec<BlacklistTermRow> = blacklist_terms::table
            .order(blacklist_terms::id.asc())
            .select(BlacklistTermRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;

        rows.iter().map(|row| parse_term(&row.term)).collect()
    }
}

impl SettingsStore for SqliteStore {
    async fn load_settings(&self) -> Result<MonitorSettings> {
        let mut conn = self.conn()?;
        let rows: Vec<SettingRow> = system_settings::table
            .select(SettingRow::as_select())
            .load(&mut conn)
            .map_err(db_err)?;

        Ok(MonitorSettings::from_pairs(
            rows.iter().map(|row| (row.key.as_str(), row.value.as_str())),
        ))
    }

    async fn save_settings(&self, settings: &MonitorSettings) -> Result<()> {
        let mut conn = self.conn()?;
        let rows: Vec<SettingRow> = settings
            .to_pairs()
            .into_iter()
            .map(|(key, value)| SettingRow {
                key: key.to_string(),
                value,
            })
            .collect();

        conn.transaction(|conn| {
            for row in &rows {
                diesel::replace_into(system_settings::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok::<_, diesel::result::Error>(())
        })
        .map_err(db_err)
    }

    async fn last_push(&self, sender: UserId, chat: ChatId) -> Result<Option<DateTime<Utc>>> {
        let mut conn = self.conn()?;
        let pushed_at: Option<String> = push_records::table
            .find((sender.get(), chat.get()))
            .select(push_records::pushed_at)
            .first(&mut conn)
            .optional()
            .map_err(db_err)?;

        pushed_at.as_deref().map(parse_timestamp).transpose()
    }

    async fn prune_push_records(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut conn = self.conn()?;
        // Every stamp is UTC RFC 3339, so text order is time order.
        let rows = diesel::delete(
            push_records::table.filter(push_records::pushed_at.lt(stamp(cutoff))),
        )
        .execute(&mut conn)
        .map_err(db_err)?;
        Ok(rows as u64)
    }
}
