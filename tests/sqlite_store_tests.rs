//! SQLite store integration tests against in-memory and on-disk databases.

use chrono::{TimeZone, Utc};

use groupwatch::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use groupwatch::adapter::outbound::sqlite::SqliteStore;
use groupwatch::domain::event::MatchEvent;
use groupwatch::domain::id::{ChatId, UserId};
use groupwatch::domain::keyword::{Keyword, MatchMode};
use groupwatch::domain::settings::MonitorSettings;
use groupwatch::port::outbound::store::{
    AddOutcome, AdminStore, BlacklistStore, BlocklistStore, GroupStore, KeywordStore, MatchLog,
    RemoveOutcome, SettingsStore,
};

fn open(url: &str) -> SqliteStore {
    let pool = create_pool(url).expect("pool");
    run_migrations(&pool).expect("migrations");
    SqliteStore::new(pool)
}

fn memory_store() -> SqliteStore {
    open(":memory:")
}

fn kw(term: &str) -> Keyword {
    Keyword::parse(term).expect("valid keyword")
}

fn event(keyword: &str, sender: i64, minute: u32) -> MatchEvent {
    MatchEvent {
        id: None,
        keyword: keyword.to_string(),
        group: ChatId::new(-100),
        group_title: Some("Deals".to_string()),
        sender: UserId::new(sender),
        sender_username: None,
        message_id: 7,
        content: format!("{keyword} here"),
        matched_at: Utc.with_ymd_and_hms(2026, 5, 1, 9, minute, 0).unwrap(),
    }
}

const OWNER: UserId = UserId::new(1);

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

#[tokio::test]
async fn adding_a_keyword_twice_keeps_one_copy() {
    let store = memory_store();

    assert_eq!(store.add_keyword(&kw("sale"), OWNER).await.unwrap(), AddOutcome::Added);
    assert_eq!(
        store.add_keyword(&kw("sale"), OWNER).await.unwrap(),
        AddOutcome::AlreadyExists
    );

    let keywords = store.list_keywords().await.unwrap();
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords[0].keyword.as_str(), "sale");
    assert_eq!(keywords[0].added_by, Some(OWNER));
}

#[tokio::test]
async fn removing_missing_keyword_leaves_store_unchanged() {
    let store = memory_store();
    store.add_keyword(&kw("sale"), OWNER).await.unwrap();

    assert_eq!(
        store.remove_keyword(&kw("discount")).await.unwrap(),
        RemoveOutcome::NotFound
    );
    assert_eq!(store.list_keywords().await.unwrap().len(), 1);
}

#[tokio::test]
async fn keywords_list_in_insertion_order_with_hits() {
    let store = memory_store();
    for term in ["zeta", "alpha", "mid"] {
        store.add_keyword(&kw(term), OWNER).await.unwrap();
    }
    store.record_match(&event("alpha", 5, 0)).await.unwrap();
    store.record_match(&event("alpha", 6, 1)).await.unwrap();

    let keywords = store.list_keywords().await.unwrap();
    let terms: Vec<&str> = keywords.iter().map(|r| r.keyword.as_str()).collect();
    assert_eq!(terms, ["zeta", "alpha", "mid"]);
    assert_eq!(keywords[1].hit_count, 2);
    assert_eq!(keywords[0].hit_count, 0);
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn re_adding_group_refreshes_title_and_keeps_counters() {
    let store = memory_store();
    let chat = ChatId::new(-100);

    store.add_group(chat, Some("Old")).await.unwrap();
    store.record_group_message(chat).await.unwrap();
    store.record_match(&event("sale", 5, 0)).await.unwrap();

    assert_eq!(
        store.add_group(chat, Some("New")).await.unwrap(),
        AddOutcome::AlreadyExists
    );
    let group = store.get_group(chat).await.unwrap().expect("group");
    assert_eq!(group.title.as_deref(), Some("New"));
    assert_eq!(group.message_count, 1);
    assert_eq!(group.hit_count, 1);

    store.add_group(chat, None).await.unwrap();
    let group = store.get_group(chat).await.unwrap().expect("group");
    assert_eq!(group.title.as_deref(), Some("New"));
}

#[tokio::test]
async fn removed_group_is_no_longer_a_target() {
    let store = memory_store();
    let chat = ChatId::new(-200);
    store.add_group(chat, None).await.unwrap();

    assert_eq!(store.remove_group(chat).await.unwrap(), RemoveOutcome::Removed);
    assert!(store.get_group(chat).await.unwrap().is_none());
    assert_eq!(store.remove_group(chat).await.unwrap(), RemoveOutcome::NotFound);
}

#[tokio::test]
async fn counters_on_unknown_group_are_noops() {
    let store = memory_store();
    store.record_group_message(ChatId::new(-1)).await.unwrap();
    assert!(store.list_groups().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Admins and preferences
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_lifecycle() {
    let store = memory_store();
    let user = UserId::new(42);

    assert!(!store.is_admin(user).await.unwrap());
    assert_eq!(
        store.add_admin(user, Some("alice"), OWNER).await.unwrap(),
        AddOutcome::Added
    );
    assert!(store.is_admin(user).await.unwrap());

    let admins = store.list_admins().await.unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].username.as_deref(), Some("alice"));
    assert_eq!(admins[0].added_by, Some(OWNER));

    assert_eq!(store.remove_admin(user).await.unwrap(), RemoveOutcome::Removed);
    assert!(!store.is_admin(user).await.unwrap());
}

#[tokio::test]
async fn notify_preference_defaults_on_and_persists() {
    let store = memory_store();
    let user = UserId::new(42);

    assert!(store.notify_enabled(user).await.unwrap());
    store.set_notify(user, false).await.unwrap();
    assert!(!store.notify_enabled(user).await.unwrap());
    store.set_notify(user, true).await.unwrap();
    assert!(store.notify_enabled(user).await.unwrap());
}

// ---------------------------------------------------------------------------
// Match log
// ---------------------------------------------------------------------------

#[tokio::test]
async fn match_log_assigns_ids_and_lists_newest_first() {
    let store = memory_store();

    let first = store.record_match(&event("sale", 5, 0)).await.unwrap();
    let second = store.record_match(&event("deal", 6, 1)).await.unwrap();
    let third = store.record_match(&event("promo", 5, 2)).await.unwrap();
    assert!(first < second && second < third);

    let recent = store.recent_matches(2).await.unwrap();
    let keywords: Vec<&str> = recent.iter().map(|e| e.keyword.as_str()).collect();
    assert_eq!(keywords, ["promo", "deal"]);
    assert_eq!(recent[0].id, Some(third));
    assert_eq!(recent[0].matched_at, event("promo", 5, 2).matched_at);

    let by_sender = store.matches_by_sender(UserId::new(5), 10).await.unwrap();
    assert_eq!(by_sender.len(), 2);
    assert!(by_sender.iter().all(|e| e.sender == UserId::new(5)));

    assert_eq!(store.count_matches().await.unwrap(), 3);
}

#[tokio::test]
async fn match_bumps_counters_with_the_event() {
    let store = memory_store();
    store.add_keyword(&kw("sale"), OWNER).await.unwrap();
    store.add_group(ChatId::new(-100), Some("Deals")).await.unwrap();

    store.record_match(&event("sale", 5, 0)).await.unwrap();

    assert_eq!(store.list_keywords().await.unwrap()[0].hit_count, 1);
    let group = store.get_group(ChatId::new(-100)).await.unwrap().expect("group");
    assert_eq!(group.hit_count, 1);
    assert_eq!(group.message_count, 0);
}

#[tokio::test]
async fn deleted_match_disappears_from_listings() {
    let store = memory_store();
    let first = store.record_match(&event("sale", 5, 0)).await.unwrap();
    let second = store.record_match(&event("deal", 5, 1)).await.unwrap();

    assert_eq!(store.delete_match(first).await.unwrap(), RemoveOutcome::Removed);
    assert_eq!(store.delete_match(first).await.unwrap(), RemoveOutcome::NotFound);

    let remaining = store.matches_by_sender(UserId::new(5), 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, Some(second));
    assert_eq!(store.count_matches().await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Blocklist, blacklist, settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blocked_users_round_trip_with_reason() {
    let store = memory_store();
    let spammer = UserId::new(99);

    store.block_user(spammer, Some("spam"), OWNER).await.unwrap();
    assert!(store.is_blocked(spammer).await.unwrap());
    assert_eq!(
        store.block_user(spammer, None, OWNER).await.unwrap(),
        AddOutcome::AlreadyExists
    );

    let blocked = store.list_blocked().await.unwrap();
    assert_eq!(blocked[0].reason.as_deref(), Some("spam"));

    assert_eq!(store.unblock_user(spammer).await.unwrap(), RemoveOutcome::Removed);
    assert!(!store.is_blocked(spammer).await.unwrap());
}

#[tokio::test]
async fn blacklist_terms_are_unique_and_ordered() {
    let store = memory_store();
    store.add_blacklist_term(&kw("scam"), OWNER).await.unwrap();
    store.add_blacklist_term(&kw("crypto"), OWNER).await.unwrap();
    assert_eq!(
        store.add_blacklist_term(&kw("scam"), OWNER).await.unwrap(),
        AddOutcome::AlreadyExists
    );

    let terms = store.list_blacklist().await.unwrap();
    assert_eq!(terms, vec![kw("scam"), kw("crypto")]);

    store.remove_blacklist_term(&kw("scam")).await.unwrap();
    assert_eq!(store.list_blacklist().await.unwrap(), vec![kw("crypto")]);
}

#[tokio::test]
async fn settings_default_then_persist() {
    let store = memory_store();
    assert_eq!(
        store.load_settings().await.unwrap(),
        MonitorSettings::default()
    );

    let settings = MonitorSettings {
        push_enabled: false,
        keyword_mode: MatchMode::Exact,
        blacklist_mode: MatchMode::Contains,
        no_repeat_minutes: 15,
    };
    store.save_settings(&settings).await.unwrap();
    assert_eq!(store.load_settings().await.unwrap(), settings);
}

#[tokio::test]
async fn recorded_matches_stamp_latest_push_time() {
    let store = memory_store();
    let sender = UserId::new(5);
    let chat = ChatId::new(-100);

    assert!(store.last_push(sender, chat).await.unwrap().is_none());
    store.record_match(&event("sale", 5, 0)).await.unwrap();
    store.record_match(&event("sale", 5, 3)).await.unwrap();

    assert_eq!(
        store.last_push(sender, chat).await.unwrap(),
        Some(event("sale", 5, 3).matched_at)
    );
    assert!(store
        .last_push(sender, ChatId::new(-200))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn pruning_drops_only_stale_push_records() {
    let store = memory_store();
    store.record_match(&event("sale", 5, 0)).await.unwrap();
    store.record_match(&event("sale", 6, 30)).await.unwrap();

    let cutoff = event("sale", 0, 10).matched_at;
    assert_eq!(store.prune_push_records(cutoff).await.unwrap(), 1);

    let chat = ChatId::new(-100);
    assert!(store.last_push(UserId::new(5), chat).await.unwrap().is_none());
    assert!(store.last_push(UserId::new(6), chat).await.unwrap().is_some());
    assert_eq!(store.prune_push_records(cutoff).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn data_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groupwatch.db");
    let url = path.to_string_lossy().to_string();

    {
        let store = open(&url);
        store.add_keyword(&kw("sale"), OWNER).await.unwrap();
        store.add_group(ChatId::new(-100), Some("Deals")).await.unwrap();
    }

    let store = open(&url);
    assert_eq!(store.list_keywords().await.unwrap().len(), 1);
    assert!(store.get_group(ChatId::new(-100)).await.unwrap().is_some());
}
