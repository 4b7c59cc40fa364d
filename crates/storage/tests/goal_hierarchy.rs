#![forbid(unsafe_code)]

use dl_core::calendar::Day;
use dl_core::ids::UserId;
use dl_storage::{SqliteStore, StoreError};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("dl_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn day(text: &str) -> Day {
    Day::parse(text).expect("valid day")
}

fn user(name: &str) -> UserId {
    UserId::try_new(name).expect("valid user id")
}

#[test]
fn month_ensure_builds_the_hierarchy_once() {
    let storage_dir = temp_dir("month_ensure_builds_the_hierarchy_once");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    let month = store
        .month_ensure(&alice, day("2025-02-15"))
        .expect("ensure month");
    assert_eq!(month.month, 2);
    assert_eq!(month.year, 2025);
    assert_eq!(month.title, "Month 2 2025");

    let season = store
        .season_ensure(&alice, day("2025-02-15"))
        .expect("ensure season");
    assert_eq!(season.id, month.season_goal_id, "month hangs off the season");
    assert_eq!(season.title, "Season Q1 2025");
    assert_eq!(season.start_date, "2025-01-01");
    assert_eq!(season.end_date, "2025-03-31");
    assert!(season.is_active);

    let again = store
        .month_ensure(&alice, day("2025-02-28"))
        .expect("ensure month again");
    assert_eq!(again.id, month.id, "same month must not duplicate");
    assert_eq!(again.season_goal_id, season.id);
}

#[test]
fn season_ensure_reuses_the_covering_quarter() {
    let storage_dir = temp_dir("season_ensure_reuses_the_covering_quarter");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    let q1 = store
        .season_ensure(&alice, day("2025-01-05"))
        .expect("first ensure");
    let q1_again = store
        .season_ensure(&alice, day("2025-03-31"))
        .expect("same quarter");
    assert_eq!(q1_again.id, q1.id);

    let q4 = store
        .season_ensure(&alice, day("2025-11-20"))
        .expect("other quarter");
    assert_ne!(q4.id, q1.id);
    assert_eq!(q4.title, "Season Q4 2025");
    assert_eq!(q4.start_date, "2025-10-01");
    assert_eq!(q4.end_date, "2025-12-31");
}

#[test]
fn month_create_retitles_in_place() {
    let storage_dir = temp_dir("month_create_retitles_in_place");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    let first = store
        .month_create(&alice, "February push", day("2025-02-01"))
        .expect("create");
    let second = store
        .month_create(&alice, "February push, part two", day("2025-02-10"))
        .expect("retitle");
    assert_eq!(second.id, first.id, "one goal per month per user");
    assert_eq!(second.title, "February push, part two");

    let ensured = store
        .month_ensure(&alice, day("2025-02-20"))
        .expect("ensure");
    assert_eq!(ensured.id, first.id);
    assert_eq!(ensured.title, "February push, part two");
}

#[test]
fn week_create_snaps_to_the_sunday_week() {
    let storage_dir = temp_dir("week_create_snaps_to_the_sunday_week");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    // 2025-01-08 is a Wednesday in the second seven-day slice of January.
    let week = store
        .week_create(&alice, "Ship the draft", day("2025-01-08"))
        .expect("create week");
    assert_eq!(week.start_date, "2025-01-05");
    assert_eq!(week.end_date, "2025-01-11");
    assert_eq!(week.week_number, 2);

    let month = store
        .month_ensure(&alice, day("2025-01-08"))
        .expect("ensure month");
    assert_eq!(week.monthly_goal_id, month.id);
}

#[test]
fn week_active_is_the_latest_created() {
    let storage_dir = temp_dir("week_active_is_the_latest_created");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    assert!(store.week_active(&alice).expect("no week yet").is_none());

    let first = store
        .week_create(&alice, "Week one", day("2025-01-06"))
        .expect("first week");
    let second = store
        .week_create(&alice, "Week two", day("2025-01-13"))
        .expect("second week");
    assert_ne!(first.id, second.id);

    let active = store
        .week_active(&alice)
        .expect("active week")
        .expect("some week");
    assert_eq!(active.id, second.id, "newest week wins");
}

#[test]
fn goal_updates_stay_within_their_owner() {
    let storage_dir = temp_dir("goal_updates_stay_within_their_owner");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");
    let bob = user("bob");

    let month = store
        .month_create(&alice, "Alice February", day("2025-02-01"))
        .expect("month");
    let week = store
        .week_create(&alice, "Alice week", day("2025-02-03"))
        .expect("week");

    assert!(
        !store
            .month_update(&bob, &month.id, "Hijacked")
            .expect("foreign month update"),
        "foreign ids must be invisible"
    );
    assert!(
        !store
            .week_update(&bob, &week.id, "Hijacked")
            .expect("foreign week update")
    );

    assert!(
        store
            .month_update(&alice, &month.id, "Alice February, revised")
            .expect("own month update")
    );
    assert!(
        store
            .week_update(&alice, &week.id, "Alice week, revised")
            .expect("own week update")
    );

    let seen = store
        .month_latest(&alice)
        .expect("latest month")
        .expect("some month");
    assert_eq!(seen.title, "Alice February, revised");
    assert!(store.month_latest(&bob).expect("bob latest").is_none());

    let err = store.month_update(&alice, &month.id, "   ").unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}
