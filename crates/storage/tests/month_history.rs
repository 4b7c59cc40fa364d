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
fn history_groups_logs_and_completed_tasks_by_date() {
    let storage_dir = temp_dir("history_groups_logs_and_completed_tasks_by_date");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    store
        .week_create(&alice, "March start", day("2025-03-03"))
        .expect("week");
    let run = store
        .task_add(&alice, "Morning run", 40, day("2025-03-03"))
        .expect("run");
    store
        .task_add(&alice, "Emails", 20, day("2025-03-03"))
        .expect("emails");
    assert!(store.task_toggle(&alice, &run.id).expect("complete run"));
    store
        .day_complete(&alice, Some("good start"), day("2025-03-03"))
        .expect("commit monday");

    let groceries = store
        .task_add(&alice, "Groceries", 25, day("2025-03-05"))
        .expect("groceries");
    assert!(store.task_toggle(&alice, &groceries.id).expect("complete"));

    let april = store
        .task_add(&alice, "April thing", 10, day("2025-04-01"))
        .expect("april");
    assert!(store.task_toggle(&alice, &april.id).expect("complete"));

    let history = store.month_history(&alice, 2025, 3).expect("history");
    let dates: Vec<&str> = history.keys().map(String::as_str).collect();
    assert_eq!(dates, vec!["2025-03-03", "2025-03-05"]);

    let monday = &history["2025-03-03"];
    let log = monday.log.as_ref().expect("monday log");
    assert_eq!(log.achievement_rate, 50);
    assert_eq!(log.journal.as_deref(), Some("good start"));
    assert_eq!(monday.tasks.len(), 1, "only completed tasks show up");
    assert_eq!(monday.tasks[0].id, run.id);
    assert_eq!(monday.tasks[0].title, "Morning run");

    let wednesday = &history["2025-03-05"];
    assert!(wednesday.log.is_none(), "uncommitted days have no log");
    assert_eq!(wednesday.tasks.len(), 1);
    assert_eq!(wednesday.tasks[0].id, groceries.id);
}

#[test]
fn history_keeps_log_only_days() {
    let storage_dir = temp_dir("history_keeps_log_only_days");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    store
        .day_complete(&alice, Some("rest day"), day("2025-03-09"))
        .expect("commit");

    let history = store.month_history(&alice, 2025, 3).expect("history");
    let sunday = &history["2025-03-09"];
    assert!(sunday.tasks.is_empty());
    let log = sunday.log.as_ref().expect("log");
    assert_eq!(log.achievement_rate, 0);
    assert_eq!(log.journal.as_deref(), Some("rest day"));
}

#[test]
fn history_stays_within_user_and_month() {
    let storage_dir = temp_dir("history_stays_within_user_and_month");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");
    let bob = user("bob");

    store
        .week_create(&alice, "Alice week", day("2025-03-03"))
        .expect("alice week");
    let alice_task = store
        .task_add(&alice, "Alice task", 30, day("2025-03-03"))
        .expect("alice task");
    assert!(store.task_toggle(&alice, &alice_task.id).expect("done"));

    store
        .week_create(&bob, "Bob week", day("2025-03-03"))
        .expect("bob week");
    let bob_task = store
        .task_add(&bob, "Bob task", 30, day("2025-03-04"))
        .expect("bob task");
    assert!(store.task_toggle(&bob, &bob_task.id).expect("done"));

    let alice_history = store.month_history(&alice, 2025, 3).expect("alice history");
    assert!(alice_history.contains_key("2025-03-03"));
    assert!(!alice_history.contains_key("2025-03-04"));

    let bob_history = store.month_history(&bob, 2025, 3).expect("bob history");
    assert!(bob_history.contains_key("2025-03-04"));
    assert!(!bob_history.contains_key("2025-03-03"));
}

#[test]
fn history_rejects_impossible_months() {
    let storage_dir = temp_dir("history_rejects_impossible_months");
    let store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    let err = store.month_history(&alice, 2025, 13).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    let err = store.month_history(&alice, 2025, 0).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}
