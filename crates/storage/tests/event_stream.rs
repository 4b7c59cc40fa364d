#![forbid(unsafe_code)]

use dl_core::calendar::Day;
use dl_core::ids::UserId;
use dl_storage::{NewTask, SqliteStore, StoreError};
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
fn events_record_the_day_in_append_order() {
    let storage_dir = temp_dir("events_record_the_day_in_append_order");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    store
        .week_create(&alice, "March start", day("2025-03-03"))
        .expect("week");
    let task = store
        .task_add(&alice, "Run", 30, day("2025-03-03"))
        .expect("task");
    assert!(store.task_toggle(&alice, &task.id).expect("toggle"));
    store
        .day_start(
            &alice,
            &[],
            &[NewTask {
                title: "Write".to_string(),
                duration_minutes: 60,
            }],
            day("2025-03-04"),
        )
        .expect("start");
    store
        .day_complete(&alice, None, day("2025-03-04"))
        .expect("complete");

    let events = store.list_events(&alice, None, 100).expect("events");
    let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec![
            "season_created",
            "month_created",
            "week_created",
            "task_added",
            "task_toggled",
            "day_started",
            "day_committed",
        ]
    );
    assert_eq!(events[0].event_id(), "evt_0000000000000001");
}

#[test]
fn event_cursor_resumes_after_a_seen_id() {
    let storage_dir = temp_dir("event_cursor_resumes_after_a_seen_id");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");

    store
        .week_create(&alice, "March start", day("2025-03-03"))
        .expect("week");
    store
        .task_add(&alice, "Run", 30, day("2025-03-03"))
        .expect("task");

    let all = store.list_events(&alice, None, 100).expect("all events");
    assert!(all.len() >= 4);

    let cursor = all[1].event_id();
    let rest = store
        .list_events(&alice, Some(&cursor), 100)
        .expect("resume");
    assert_eq!(rest.len(), all.len() - 2);
    assert_eq!(rest.first().map(|e| e.seq), Some(all[2].seq));
}

#[test]
fn event_cursor_must_be_well_formed() {
    let storage_dir = temp_dir("event_cursor_must_be_well_formed");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");
    store
        .week_create(&alice, "Cursor week", day("2025-03-03"))
        .expect("week");

    // Signed suffixes parse as i64 but were never issued; they must error
    // instead of replaying the journal from the start.
    for bad in ["nope", "evt_", "evt_-5", "evt_+5", "evt_12x"] {
        let err = store.list_events(&alice, Some(bad), 10).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)), "cursor {bad:?}");
    }
}

#[test]
fn events_are_scoped_to_their_user() {
    let storage_dir = temp_dir("events_are_scoped_to_their_user");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let alice = user("alice");
    let bob = user("bob");

    store
        .week_create(&alice, "Alice week", day("2025-03-03"))
        .expect("week");

    assert!(!store.list_events(&alice, None, 10).expect("alice").is_empty());
    assert!(store.list_events(&bob, None, 10).expect("bob").is_empty());
}
