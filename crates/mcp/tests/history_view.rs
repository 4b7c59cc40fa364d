#![forbid(unsafe_code)]

mod support;
use support::*;

use serde_json::{Value, json};

#[test]
fn history_groups_logs_and_completed_tasks_by_date() {
    let mut server = Server::start_initialized("history_grouping");

    let payload = server.call_tool(
        2,
        "week_create",
        json!({ "user": "alice", "title": "March", "date": "2025-03-03" }),
    );
    assert_tool_ok(&payload);

    // Mar 3: two tasks, one finished, day committed with a journal.
    server.call_tool(
        3,
        "task_add",
        json!({ "user": "alice", "title": "Read", "date": "2025-03-03" }),
    );
    server.call_tool(
        4,
        "task_add",
        json!({ "user": "alice", "title": "Write", "date": "2025-03-03" }),
    );
    server.call_tool(5, "task_toggle", json!({ "user": "alice", "id": "TASK-001" }));
    server.call_tool(
        6,
        "day_complete",
        json!({ "user": "alice", "date": "2025-03-03", "journal": "Solid start" }),
    );

    // Mar 4: a finished task, never committed.
    server.call_tool(
        7,
        "task_add",
        json!({ "user": "alice", "title": "Run", "date": "2025-03-04" }),
    );
    server.call_tool(8, "task_toggle", json!({ "user": "alice", "id": "TASK-003" }));

    // Mar 5: log only, nothing done.
    server.call_tool(9, "day_complete", json!({ "user": "alice", "date": "2025-03-05" }));

    // Apr 1: outside the requested month.
    server.call_tool(
        10,
        "task_add",
        json!({ "user": "alice", "title": "April", "date": "2025-04-01" }),
    );
    server.call_tool(11, "task_toggle", json!({ "user": "alice", "id": "TASK-004" }));

    let payload = server.call_tool(
        12,
        "history_month",
        json!({ "user": "alice", "year": 2025, "month": 3 }),
    );
    assert_tool_ok(&payload);
    assert_eq!(payload["result"]["year"], 2025);
    assert_eq!(payload["result"]["month"], 3);
    assert_eq!(payload["result"]["count"], 3);

    let days = payload["result"]["days"].as_object().expect("days map");
    let mut dates = days.keys().cloned().collect::<Vec<_>>();
    dates.sort();
    assert_eq!(dates, vec!["2025-03-03", "2025-03-04", "2025-03-05"]);

    let mar3 = &days["2025-03-03"];
    assert_eq!(mar3["log"]["achievement_rate"], 50);
    assert_eq!(mar3["log"]["journal"], "Solid start");
    let mar3_tasks = mar3["tasks"].as_array().expect("tasks");
    assert_eq!(mar3_tasks.len(), 1);
    assert_eq!(mar3_tasks[0]["title"], "Read");

    let mar4 = &days["2025-03-04"];
    assert_eq!(mar4["log"], Value::Null);
    assert_eq!(mar4["tasks"].as_array().map(Vec::len), Some(1));

    let mar5 = &days["2025-03-05"];
    assert_eq!(mar5["log"]["achievement_rate"], 0);
    assert_eq!(mar5["tasks"].as_array().map(Vec::len), Some(0));
}

#[test]
fn history_is_scoped_to_the_requesting_user() {
    let mut server = Server::start_initialized("history_scope");

    server.call_tool(
        2,
        "week_create",
        json!({ "user": "alice", "title": "Mine", "date": "2025-03-03" }),
    );
    server.call_tool(
        3,
        "task_add",
        json!({ "user": "alice", "title": "Private", "date": "2025-03-03" }),
    );
    server.call_tool(4, "task_toggle", json!({ "user": "alice", "id": "TASK-001" }));

    let payload = server.call_tool(
        5,
        "history_month",
        json!({ "user": "bob", "year": 2025, "month": 3 }),
    );
    assert_tool_ok(&payload);
    assert_eq!(payload["result"]["count"], 0);
}

#[test]
fn history_validates_year_and_month() {
    let mut server = Server::start_initialized("history_validation");

    let payload = server.call_tool(
        2,
        "history_month",
        json!({ "user": "alice", "year": 99, "month": 3 }),
    );
    assert_tool_error(&payload, "INVALID_INPUT");

    let payload = server.call_tool(
        3,
        "history_month",
        json!({ "user": "alice", "year": 2025, "month": 13 }),
    );
    assert_tool_error(&payload, "INVALID_INPUT");

    let payload = server.call_tool(
        4,
        "history_month",
        json!({ "user": "alice", "year": 2025 }),
    );
    assert_tool_error(&payload, "INVALID_INPUT");
}
