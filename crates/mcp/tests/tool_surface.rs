#![forbid(unsafe_code)]

mod support;
use support::*;

use serde_json::json;

#[test]
fn tools_list_names_the_whole_surface() {
    let mut server = Server::start_initialized("tools_list_surface");

    let tools_list = server.request(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/list",
        "params": {}
    }));
    let tools = tools_list
        .get("result")
        .and_then(|v| v.get("tools"))
        .and_then(|v| v.as_array())
        .expect("result.tools");

    let mut names = tools
        .iter()
        .filter_map(|tool| tool.get("name").and_then(|v| v.as_str()))
        .collect::<Vec<_>>();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "day_complete",
            "day_start",
            "day_status",
            "events_list",
            "history_month",
            "month_create",
            "month_ensure",
            "month_update",
            "season_ensure",
            "status",
            "storage",
            "task_add",
            "task_list",
            "task_toggle",
            "week_active",
            "week_create",
            "week_update",
        ]
    );
}

#[test]
fn unknown_tools_fail_closed() {
    let mut server = Server::start_initialized("unknown_tool");

    let payload = server.call_tool(2, "does_not_exist", json!({ "user": "alice" }));
    assert_tool_error(&payload, "UNKNOWN_TOOL");
}

#[test]
fn namespaced_tool_names_are_accepted() {
    let mut server = Server::start_initialized("namespaced_tool");

    let payload = server.call_tool(2, "dayloop/storage", json!({}));
    assert_tool_ok(&payload);
    assert!(
        payload
            .get("result")
            .and_then(|v| v.get("storage_dir"))
            .and_then(|v| v.as_str())
            .is_some_and(|dir| !dir.is_empty()),
        "storage must report its directory"
    );
}

#[test]
fn null_arguments_read_as_empty() {
    let mut server = Server::start_initialized("null_arguments");

    let resp = server.request(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": { "name": "storage", "arguments": null }
    }));
    let payload = extract_tool_text(&resp);
    assert_tool_ok(&payload);
}

#[test]
fn per_user_tools_insist_on_a_user() {
    let mut server = Server::start_initialized("user_required");

    let payload = server.call_tool(2, "status", json!({}));
    assert_tool_error(&payload, "INVALID_INPUT");
    let message = payload
        .get("error")
        .and_then(|v| v.get("message"))
        .and_then(|v| v.as_str())
        .expect("error.message");
    assert!(message.contains("user"), "message was: {message}");
}

#[test]
fn user_ids_are_validated_at_the_edge() {
    let mut server = Server::start_initialized("user_validated");

    let payload = server.call_tool(2, "status", json!({ "user": "-starts-with-dash" }));
    assert_tool_error(&payload, "INVALID_INPUT");

    let payload = server.call_tool(3, "status", json!({ "user": "weird chars!" }));
    assert_tool_error(&payload, "INVALID_INPUT");
}
