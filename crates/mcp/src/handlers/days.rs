#![forbid(unsafe_code)]

use crate::McpServer;
use crate::{
    ai_error, ai_ok, ai_ok_with_warnings, format_store_error, optional_day, optional_string,
    require_user, today_local, warning,
};
use dl_storage::DailyLogRow;
use serde_json::{Value, json};

pub(crate) fn tool_day_status(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let day = match optional_day(args_obj, "date") {
        Ok(v) => v.unwrap_or_else(today_local),
        Err(resp) => return resp,
    };

    let rollup = match server.store.day_rollup(&user, day) {
        Ok(v) => v,
        Err(err) => return ai_error("STORE_ERROR", &format_store_error(err)),
    };
    let log = match server.store.daily_log_get(&user, day) {
        Ok(v) => v,
        Err(err) => return ai_error("STORE_ERROR", &format_store_error(err)),
    };

    // The rollup is live; `committed` is whatever the last day_complete wrote and
    // can lag behind if tasks were toggled since.
    ai_ok(
        "day_status",
        json!({
            "date": day.to_string(),
            "total": rollup.total,
            "completed": rollup.completed,
            "achievement_rate": rollup.achievement_rate,
            "committed": log.as_ref().map(log_json)
        }),
    )
}

pub(crate) fn tool_day_complete(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let day = match optional_day(args_obj, "date") {
        Ok(v) => v.unwrap_or_else(today_local),
        Err(resp) => return resp,
    };
    let journal = match optional_string(args_obj, "journal") {
        Ok(v) => v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
        Err(resp) => return resp,
    };

    // Clients sometimes send their own rate along with the commit. It is never
    // used; the committed rate comes from the task table alone.
    let mut warnings = Vec::new();
    if args_obj.contains_key("achievement_rate") {
        warnings.push(warning(
            "IGNORED_ARG",
            "achievement_rate is computed from the day's tasks",
            "Drop the argument; the server derives the rate.",
        ));
    }

    match server.store.day_complete(&user, journal.as_deref(), day) {
        Ok(log) => ai_ok_with_warnings("day_complete", json!({ "log": log_json(&log) }), warnings),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn log_json(log: &DailyLogRow) -> Value {
    json!({
        "date": log.date,
        "achievement_rate": log.achievement_rate,
        "journal": log.journal,
        "commit_time": crate::ts_ms_to_rfc3339(log.commit_time_ms),
        "commit_time_ms": log.commit_time_ms,
        "created_at_ms": log.created_at_ms,
        "updated_at_ms": log.updated_at_ms
    })
}
