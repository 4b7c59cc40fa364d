#![forbid(unsafe_code)]

use crate::McpServer;
use crate::{
    ai_error, ai_ok, format_store_error, optional_string, optional_usize, require_user, today_local,
};
use dl_storage::{EventRow, StoreError};
use serde_json::{Value, json};

use super::{month_json, week_json};

pub(crate) fn tool_status(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let today = today_local();
    let rollup = match server.store.day_rollup(&user, today) {
        Ok(v) => v,
        Err(err) => return ai_error("STORE_ERROR", &format_store_error(err)),
    };
    let log = match server.store.daily_log_get(&user, today) {
        Ok(v) => v,
        Err(err) => return ai_error("STORE_ERROR", &format_store_error(err)),
    };
    let week = match server.store.week_active(&user) {
        Ok(v) => v,
        Err(err) => return ai_error("STORE_ERROR", &format_store_error(err)),
    };
    let month = match server.store.month_latest(&user) {
        Ok(v) => v,
        Err(err) => return ai_error("STORE_ERROR", &format_store_error(err)),
    };

    ai_ok(
        "status",
        json!({
            "server": {
                "name": crate::SERVER_NAME,
                "version": crate::SERVER_VERSION,
                "build": crate::build_fingerprint(),
                "storage_dir": server.store.storage_dir().to_string_lossy()
            },
            "user": user.as_str(),
            "today": {
                "date": today.to_string(),
                "total": rollup.total,
                "completed": rollup.completed,
                "achievement_rate": rollup.achievement_rate,
                "committed": log.is_some()
            },
            "week": week.as_ref().map(week_json),
            "month": month.as_ref().map(month_json)
        }),
    )
}

pub(crate) fn tool_events_list(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let since = match optional_string(args_obj, "since") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let limit = match optional_usize(args_obj, "limit") {
        Ok(v) => v.unwrap_or(100).clamp(1, 1000),
        Err(resp) => return resp,
    };

    match server.store.list_events(&user, since.as_deref(), limit) {
        Ok(events) => {
            // The last id doubles as the resume cursor for the next call.
            let next_since = events.last().map(|event| event.event_id());
            ai_ok(
                "events_list",
                json!({
                    "events": events.iter().map(event_json).collect::<Vec<_>>(),
                    "count": events.len(),
                    "next_since": next_since
                }),
            )
        }
        Err(StoreError::InvalidInput(msg)) => ai_error("INVALID_INPUT", msg),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_storage(server: &mut McpServer, _args: Value) -> Value {
    ai_ok(
        "storage",
        json!({
            "storage_dir": server.store.storage_dir().to_string_lossy(),
            "build": crate::build_fingerprint()
        }),
    )
}

fn event_json(event: &EventRow) -> Value {
    let payload = serde_json::from_str::<Value>(&event.payload_json).unwrap_or(Value::Null);
    json!({
        "id": event.event_id(),
        "ts": crate::ts_ms_to_rfc3339(event.ts_ms),
        "ts_ms": event.ts_ms,
        "type": event.event_type,
        "entity_id": event.entity_id,
        "payload": payload
    })
}
