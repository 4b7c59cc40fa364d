#![forbid(unsafe_code)]

use crate::McpServer;
use crate::{ai_error, ai_ok, format_store_error, optional_i64, require_user};
use dl_storage::{HistoryDay, HistoryLog, HistoryTask, StoreError};
use serde_json::{Value, json};

pub(crate) fn tool_history_month(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let year = match optional_i64(args_obj, "year") {
        Ok(Some(v)) => v,
        Ok(None) => return ai_error("INVALID_INPUT", "year is required"),
        Err(resp) => return resp,
    };
    let month = match optional_i64(args_obj, "month") {
        Ok(Some(v)) => v,
        Ok(None) => return ai_error("INVALID_INPUT", "month is required"),
        Err(resp) => return resp,
    };

    if !(1000..=9999).contains(&year) {
        return ai_error("INVALID_INPUT", "year must be a 4-digit year");
    }
    if !(1..=12).contains(&month) {
        return ai_error("INVALID_INPUT", "month must be between 1 and 12");
    }

    match server.store.month_history(&user, year as i32, month as u8) {
        Ok(days) => {
            let count = days.len();
            let days_json = days
                .iter()
                .map(|(date, day)| (date.clone(), history_day_json(day)))
                .collect::<serde_json::Map<_, _>>();
            ai_ok(
                "history_month",
                json!({
                    "year": year,
                    "month": month,
                    "days": days_json,
                    "count": count
                }),
            )
        }
        Err(StoreError::InvalidInput(msg)) => ai_error("INVALID_INPUT", msg),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

fn history_day_json(day: &HistoryDay) -> Value {
    json!({
        "log": day.log.as_ref().map(history_log_json),
        "tasks": day.tasks.iter().map(history_task_json).collect::<Vec<_>>()
    })
}

fn history_log_json(log: &HistoryLog) -> Value {
    json!({
        "achievement_rate": log.achievement_rate,
        "journal": log.journal,
        "commit_time_ms": log.commit_time_ms
    })
}

fn history_task_json(task: &HistoryTask) -> Value {
    json!({
        "id": task.id,
        "title": task.title
    })
}
