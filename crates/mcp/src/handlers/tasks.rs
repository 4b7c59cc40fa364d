#![forbid(unsafe_code)]

use crate::McpServer;
use crate::{
    ai_error, ai_error_with, ai_ok, format_store_error, optional_bool, optional_day, optional_i64,
    optional_string_array, optional_usize, require_string, require_user, today_local,
};
use dl_storage::{NewTask, StoreError, TaskRow};
use serde_json::{Value, json};

pub(crate) fn tool_task_add(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let title = match require_string(args_obj, "title") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let duration_minutes = match optional_i64(args_obj, "duration_minutes") {
        Ok(v) => v.unwrap_or(0),
        Err(resp) => return resp,
    };
    let day = match optional_day(args_obj, "date") {
        Ok(v) => v.unwrap_or_else(today_local),
        Err(resp) => return resp,
    };

    match server.store.task_add(&user, &title, duration_minutes, day) {
        Ok(task) => ai_ok("task_add", json!({ "task": task_json(&task) })),
        Err(StoreError::NoActiveGoal) => ai_error_with(
            "NO_ACTIVE_GOAL",
            "No active weekly goal",
            Some("Create a weekly goal first (week_create)."),
        ),
        Err(StoreError::InvalidInput(msg)) => ai_error("INVALID_INPUT", msg),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_task_toggle(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = match require_string(args_obj, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // toggled=false covers both unknown and foreign ids; the store does not
    // distinguish them, so task ids cannot be probed across users.
    match server.store.task_toggle(&user, &id) {
        Ok(toggled) => ai_ok("task_toggle", json!({ "id": id, "toggled": toggled })),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_task_list(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let all = match optional_bool(args_obj, "all") {
        Ok(v) => v.unwrap_or(false),
        Err(resp) => return resp,
    };
    let pending = match optional_bool(args_obj, "pending") {
        Ok(v) => v.unwrap_or(false),
        Err(resp) => return resp,
    };
    let limit = match optional_usize(args_obj, "limit") {
        Ok(v) => v.unwrap_or(50).clamp(1, 500),
        Err(resp) => return resp,
    };
    let offset = match optional_usize(args_obj, "offset") {
        Ok(v) => v.unwrap_or(0),
        Err(resp) => return resp,
    };
    let day = match optional_day(args_obj, "date") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if pending {
        // Carry-over candidates: everything unfinished before the date.
        let before = day.unwrap_or_else(today_local);
        return match server.store.tasks_pending_before(&user, before) {
            Ok(tasks) => ai_ok(
                "task_list",
                json!({
                    "before": before.to_string(),
                    "pending": true,
                    "tasks": tasks.iter().map(task_json).collect::<Vec<_>>(),
                    "count": tasks.len()
                }),
            ),
            Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
        };
    }

    let on = if all {
        None
    } else {
        Some(day.unwrap_or_else(today_local))
    };
    match server.store.task_list(&user, on, limit, offset) {
        Ok(tasks) => {
            let mut result = json!({
                "tasks": tasks.iter().map(task_json).collect::<Vec<_>>(),
                "count": tasks.len()
            });
            if let Some(day) = on {
                result["date"] = json!(day.to_string());
            }
            ai_ok("task_list", result)
        }
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_day_start(server: &mut McpServer, args: Value) -> Value {
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
    let carry_over = match optional_string_array(args_obj, "carry_over") {
        Ok(v) => v.unwrap_or_default(),
        Err(resp) => return resp,
    };
    let new_tasks = match parse_new_tasks(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match server.store.day_start(&user, &carry_over, &new_tasks, day) {
        Ok(outcome) => ai_ok(
            "day_start",
            json!({
                "date": day.to_string(),
                "carried_over": outcome.carried_over,
                "created": outcome.created.iter().map(task_json).collect::<Vec<_>>()
            }),
        ),
        Err(StoreError::NoActiveGoal) => ai_error_with(
            "NO_ACTIVE_GOAL",
            "No active weekly goal",
            Some("Create a weekly goal first (week_create)."),
        ),
        Err(StoreError::InvalidInput(msg)) => ai_error("INVALID_INPUT", msg),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

fn parse_new_tasks(args: &serde_json::Map<String, Value>) -> Result<Vec<NewTask>, Value> {
    let Some(value) = args.get("tasks") else {
        return Ok(Vec::new());
    };
    if value.is_null() {
        return Ok(Vec::new());
    }
    let Some(arr) = value.as_array() else {
        return Err(ai_error(
            "INVALID_INPUT",
            "tasks must be an array of objects",
        ));
    };

    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        let Some(obj) = item.as_object() else {
            return Err(ai_error("INVALID_INPUT", "tasks entries must be objects"));
        };
        let title = require_string(obj, "title")?;
        let duration_minutes = optional_i64(obj, "duration_minutes")?.unwrap_or(0);
        out.push(NewTask {
            title,
            duration_minutes,
        });
    }
    Ok(out)
}

pub(crate) fn task_json(task: &TaskRow) -> Value {
    json!({
        "id": task.id,
        "weekly_goal_id": task.weekly_goal_id,
        "title": task.title,
        "date": task.date,
        "duration_minutes": task.duration_minutes,
        "is_completed": task.is_completed,
        "created_at_ms": task.created_at_ms,
        "updated_at_ms": task.updated_at_ms
    })
}
