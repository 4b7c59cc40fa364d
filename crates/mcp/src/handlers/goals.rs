#![forbid(unsafe_code)]

use crate::McpServer;
use crate::{
    ai_error, ai_error_with, ai_ok, format_store_error, optional_day, require_string, require_user,
    today_local,
};
use dl_storage::{MonthlyGoalRow, SeasonGoalRow, StoreError, WeeklyGoalRow};
use serde_json::{Value, json};

pub(crate) fn tool_season_ensure(server: &mut McpServer, args: Value) -> Value {
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

    match server.store.season_ensure(&user, day) {
        Ok(season) => ai_ok("season_ensure", json!({ "season": season_json(&season) })),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_month_ensure(server: &mut McpServer, args: Value) -> Value {
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

    match server.store.month_ensure(&user, day) {
        Ok(month) => ai_ok("month_ensure", json!({ "month": month_json(&month) })),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_month_create(server: &mut McpServer, args: Value) -> Value {
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
    let day = match optional_day(args_obj, "date") {
        Ok(v) => v.unwrap_or_else(today_local),
        Err(resp) => return resp,
    };

    match server.store.month_create(&user, &title, day) {
        Ok(month) => ai_ok("month_create", json!({ "month": month_json(&month) })),
        Err(StoreError::InvalidInput(msg)) => ai_error("INVALID_INPUT", msg),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_week_create(server: &mut McpServer, args: Value) -> Value {
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
    let day = match optional_day(args_obj, "date") {
        Ok(v) => v.unwrap_or_else(today_local),
        Err(resp) => return resp,
    };

    match server.store.week_create(&user, &title, day) {
        Ok(week) => ai_ok("week_create", json!({ "week": week_json(&week) })),
        Err(StoreError::InvalidInput(msg)) => ai_error("INVALID_INPUT", msg),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_month_update(server: &mut McpServer, args: Value) -> Value {
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
    let title = match require_string(args_obj, "title") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match server.store.month_update(&user, &id, &title) {
        Ok(updated) => ai_ok("month_update", json!({ "id": id, "updated": updated })),
        Err(StoreError::InvalidInput(msg)) => ai_error("INVALID_INPUT", msg),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_week_update(server: &mut McpServer, args: Value) -> Value {
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
    let title = match require_string(args_obj, "title") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match server.store.week_update(&user, &id, &title) {
        Ok(updated) => ai_ok("week_update", json!({ "id": id, "updated": updated })),
        Err(StoreError::InvalidInput(msg)) => ai_error("INVALID_INPUT", msg),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn tool_week_active(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return ai_error("INVALID_INPUT", "arguments must be an object");
    };
    let user = match require_user(args_obj) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match server.store.week_active(&user) {
        Ok(Some(week)) => ai_ok("week_active", json!({ "week": week_json(&week) })),
        Ok(None) => ai_error_with(
            "NO_ACTIVE_GOAL",
            "No active weekly goal",
            Some("Create a weekly goal first (week_create)."),
        ),
        Err(err) => ai_error("STORE_ERROR", &format_store_error(err)),
    }
}

pub(crate) fn season_json(season: &SeasonGoalRow) -> Value {
    json!({
        "id": season.id,
        "title": season.title,
        "start_date": season.start_date,
        "end_date": season.end_date,
        "is_active": season.is_active,
        "created_at_ms": season.created_at_ms,
        "updated_at_ms": season.updated_at_ms
    })
}

pub(crate) fn month_json(month: &MonthlyGoalRow) -> Value {
    json!({
        "id": month.id,
        "season_goal_id": month.season_goal_id,
        "title": month.title,
        "month": month.month,
        "year": month.year,
        "created_at_ms": month.created_at_ms,
        "updated_at_ms": month.updated_at_ms
    })
}

pub(crate) fn week_json(week: &WeeklyGoalRow) -> Value {
    json!({
        "id": week.id,
        "monthly_goal_id": week.monthly_goal_id,
        "title": week.title,
        "week_number": week.week_number,
        "start_date": week.start_date,
        "end_date": week.end_date,
        "created_at_ms": week.created_at_ms,
        "updated_at_ms": week.updated_at_ms
    })
}
