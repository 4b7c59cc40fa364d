#![forbid(unsafe_code)]

use crate::McpServer;
use crate::handlers;
use serde_json::{Value, json};

pub(crate) fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "season_ensure",
            "description": "Ensure the quarter goal covering a date exists (creates it if missing).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "date": { "type": "string" }
                },
                "required": []
            }
        }),
        json!({
            "name": "month_ensure",
            "description": "Ensure the monthly goal for a date's month exists, creating its season as needed.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "date": { "type": "string" }
                },
                "required": []
            }
        }),
        json!({
            "name": "month_create",
            "description": "Create the monthly goal for a date's month with an explicit title (retitles if it exists).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "title": { "type": "string" },
                    "date": { "type": "string" }
                },
                "required": ["title"]
            }
        }),
        json!({
            "name": "week_create",
            "description": "Create a weekly goal for the Sunday-started week containing a date.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "title": { "type": "string" },
                    "date": { "type": "string" }
                },
                "required": ["title"]
            }
        }),
        json!({
            "name": "month_update",
            "description": "Retitle a monthly goal by id. Unknown ids report updated=false.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "id": { "type": "string" },
                    "title": { "type": "string" }
                },
                "required": ["id", "title"]
            }
        }),
        json!({
            "name": "week_update",
            "description": "Retitle a weekly goal by id. Unknown ids report updated=false.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "id": { "type": "string" },
                    "title": { "type": "string" }
                },
                "required": ["id", "title"]
            }
        }),
        json!({
            "name": "week_active",
            "description": "Show the active weekly goal (the most recently created one).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" }
                },
                "required": []
            }
        }),
        json!({
            "name": "task_add",
            "description": "Add a task for a date under the active weekly goal.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "title": { "type": "string" },
                    "duration_minutes": { "type": "integer" },
                    "date": { "type": "string" }
                },
                "required": ["title"]
            }
        }),
        json!({
            "name": "task_toggle",
            "description": "Flip a task between done and not done. Unknown ids report toggled=false.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "id": { "type": "string" }
                },
                "required": ["id"]
            }
        }),
        json!({
            "name": "task_list",
            "description": "List tasks for a date, all of them, or the pending carry-over candidates.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "date": { "type": "string" },
                    "all": { "type": "boolean" },
                    "pending": { "type": "boolean" },
                    "limit": { "type": "integer" },
                    "offset": { "type": "integer" }
                },
                "required": []
            }
        }),
        json!({
            "name": "day_start",
            "description": "Start a day: re-date chosen unfinished tasks and add the day's new ones in one step.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "date": { "type": "string" },
                    "carry_over": {
                        "type": "array",
                        "items": { "type": "string" }
                    },
                    "tasks": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string" },
                                "duration_minutes": { "type": "integer" }
                            },
                            "required": ["title"]
                        }
                    }
                },
                "required": []
            }
        }),
        json!({
            "name": "day_status",
            "description": "Live rollup for a date: task totals plus the committed log if one exists.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "date": { "type": "string" }
                },
                "required": []
            }
        }),
        json!({
            "name": "day_complete",
            "description": "Commit a day: derive the achievement rate from its tasks and write the daily log.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "date": { "type": "string" },
                    "journal": { "type": "string" }
                },
                "required": []
            }
        }),
        json!({
            "name": "history_month",
            "description": "Calendar view of a month: daily logs plus completed tasks grouped by date.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "year": { "type": "integer" },
                    "month": { "type": "integer" }
                },
                "required": ["year", "month"]
            }
        }),
        json!({
            "name": "status",
            "description": "Server and user overview: active goals and today's rollup.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" }
                },
                "required": []
            }
        }),
        json!({
            "name": "events_list",
            "description": "Read the user's event feed in append order, optionally after a cursor.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user": { "type": "string" },
                    "since": { "type": "string" },
                    "limit": { "type": "integer" }
                },
                "required": []
            }
        }),
        json!({
            "name": "storage",
            "description": "Where this server keeps its data.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "required": []
            }
        }),
    ]
}

pub(crate) fn dispatch_tool(server: &mut McpServer, name: &str, args: Value) -> Option<Value> {
    let resp = match name {
        "season_ensure" => handlers::tool_season_ensure(server, args),
        "month_ensure" => handlers::tool_month_ensure(server, args),
        "month_create" => handlers::tool_month_create(server, args),
        "week_create" => handlers::tool_week_create(server, args),
        "month_update" => handlers::tool_month_update(server, args),
        "week_update" => handlers::tool_week_update(server, args),
        "week_active" => handlers::tool_week_active(server, args),
        "task_add" => handlers::tool_task_add(server, args),
        "task_toggle" => handlers::tool_task_toggle(server, args),
        "task_list" => handlers::tool_task_list(server, args),
        "day_start" => handlers::tool_day_start(server, args),
        "day_status" => handlers::tool_day_status(server, args),
        "day_complete" => handlers::tool_day_complete(server, args),
        "history_month" => handlers::tool_history_month(server, args),
        "status" => handlers::tool_status(server, args),
        "events_list" => handlers::tool_events_list(server, args),
        "storage" => handlers::tool_storage(server, args),
        _ => return None,
    };
    Some(resp)
}

/// Tools that act on per-user data get the default user filled in by the server;
/// the rest take their arguments as-is.
pub(crate) fn tool_needs_user(name: &str) -> bool {
    !matches!(name, "storage")
}
