#![forbid(unsafe_code)]

use super::ai::{ai_error, ai_error_with};
use dl_core::calendar::Day;
use dl_core::ids::UserId;
use serde_json::Value;

pub(crate) fn require_string(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, Value> {
    let Some(v) = args.get(key).and_then(|v| v.as_str()) else {
        return Err(ai_error("INVALID_INPUT", &format!("{key} is required")));
    };
    Ok(v.to_string())
}

pub(crate) fn optional_string(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string"),
        )),
    }
}

pub(crate) fn optional_i64(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<i64>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ai_error("INVALID_INPUT", &format!("{key} must be an integer"))),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be an integer"),
        )),
    }
}

pub(crate) fn optional_usize(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<usize>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_u64().map(|v| v as usize).map(Some).ok_or_else(|| {
            ai_error(
                "INVALID_INPUT",
                &format!("{key} must be a positive integer"),
            )
        }),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a positive integer"),
        )),
    }
}

pub(crate) fn optional_bool(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<bool>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Bool(v) => Ok(Some(*v)),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a boolean"),
        )),
    }
}

pub(crate) fn optional_string_array(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<String>>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    let Some(arr) = value.as_array() else {
        return Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be an array of strings"),
        ));
    };
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        let Some(s) = item.as_str() else {
            return Err(ai_error(
                "INVALID_INPUT",
                &format!("{key} must be an array of strings"),
            ));
        };
        out.push(s.to_string());
    }
    Ok(Some(out))
}

/// Every per-user tool funnels through this: the id is validated here once, so
/// handlers downstream can assume it is well formed.
pub(crate) fn require_user(args: &serde_json::Map<String, Value>) -> Result<UserId, Value> {
    let Some(raw) = args.get("user").and_then(|v| v.as_str()) else {
        return Err(ai_error_with(
            "INVALID_INPUT",
            "user is required",
            Some("Pass user explicitly or start the server with --user <id>."),
        ));
    };
    UserId::try_new(raw.trim())
        .map_err(|err| ai_error("INVALID_INPUT", &format!("user: {}", err.message())))
}

pub(crate) fn optional_day(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<Day>, Value> {
    let Some(raw) = optional_string(args, key)? else {
        return Ok(None);
    };
    match Day::parse(raw.trim()) {
        Ok(day) => Ok(Some(day)),
        Err(err) => Err(ai_error_with(
            "INVALID_INPUT",
            &format!("{key}: {}", err.message()),
            Some("Use a calendar date like 2025-03-04."),
        )),
    }
}
