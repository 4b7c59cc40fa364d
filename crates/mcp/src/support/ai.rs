#![forbid(unsafe_code)]

use dl_storage::StoreError;
use serde_json::{Value, json};

pub(crate) fn format_store_error(err: StoreError) -> String {
    match err {
        StoreError::Io(e) => format!("IO: {e}"),
        StoreError::Sql(e) => format!("SQL: {e}"),
        StoreError::InvalidInput(msg) => format!("Invalid input: {msg}"),
        StoreError::NoActiveGoal => "No active weekly goal".to_string(),
    }
}

fn envelope(
    success: bool,
    intent: &str,
    result: Value,
    warnings: Vec<Value>,
    error: Value,
) -> Value {
    json!({
        "success": success,
        "intent": intent,
        "result": result,
        "warnings": warnings,
        "error": error
    })
}

pub(crate) fn warning(code: &str, message: &str, recovery: &str) -> Value {
    json!({ "code": code, "message": message, "recovery": recovery })
}

pub(crate) fn ai_ok_with_warnings(intent: &str, result: Value, warnings: Vec<Value>) -> Value {
    envelope(true, intent, result, warnings, Value::Null)
}

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    envelope(true, intent, result, Vec::new(), Value::Null)
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None)
}

pub(crate) fn ai_error_with(code: &str, message: &str, recovery: Option<&str>) -> Value {
    let mut detail = json!({ "code": code, "message": message.trim() });
    if let Some(recovery) = recovery
        && let Some(fields) = detail.as_object_mut()
    {
        fields.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }
    envelope(false, "error", json!({}), Vec::new(), detail)
}
