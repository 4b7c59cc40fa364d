#![forbid(unsafe_code)]

use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Decoded JSON-RPC 2.0 request. Notifications carry no `id` (or an explicit
/// null); the dispatcher checks that before deciding whether to answer.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    pub(crate) method: String,
    #[serde(default)]
    pub(crate) id: Option<Value>,
    #[serde(default)]
    pub(crate) params: Option<Value>,
}

fn rpc_frame(id: Option<Value>, key: &str, body: Value) -> Value {
    let mut frame = Map::new();
    frame.insert("jsonrpc".to_string(), Value::String("2.0".to_string()));
    frame.insert("id".to_string(), id.unwrap_or(Value::Null));
    frame.insert(key.to_string(), body);
    Value::Object(frame)
}

pub(crate) fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    rpc_frame(id, "result", result)
}

pub(crate) fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    rpc_frame(id, "error", json!({ "code": code, "message": message }))
}

/// Tool results travel as MCP text content holding the pretty-printed envelope.
pub(crate) fn tool_text_content(payload: &Value) -> Value {
    let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());
    json!({ "type": "text", "text": text })
}
