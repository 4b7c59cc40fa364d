#![forbid(unsafe_code)]

use crate::{McpServer, McpServerConfig};
use serde_json::{Value, json};

impl McpServer {
    pub(crate) fn new(store: dl_storage::SqliteStore, config: McpServerConfig) -> Self {
        Self {
            initialized: false,
            store,
            default_user: config.default_user,
            user_lock: config.user_lock,
        }
    }

    pub(crate) fn handle(&mut self, request: crate::JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();
        let expects_response = !matches!(request.id.as_ref(), None | Some(Value::Null));

        if method == "initialize" {
            // Some clients are strict about the server echoing the chosen protocol version.
            // Accept the client's declared version and reflect it back (fallback to our
            // baseline when absent).
            let protocol_version = request
                .params
                .as_ref()
                .and_then(|v| v.get("protocolVersion"))
                .and_then(|v| v.as_str())
                .unwrap_or(crate::MCP_VERSION);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": protocol_version,
                    "serverInfo": {
                        "name": crate::SERVER_NAME,
                        "version": crate::build_fingerprint()
                    },
                    // Advertise the optional surfaces we implement as deterministic, empty
                    // stubs. Some clients probe these by default and may treat "method not
                    // found" as a hard failure.
                    "capabilities": {
                        "tools": {},
                        "resources": {},
                        "prompts": {},
                        "logging": {}
                    }
                }),
            ));
        }

        // Client compatibility:
        // - The spec uses `notifications/initialized`.
        // - Some clients send `initialized` as a plain notification.
        // We accept both and never respond (notification).
        if method == "notifications/initialized" || method == "initialized" {
            self.initialized = true;
            return None;
        }

        if !self.initialized {
            // Allow auto-initialization on the first real request. This avoids client
            // startup races that would otherwise yield "Server not initialized".
            if matches!(
                method,
                "tools/call"
                    | "tools/list"
                    | "resources/list"
                    | "resources/read"
                    | "resources/templates/list"
                    | "ping"
            ) {
                self.initialized = true;
            } else if expects_response {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32002,
                    "Server not initialized",
                ));
            } else {
                // Unknown notification before initialization: ignore.
                return None;
            }
        }

        if method == "ping" {
            return Some(crate::json_rpc_response(request.id, json!({})));
        }

        // Optional surfaces that some clients call unconditionally.
        if method == "resources/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "resources": [] }),
            ));
        }
        if method == "resources/templates/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "resourceTemplates": [] }),
            ));
        }
        if method == "resources/read" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "contents": [] }),
            ));
        }
        if method == "prompts/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "prompts": [] }),
            ));
        }
        if method == "prompts/get" {
            return Some(crate::json_rpc_error(request.id, -32602, "Unknown prompt"));
        }
        if method == "logging/setLevel" {
            return Some(crate::json_rpc_response(request.id, json!({})));
        }
        if method == "roots/list" {
            return Some(crate::json_rpc_response(request.id, json!({ "roots": [] })));
        }

        if method == "tools/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "tools": crate::tools::tool_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params) = request.params else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };
            let Some(params_obj) = params.as_object() else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };

            let tool_name = params_obj
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            // Client interop: some clients send `"arguments": null` for empty-args tools.
            // Treat missing/null as `{}` but keep non-object values as-is so tool
            // validators can return a precise INVALID_INPUT error.
            let args = match params_obj.get("arguments") {
                None | Some(Value::Null) => json!({}),
                Some(v) => v.clone(),
            };
            let response_body = self.call_tool(tool_name, args);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "content": [crate::tool_text_content(&response_body)],
                    "isError": !response_body.get("success").and_then(|v| v.as_bool()).unwrap_or(false)
                }),
            ));
        }

        // Notifications (no id / id=null) must not receive a response, even if unknown.
        if !expects_response {
            return None;
        }

        Some(crate::json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        let name = normalize_tool_name(name);

        // A handler panic must come back as a structured error, not kill the transport.
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut args = args;
            if let Some(resp) = self.resolve_user_arg(name, &mut args) {
                return resp;
            }
            crate::tools::dispatch_tool(self, name, args)
                .unwrap_or_else(|| crate::ai_error("UNKNOWN_TOOL", &format!("Unknown tool: {name}")))
        }));

        match result {
            Ok(resp) => resp,
            Err(_) => crate::ai_error(
                "INTERNAL",
                &format!("Internal panic while handling {name}"),
            ),
        }
    }

    /// Fills the configured default user into calls that omit one and enforces
    /// `--user-lock`. Handlers still validate whatever ends up in `user`.
    fn resolve_user_arg(&self, name: &str, args: &mut Value) -> Option<Value> {
        if !crate::tools::tool_needs_user(name) {
            return None;
        }
        let Some(obj) = args.as_object_mut() else {
            // Not an object: let the handler report the shape error.
            return None;
        };

        let requested = obj
            .get("user")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        match (requested, self.default_user.as_deref()) {
            (Some(requested), Some(default)) if self.user_lock && requested != default => {
                Some(crate::ai_error_with(
                    "USER_LOCKED",
                    &format!("this server only acts for user {default}"),
                    Some("Drop the user argument, or start the server without --user-lock."),
                ))
            }
            (None, Some(default)) => {
                obj.insert("user".to_string(), Value::String(default.to_string()));
                None
            }
            _ => None,
        }
    }
}

fn normalize_tool_name(name: &str) -> &str {
    // Client interoperability: some clients include the server namespace in the tool
    // name, e.g. "dayloop/task_add" or "dayloop.task_add" instead of "task_add". The
    // namespace is already established by server selection, so accept those variants.
    let name = name.trim();
    if let Some((_, suffix)) = name.rsplit_once('/') {
        return suffix;
    }
    if let Some((prefix, suffix)) = name.split_once('.')
        && matches!(prefix, "dayloop" | "dl")
    {
        return suffix;
    }
    name
}
