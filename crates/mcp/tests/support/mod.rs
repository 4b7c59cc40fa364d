#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// One spawned dl_mcp process talking newline-delimited JSON over its stdio.
pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        Self::start_with_args(test_name, &[])
    }

    pub(crate) fn start_with_args(test_name: &str, extra_args: &[&str]) -> Self {
        let storage_dir = temp_dir(test_name);

        let mut child = Command::new(env!("CARGO_BIN_EXE_dl_mcp"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .args(extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .expect("spawn dl_mcp");

        let stdin = child.stdin.take().expect("child stdin");
        let stdout = BufReader::new(child.stdout.take().expect("child stdout"));

        Self {
            child,
            stdin,
            stdout,
            storage_dir,
        }
    }

    pub(crate) fn start_initialized(test_name: &str) -> Self {
        Self::start_initialized_with_args(test_name, &[])
    }

    pub(crate) fn start_initialized_with_args(test_name: &str, extra_args: &[&str]) -> Self {
        let mut server = Self::start_with_args(test_name, extra_args);
        server.initialize_default();
        server
    }

    pub(crate) fn send(&mut self, req: Value) {
        self.send_raw_line(&req.to_string());
    }

    pub(crate) fn send_raw_line(&mut self, raw: &str) {
        writeln!(self.stdin, "{raw}").expect("write to child stdin");
        self.stdin.flush().expect("flush child stdin");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout
            .read_line(&mut line)
            .expect("read from child stdout");
        assert!(!line.trim().is_empty(), "server closed the stream early");
        serde_json::from_str(&line).expect("response line is JSON")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "dayloop-tests", "version": "0.0" }
            }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    /// tools/call with the envelope already unwrapped.
    pub(crate) fn call_tool(&mut self, id: i64, name: &str, args: Value) -> Value {
        let resp = self.request(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": name, "arguments": args }
        }));
        extract_tool_text(&resp)
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.storage_dir);
    }
}

fn temp_dir(test_name: &str) -> PathBuf {
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "dl_mcp_{test_name}_{}_{nonce}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create temp storage dir");
    dir
}

/// Pull the tool envelope back out of an MCP text-content response.
pub(crate) fn extract_tool_text(resp: &Value) -> Value {
    let text = resp
        .pointer("/result/content/0/text")
        .and_then(Value::as_str)
        .expect("result.content[0].text");
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

pub(crate) fn assert_json_rpc_error(resp: &Value, expected_code: i64) {
    let code = resp
        .pointer("/error/code")
        .and_then(Value::as_i64)
        .expect("error.code");
    assert_eq!(code, expected_code, "response: {resp}");
}

pub(crate) fn assert_tool_ok(payload: &Value) {
    assert_eq!(
        payload.get("success").and_then(Value::as_bool),
        Some(true),
        "expected a successful envelope, got: {payload}"
    );
}

pub(crate) fn assert_tool_error(payload: &Value, expected_code: &str) {
    assert_eq!(
        payload.get("success").and_then(Value::as_bool),
        Some(false),
        "expected a failed envelope, got: {payload}"
    );
    let code = payload
        .pointer("/error/code")
        .and_then(Value::as_str)
        .expect("error.code");
    assert_eq!(code, expected_code, "payload: {payload}");
}
