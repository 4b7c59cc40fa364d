#![forbid(unsafe_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// A tiny "what happened last session" record, rewritten in place on every note.
///
/// stdout is the protocol stream and stderr may be swallowed by MCP clients, so
/// the only reliable place to leave transport diagnostics is a file next to the
/// store. One file, bounded fields, overwritten per session.
#[derive(Clone, Debug)]
pub(crate) struct SessionLog {
    path: PathBuf,
    header: String,
    mode: Option<String>,
    first_line: Option<String>,
    last_method: Option<String>,
    last_error: Option<String>,
    exit: Option<String>,
}

impl SessionLog {
    pub(crate) fn new(storage_dir: &Path) -> Self {
        let cwd = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .display()
            .to_string();
        let args: Vec<String> = std::env::args().collect();

        // Fixed per process, so rendered once.
        let mut header = String::new();
        let _ = writeln!(
            header,
            "ts_start={}",
            crate::ts_ms_to_rfc3339(crate::now_ms_i64())
        );
        let _ = writeln!(header, "pid={}", std::process::id());
        let _ = writeln!(header, "build={}", crate::build_fingerprint());
        let _ = writeln!(header, "cwd={cwd}");
        let _ = writeln!(header, "args={args:?}");

        let log = Self {
            path: storage_dir.join("dayloop_mcp_last_session.txt"),
            header,
            mode: None,
            first_line: None,
            last_method: None,
            last_error: None,
            exit: None,
        };
        log.flush();
        log
    }

    pub(crate) fn note_mode(&mut self, mode: &str, first_line: &str) {
        self.mode = Some(mode.to_string());
        self.first_line = Some(clip(first_line.trim_end(), 256));
        self.flush();
    }

    pub(crate) fn note_method(&mut self, method: &str) {
        let method = method.trim();
        if !method.is_empty() {
            self.last_method = Some(clip(method, 96));
            self.flush();
        }
    }

    pub(crate) fn note_error(&mut self, error: &str) {
        let error = error.trim();
        if !error.is_empty() {
            self.last_error = Some(clip(error, 320));
            self.flush();
        }
    }

    pub(crate) fn note_exit(&mut self, reason: &str) {
        self.exit = Some(clip(reason.trim(), 128));
        self.flush();
    }

    fn flush(&self) {
        let Some(dir) = self.path.parent() else {
            return;
        };
        let _ = std::fs::create_dir_all(dir);

        let mut out = self.header.clone();
        let slots = [
            ("mode", &self.mode),
            ("first_line", &self.first_line),
            ("last_method", &self.last_method),
            ("last_error", &self.last_error),
            ("exit", &self.exit),
        ];
        for (key, slot) in slots {
            if let Some(value) = slot {
                let _ = writeln!(out, "{key}={value}");
            }
        }

        let _ = std::fs::write(&self.path, out);
    }
}

fn clip(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value.to_string(),
    }
}
