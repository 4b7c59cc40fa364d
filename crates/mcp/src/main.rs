#![forbid(unsafe_code)]

mod entry;
mod handlers;
mod server;
mod support;
mod tools;

pub(crate) use support::*;

use dl_storage::SqliteStore;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

// Protocol baseline: some MCP clients are strict about the server echoing a protocol
// version they recognize, so we keep the widely deployed one and reflect the client's
// own version back during initialize.
pub(crate) const MCP_VERSION: &str = "2024-11-05";
pub(crate) const SERVER_NAME: &str = "dayloop-mcp";
pub(crate) const SERVER_VERSION: &str = "0.1.0";

pub(crate) struct McpServer {
    initialized: bool,
    store: SqliteStore,
    default_user: Option<String>,
    user_lock: bool,
}

pub(crate) struct McpServerConfig {
    default_user: Option<String>,
    user_lock: bool,
}

fn write_last_crash(storage_dir: &Path, kind: &str, detail: &str) {
    // Best-effort: a crash report must never itself take the process down.
    let _ = std::fs::create_dir_all(storage_dir);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let args = std::env::args().collect::<Vec<_>>();
    let fields = [
        ("ts", ts_ms_to_rfc3339(now_ms_i64())),
        ("pid", std::process::id().to_string()),
        ("kind", kind.to_string()),
        ("build", build_fingerprint()),
        ("cwd", cwd.display().to_string()),
        ("args", format!("{args:?}")),
        ("detail", detail.to_string()),
    ];

    let mut out = String::new();
    for (key, value) in fields {
        let _ = writeln!(out, "{key}={value}");
    }
    let _ = std::fs::write(storage_dir.join("dayloop_mcp_last_crash.txt"), out);
}

fn install_crash_reporter(storage_dir: PathBuf) {
    // Panics must not vanish into a closed stderr: MCP clients typically swallow it.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let mut detail = info.to_string();
        let backtrace = std::backtrace::Backtrace::force_capture();
        let _ = write!(&mut detail, "\nbacktrace:\n{backtrace}");
        write_last_crash(&storage_dir, "panic", &detail);
        default_hook(info);
    }));
}

fn usage() -> &'static str {
    "dl_mcp - dayloop MCP server (stdio)\n\
\n\
USAGE:\n\
  dl_mcp [--storage-dir DIR] [--user ID] [--user-lock]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and build info and exit\n\
\n\
OPTIONS:\n\
  --storage-dir DIR   Where the SQLite store lives (default: <repo>/.dayloop)\n\
  --user ID           Fill this user into tool calls that omit one\n\
  --user-lock         Reject tool calls naming any other user\n\
\n\
Environment equivalents: DAYLOOP_STORAGE_DIR, DAYLOOP_USER, DAYLOOP_USER_LOCK.\n"
}

fn version_line() -> String {
    format!("dl_mcp {SERVER_VERSION} build={}", build_fingerprint())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    let has_flag = |short: &str, long: &str| {
        args.iter().any(|arg| arg == short || arg == long)
    };
    if has_flag("-h", "--help") {
        print!("{}", usage());
        return Ok(());
    }
    if has_flag("-V", "--version") {
        println!("{}", version_line());
        return Ok(());
    }

    let storage_dir = parse_storage_dir();
    install_crash_reporter(storage_dir.clone());
    let mut session_log = SessionLog::new(&storage_dir);
    let storage_dir_for_errors = storage_dir.clone();

    let default_user = match parse_default_user() {
        Some(raw) => match dl_core::ids::UserId::try_new(raw) {
            Ok(user) => Some(user.as_str().to_string()),
            Err(err) => return Err(format!("--user: {}", err.message()).into()),
        },
        None => None,
    };
    let user_lock = parse_user_lock();
    if user_lock && default_user.is_none() {
        return Err("--user-lock requires --user (or DAYLOOP_USER)".into());
    }

    let store = SqliteStore::open(&storage_dir)?;
    let mut server = McpServer::new(
        store,
        McpServerConfig {
            default_user,
            user_lock,
        },
    );

    let result = entry::run_stdio(&mut server, &mut session_log);
    if let Err(err) = &result {
        session_log.note_error(&format!("{err}"));
        write_last_crash(&storage_dir_for_errors, "transport-error", &format!("{err}"));
    }
    result
}
