#![forbid(unsafe_code)]

use std::path::PathBuf;

// Zero-config launch support: when the binary is started with no flags and no
// DAYLOOP_* environment (the typical MCP client config), the store lands in a
// repo-local dot directory so each project keeps its own habit data.
fn auto_mode_enabled() -> bool {
    let configured = std::env::args().len() > 1
        || ["DAYLOOP_STORAGE_DIR", "DAYLOOP_USER", "DAYLOOP_USER_LOCK"]
            .iter()
            .any(|key| std::env::var_os(key).is_some());
    !configured
}

fn repo_root_or_cwd() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut probe = cwd.as_path();
    loop {
        if probe.join(".git").exists() {
            return probe.to_path_buf();
        }
        match probe.parent() {
            Some(parent) => probe = parent,
            None => return cwd.clone(),
        }
    }
}

fn flag_value(name: &str) -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == name {
            return args.next();
        }
    }
    None
}

fn flag_present(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}

fn env_truthy(key: &str) -> bool {
    std::env::var(key).is_ok_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

pub(crate) fn parse_storage_dir() -> PathBuf {
    if let Some(dir) = flag_value("--storage-dir") {
        return PathBuf::from(dir);
    }
    if let Some(dir) = std::env::var_os("DAYLOOP_STORAGE_DIR") {
        return PathBuf::from(dir);
    }
    if auto_mode_enabled() {
        return repo_root_or_cwd().join(".dayloop");
    }
    PathBuf::from(".dayloop")
}

pub(crate) fn parse_default_user() -> Option<String> {
    let raw = flag_value("--user").or_else(|| std::env::var("DAYLOOP_USER").ok())?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn parse_user_lock() -> bool {
    flag_present("--user-lock") || env_truthy("DAYLOOP_USER_LOCK")
}
