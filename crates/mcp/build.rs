#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

// Embeds the current git commit (short form) into the binary so `--version` and the
// session/crash records can identify the exact build. Missing git is fine: the env
// var is simply absent and the fingerprint falls back to version+profile.
fn main() {
    let manifest_dir =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    if let Some(sha) = head_commit(&manifest_dir) {
        let short = sha.chars().take(12).collect::<String>();
        println!("cargo:rustc-env=DAYLOOP_GIT_SHA={short}");
    }
}

fn head_commit(start: &Path) -> Option<String> {
    let git_dir = locate_git_dir(start)?;

    let head_path = git_dir.join("HEAD");
    println!("cargo:rerun-if-changed={}", head_path.display());
    let head = fs::read_to_string(&head_path).ok()?;
    let head = head.trim();

    match head.strip_prefix("ref:") {
        Some(ref_name) => resolve_ref(&git_dir, ref_name.trim()),
        None if head.is_empty() => None,
        // Detached HEAD holds the sha directly.
        None => Some(head.to_string()),
    }
}

fn locate_git_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let dot_git = current.join(".git");
        if dot_git.is_dir() {
            return Some(dot_git);
        }
        if dot_git.is_file() {
            // Worktrees store a pointer file instead of a directory.
            let text = fs::read_to_string(&dot_git).ok()?;
            let first = text.lines().next().unwrap_or("").trim();
            return first
                .strip_prefix("gitdir:")
                .map(|path| current.join(path.trim()));
        }
        current = current.parent()?;
    }
}

fn resolve_ref(git_dir: &Path, ref_name: &str) -> Option<String> {
    let loose = git_dir.join(ref_name);
    if loose.exists() {
        println!("cargo:rerun-if-changed={}", loose.display());
        if let Ok(text) = fs::read_to_string(&loose) {
            let sha = text.trim();
            if !sha.is_empty() {
                return Some(sha.to_string());
            }
        }
    }

    // Refs disappear from loose storage after `git gc`; fall back to packed-refs.
    let packed = git_dir.join("packed-refs");
    if !packed.exists() {
        return None;
    }
    println!("cargo:rerun-if-changed={}", packed.display());
    let text = fs::read_to_string(&packed).ok()?;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('^') {
            continue;
        }
        if let Some((sha, name)) = line.split_once(' ')
            && name == ref_name
            && !sha.trim().is_empty()
        {
            return Some(sha.trim().to_string());
        }
    }
    None
}
