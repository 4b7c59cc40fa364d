#![forbid(unsafe_code)]

pub(crate) fn build_profile_label() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

pub(crate) fn build_git_sha() -> Option<&'static str> {
    match option_env!("DAYLOOP_GIT_SHA").map(str::trim) {
        Some("") | None => None,
        Some(sha) => Some(sha),
    }
}

/// Compact build identifier for `--version`, `status`, and the session/crash records.
///
/// Shaped as semver build metadata (`+<id>(.<id>)*`, ids `[0-9A-Za-z-]+`) so it
/// stays parseable next to the plain version: `0.1.0+git.<sha>.<profile>`.
pub(crate) fn build_fingerprint() -> String {
    let version = crate::SERVER_VERSION;
    let profile = build_profile_label();
    match build_git_sha() {
        Some(sha) => format!("{version}+git.{sha}.{profile}"),
        None => format!("{version}+{profile}"),
    }
}
