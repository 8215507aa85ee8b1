//! Filesystem locations inside the Zellij plugin sandbox.
//!
//! The host filesystem is mounted under `/host`, which usually maps to the
//! directory Zellij was started from (typically the home directory).

use std::path::PathBuf;

const HOST_ROOT: &str = "/host";

/// Directory holding the preference file and trace output:
/// `/host/.local/share/zellij/votefeed`.
#[must_use]
pub fn data_dir() -> PathBuf {
    PathBuf::from(HOST_ROOT).join(".local/share/zellij").join("votefeed")
}

#[must_use]
pub fn preferences_file() -> PathBuf {
    data_dir().join("preferences.json")
}

#[must_use]
pub fn trace_file() -> PathBuf {
    data_dir().join("votefeed-spans.jsonl")
}

/// Maps `~` and `~/…` onto the sandbox host root; other paths pass through.
///
/// ```
/// use votefeed::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/mine.toml"), "/host/themes/mine.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/votefeed.toml"), "/etc/votefeed.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    match path.strip_prefix('~') {
        Some("") => HOST_ROOT.to_string(),
        Some(rest) if rest.starts_with('/') => format!("{HOST_ROOT}{rest}"),
        _ => path.to_string(),
    }
}
