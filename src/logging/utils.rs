//! Log file location, ANSI stripping and timestamps.
use std::fs;
use std::path::PathBuf;

/// Directory name under the user cache directory.
const CACHE_SUBDIR: &str = "libdist";

/// Remove terminal escape sequences so file logs stay plain text.
///
/// A CSI sequence (`ESC [`) runs until its final byte in `@`..=`~`. Any
/// other escape drops only the byte after `ESC`.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            chars
                .by_ref()
                .find(|inner| ('@'..='~').contains(inner));
        }
    }
    out
}

/// Resolve the cache root from environment lookups.
///
/// `XDG_CACHE_HOME` wins; otherwise `HOME` (or `USERPROFILE`) plus `.cache`;
/// otherwise `./.cache`.
fn cache_root(var: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(xdg) = var("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    var("HOME")
        .or_else(|| var("USERPROFILE"))
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".cache")
}

/// The per-user `libdist` cache directory, created on demand.
pub(super) fn libdist_cache_dir() -> Option<PathBuf> {
    let dir = cache_root(|name| std::env::var(name).ok()).join(CACHE_SUBDIR);
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file for one invocation of `command`, e.g. `~/.cache/libdist/make.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    libdist_cache_dir().map(|dir| dir.join(format!("{command}.log")))
}

fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// Current UTC time as `YYYY-MM-DD HH:MM:SS`, used in the file header.
pub(super) fn format_utc_datetime() -> String {
    utc_now("%Y-%m-%d %H:%M:%S")
}

/// Current UTC time as `HH:MM:SS`, used per log line.
pub(super) fn format_utc_time() -> String {
    utc_now("%H:%M:%S")
}
