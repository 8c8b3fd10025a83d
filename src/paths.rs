//! Path string utilities: separator normalization, absolute-path detection,
//! and the relative distance between a reference location and a canonical
//! path.
//!
//! Paths are handled as plain strings because they are copied verbatim into
//! generated include directives. Both `\` and `/` count as separators on
//! input; when a separator has to be generated, the one already used by the
//! path is reused so Windows-style configurations round-trip unchanged.
use std::path::{MAIN_SEPARATOR, PathBuf};

use crate::error::PathError;

/// Component that ascends one directory level.
pub const PARENT_DIR: &str = "..";

/// Returns `true` for either path separator.
#[must_use]
pub const fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

/// First separator used in `path`, if any.
fn first_separator(path: &str) -> Option<char> {
    path.chars().find(|&c| is_separator(c))
}

/// Separator to use when extending `path`: its own, else the platform one.
#[must_use]
pub fn separator_of(path: &str) -> char {
    first_separator(path).unwrap_or(MAIN_SEPARATOR)
}

/// Append a separator to `path` unless it is empty or already ends with one.
///
/// # Examples
///
/// ```
/// use libdist::paths::normalize;
///
/// assert_eq!(normalize("lib\\core"), "lib\\core\\");
/// assert_eq!(normalize("lib\\core\\"), "lib\\core\\");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    if path.is_empty() || path.ends_with(is_separator) {
        return path.to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    out.push_str(path);
    out.push(separator_of(path));
    out
}

/// Strip trailing separators for use as a map key.
///
/// A bare root (`\`, `/`) or drive root (`C:\`) is returned unchanged since
/// stripping would change its meaning.
#[must_use]
pub fn strip_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() || trimmed.ends_with(':') {
        path
    } else {
        trimmed
    }
}

/// Returns `true` for drive-rooted (`C:\`) or separator-rooted (`\foo`) paths.
///
/// # Examples
///
/// ```
/// use libdist::paths::is_absolute;
///
/// assert!(is_absolute("C:\\foo"));
/// assert!(is_absolute("\\foo"));
/// assert!(!is_absolute("foo\\bar"));
/// ```
#[must_use]
pub fn is_absolute(path: &str) -> bool {
    if path.starts_with(is_separator) {
        return true;
    }
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(drive), Some(':'), Some(sep)) if drive.is_ascii_alphabetic() && is_separator(sep)
    )
}

/// Rewrite every separator in `path` to the platform separator.
///
/// Used when a configuration path is handed to the filesystem; the strings
/// written into generated includes keep their original separators.
#[must_use]
pub fn to_native(path: &str) -> PathBuf {
    path.chars()
        .map(|c| if is_separator(c) { MAIN_SEPARATOR } else { c })
        .collect::<String>()
        .into()
}

/// Remove one leading current-directory marker (`.\` or `./`).
fn strip_current_dir(path: &str) -> &str {
    path.strip_prefix('.')
        .and_then(|rest| rest.strip_prefix(is_separator))
        .unwrap_or(path)
}

/// Returns `true` when the first component of `path` is `..`.
fn ascends(path: &str) -> bool {
    path.strip_prefix(PARENT_DIR)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(is_separator))
}

/// Compute the path that reaches `canonical` from a file placed in `reference`.
///
/// Both inputs are taken relative to the same working root. An absolute
/// canonical path is returned as-is. Otherwise the reference path's
/// separator count is the number of levels to ascend before descending into
/// `canonical`.
///
/// # Examples
///
/// ```
/// use libdist::paths::relative_distance;
///
/// assert_eq!(
///     relative_distance("lib\\core\\", "src\\app\\").unwrap(),
///     "..\\..\\lib\\core\\"
/// );
/// assert_eq!(
///     relative_distance("C:\\abs\\path\\", "src\\app\\").unwrap(),
///     "C:\\abs\\path\\"
/// );
/// ```
///
/// # Errors
///
/// Returns [`PathError::UnsupportedDistance`] when `reference` itself starts
/// by ascending, since reaching `canonical` would then require knowing the
/// names of the directories above the working root.
pub fn relative_distance(canonical: &str, reference: &str) -> Result<String, PathError> {
    let canonical_norm = normalize(canonical);
    let reference_norm = normalize(reference);
    let canonical_norm = strip_current_dir(&canonical_norm);
    let reference_norm = strip_current_dir(&reference_norm);

    if is_absolute(canonical_norm) {
        return Ok(canonical_norm.to_string());
    }

    if ascends(reference_norm) {
        return Err(PathError::UnsupportedDistance {
            canonical: canonical.to_string(),
            reference: reference.to_string(),
        });
    }

    let depth = reference_norm.chars().filter(|&c| is_separator(c)).count();
    let sep = first_separator(reference_norm)
        .or_else(|| first_separator(canonical_norm))
        .unwrap_or(MAIN_SEPARATOR);

    let mut fixed = String::with_capacity(depth * 3 + canonical_norm.len());
    for _ in 0..depth {
        fixed.push_str(PARENT_DIR);
        fixed.push(sep);
    }
    fixed.push_str(canonical_norm);
    Ok(fixed)
}
