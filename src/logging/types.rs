//! The [`Log`] trait and the tracing targets that carry message kinds.

/// Target for section headers.
pub const STAGE_TARGET: &str = "libdist::stage";
/// Target for completed actions, rendered with the `[>]` tag.
pub const SUCCESS_TARGET: &str = "libdist::success";
/// Target for verbose-only warnings, rendered with the `[!]` tag.
pub const NOTICE_TARGET: &str = "libdist::notice";
/// Target for dry-run previews.
pub const DRY_RUN_TARGET: &str = "libdist::dry_run";

/// Abstraction over logging backends.
///
/// Both [`Logger`](super::logger::Logger) (direct output) and
/// [`BufferedLog`](super::buffered::BufferedLog) (deferred output for
/// parallel execution) implement this trait, so executor code logs without
/// knowing whether output is immediate or buffered.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message (`[i]`).
    fn info(&self, msg: &str);
    /// Log a completed action (`[>]`).
    fn success(&self, msg: &str);
    /// Log a warning that is only shown on the console in verbose mode.
    fn notice(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message (`[!]`).
    fn warn(&self, msg: &str);
    /// Log an error message (`[!]`).
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
}

impl std::fmt::Debug for dyn Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Log")
    }
}
