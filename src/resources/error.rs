//! Typed error variants for resource operations.
//!
//! Resource code returns these variants directly; the executor records them
//! as per-file outcomes instead of propagating them.

use thiserror::Error;

/// Errors that arise while placing a module file at its reference location.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The reference file could not be created or written (make action).
    #[error("could not create reference file {path}: {source}")]
    DestinationCreateFailed {
        /// Reference file that could not be created.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Copying the canonical file failed (release action).
    #[error("could not release {from} to {to}: {source}")]
    CopyFailed {
        /// Canonical file being copied.
        from: String,
        /// Destination reference file.
        to: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Creating the hardlink failed or left no file behind (hardlink action).
    #[error("could not hardlink {link} to {original}: {reason}")]
    HardlinkFailed {
        /// Reference path where the link should appear.
        link: String,
        /// Canonical file the link should refer to.
        original: String,
        /// Human-readable explanation.
        reason: String,
    },
}

impl ResourceError {
    /// Returns `true` if this failure abandons the remaining extensions of
    /// the module being processed.
    #[must_use]
    pub const fn aborts_module(&self) -> bool {
        matches!(self, Self::DestinationCreateFailed { .. })
    }

    /// Stable short name of the failure kind, used in reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DestinationCreateFailed { .. } => "destination_create_failed",
            Self::CopyFailed { .. } => "copy_failed",
            Self::HardlinkFailed { .. } => "hardlink_failed",
        }
    }
}
