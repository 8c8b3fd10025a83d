//! Per-file module actions (stub, copy, hardlink) behind one interface.
pub mod copy;
pub mod error;
pub mod hardlink;
pub mod stub;

use std::path::Path;

use crate::operations::FileSystemOps;

pub use copy::CopyResource;
pub use error::ResourceError;
pub use hardlink::HardlinkResource;
pub use stub::StubResource;

/// A single file placed at a reference location.
///
/// Implementations describe themselves for logging and carry out their
/// change through a [`FileSystemOps`] so they can be exercised against a
/// mock.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// The file this resource creates or replaces.
    fn target(&self) -> &Path;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns a [`ResourceError`] describing which part of the action
    /// failed. Callers decide whether the failure is fatal for the module.
    fn apply(&self, fs: &dyn FileSystemOps) -> Result<ResourceChange, ResourceError>;
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use libdist::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "same file".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// assert_ne!(noop, skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The target was created or updated.
    Applied,
    /// The target already had the desired content; nothing was written.
    AlreadyCorrect,
    /// The resource was not applied (e.g. the target is the canonical file
    /// itself).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Reason reported when a reference location resolves to its canonical file.
pub(crate) fn same_file_reason(target: &Path) -> String {
    format!(
        "{} is the canonical file itself, refusing to overwrite it",
        target.display()
    )
}
