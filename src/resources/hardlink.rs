//! Hardlink resource (the `hardlink` action).
use std::path::{Path, PathBuf};

use super::{Applicable, ResourceChange, ResourceError, same_file_reason};
use crate::operations::FileSystemOps;

/// A hardlink at a reference location sharing the canonical file's data.
#[derive(Debug, Clone)]
pub struct HardlinkResource {
    /// The canonical file the link refers to.
    pub original: PathBuf,
    /// Where the link is created.
    pub link: PathBuf,
}

impl HardlinkResource {
    /// Create a new hardlink resource.
    #[must_use]
    pub const fn new(original: PathBuf, link: PathBuf) -> Self {
        Self { original, link }
    }

    fn failed(&self, reason: String) -> ResourceError {
        ResourceError::HardlinkFailed {
            link: self.link.display().to_string(),
            original: self.original.display().to_string(),
            reason,
        }
    }
}

impl Applicable for HardlinkResource {
    fn description(&self) -> String {
        format!("{} => {}", self.link.display(), self.original.display())
    }

    fn target(&self) -> &Path {
        &self.link
    }

    fn apply(&self, fs: &dyn FileSystemOps) -> Result<ResourceChange, ResourceError> {
        // Removing the link path would delete the canonical file.
        if fs.same_path(&self.original, &self.link) {
            return Ok(ResourceChange::Skipped {
                reason: same_file_reason(&self.link),
            });
        }

        if fs.is_file(&self.link) {
            fs.remove_file(&self.link)
                .map_err(|e| self.failed(format!("could not remove existing file: {e}")))?;
        }

        fs.hard_link(&self.original, &self.link)
            .map_err(|e| self.failed(e.to_string()))?;

        if !fs.is_file(&self.link) {
            return Err(self.failed("link not present after creation".to_string()));
        }
        Ok(ResourceChange::Applied)
    }
}
