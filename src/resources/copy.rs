//! Binary copy resource (the `release` action).
use std::path::{Path, PathBuf};

use super::{Applicable, ResourceChange, ResourceError, same_file_reason};
use crate::operations::FileSystemOps;

/// A byte-identical copy of a canonical file at a reference location.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// The canonical file.
    pub source: PathBuf,
    /// Where the copy is placed.
    pub destination: PathBuf,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub const fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
        }
    }

    fn copy_failed(&self, source: std::io::Error) -> ResourceError {
        ResourceError::CopyFailed {
            from: self.source.display().to_string(),
            to: self.destination.display().to_string(),
            source,
        }
    }
}

impl Applicable for CopyResource {
    fn description(&self) -> String {
        format!(
            "{} -> {}",
            self.source.display(),
            self.destination.display()
        )
    }

    fn target(&self) -> &Path {
        &self.destination
    }

    fn apply(&self, fs: &dyn FileSystemOps) -> Result<ResourceChange, ResourceError> {
        if fs.same_path(&self.source, &self.destination) {
            return Ok(ResourceChange::Skipped {
                reason: same_file_reason(&self.destination),
            });
        }

        if fs.is_file(&self.destination) {
            let wanted = fs.read(&self.source).map_err(|e| self.copy_failed(e))?;
            if fs
                .read(&self.destination)
                .is_ok_and(|existing| existing == wanted)
            {
                return Ok(ResourceChange::AlreadyCorrect);
            }
        }

        // Copying onto a hardlink would write through to whatever it shares
        // data with.
        if fs.is_file(&self.destination) {
            fs.remove_file(&self.destination)
                .map_err(|e| self.copy_failed(e))?;
        }
        fs.copy(&self.source, &self.destination)
            .map_err(|e| self.copy_failed(e))?;
        Ok(ResourceChange::Applied)
    }
}
