//! Include-forwarding stub resource (the `make` action).
use std::path::{Path, PathBuf};

use super::{Applicable, ResourceChange, ResourceError, same_file_reason};
use crate::operations::FileSystemOps;

/// First line of every generated stub.
pub const GENERATED_NOTICE: &str =
    "// NOTE: This file is autogenerated by libdist. Do not modify it directly";

/// Render the stub text that forwards to `include_target`.
///
/// # Examples
///
/// ```
/// use libdist::resources::stub::{GENERATED_NOTICE, stub_contents};
///
/// let text = stub_contents("..\\..\\lib\\core\\foo.h");
/// assert!(text.starts_with(GENERATED_NOTICE));
/// assert!(text.ends_with("#include \"..\\..\\lib\\core\\foo.h\"\n"));
/// ```
#[must_use]
pub fn stub_contents(include_target: &str) -> String {
    format!("{GENERATED_NOTICE}\n\n#include \"{include_target}\"\n")
}

/// A stub file at a reference location that includes the canonical file.
#[derive(Debug, Clone)]
pub struct StubResource {
    /// Where the stub is written.
    pub reference_file: PathBuf,
    /// The canonical file the stub stands in for.
    pub canonical_file: PathBuf,
    /// Argument of the generated include directive.
    pub include_target: String,
}

impl StubResource {
    /// Create a new stub resource.
    #[must_use]
    pub const fn new(reference_file: PathBuf, canonical_file: PathBuf, include_target: String) -> Self {
        Self {
            reference_file,
            canonical_file,
            include_target,
        }
    }
}

impl Applicable for StubResource {
    fn description(&self) -> String {
        format!(
            "reference module {} -> {}",
            self.reference_file.display(),
            self.include_target
        )
    }

    fn target(&self) -> &Path {
        &self.reference_file
    }

    fn apply(&self, fs: &dyn FileSystemOps) -> Result<ResourceChange, ResourceError> {
        if fs.same_path(&self.reference_file, &self.canonical_file) {
            return Ok(ResourceChange::Skipped {
                reason: same_file_reason(&self.reference_file),
            });
        }

        let contents = stub_contents(&self.include_target);
        if fs
            .read(&self.reference_file)
            .is_ok_and(|existing| existing == contents.as_bytes())
        {
            return Ok(ResourceChange::AlreadyCorrect);
        }

        let create_failed = |source| ResourceError::DestinationCreateFailed {
            path: self.reference_file.display().to_string(),
            source,
        };
        // A hardlinked reference shares the canonical file's data; unlink it
        // so the stub gets its own file.
        if fs.is_file(&self.reference_file) {
            fs.remove_file(&self.reference_file).map_err(create_failed)?;
        }
        fs.write(&self.reference_file, contents.as_bytes())
            .map_err(create_failed)?;
        Ok(ResourceChange::Applied)
    }
}
