//! Filesystem primitives behind a trait for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that resources and the executor
//! can be unit-tested without touching the real filesystem. Production code
//! uses [`SystemFileSystemOps`]; tests use `MockFileSystemOps` to inject
//! failures that are awkward to reproduce on disk.

use std::io;
use std::path::Path;

/// Abstraction over the filesystem operations used by module actions.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Read the full contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate `path` and write `contents` to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Copy the bytes of `from` into `to`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or the copy fails.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a hardlink at `link` that refers to the same file as `original`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn hard_link(&self, original: &Path, link: &Path) -> io::Result<()>;

    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Returns `true` when `a` and `b` resolve to the same location.
    ///
    /// Paths that do not exist never compare equal.
    fn same_path(&self, a: &Path, b: &Path) -> bool;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::copy(from, to).map(|_| ())
    }

    fn hard_link(&self, original: &Path, link: &Path) -> io::Result<()> {
        std::fs::hard_link(original, link)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn same_path(&self, a: &Path, b: &Path) -> bool {
        match (dunce::canonicalize(a), dunce::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Holds an in-memory file table and can be told to fail specific
/// operations on specific paths.
///
/// # Example
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_file("lib/foo.h", b"int foo();")
///     .failing_write("src/foo.h");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, Vec<u8>>>,
    failing_writes: Vec<std::path::PathBuf>,
    failing_copies: Vec<std::path::PathBuf>,
    failing_links: Vec<std::path::PathBuf>,
    /// Links whose creation "succeeds" but leaves nothing behind.
    vanishing_links: Vec<std::path::PathBuf>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given contents.
    #[must_use]
    pub fn with_file(self, path: impl Into<std::path::PathBuf>, contents: &[u8]) -> Self {
        self.files
            .lock()
            .expect("mock files poisoned")
            .insert(path.into(), contents.to_vec());
        self
    }

    /// Make every write to `path` fail.
    #[must_use]
    pub fn failing_write(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.failing_writes.push(path.into());
        self
    }

    /// Make every copy into `path` fail.
    #[must_use]
    pub fn failing_copy(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.failing_copies.push(path.into());
        self
    }

    /// Make every hardlink creation at `path` fail.
    #[must_use]
    pub fn failing_link(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.failing_links.push(path.into());
        self
    }

    /// Make hardlink creation at `path` report success without creating it.
    #[must_use]
    pub fn vanishing_link(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.vanishing_links.push(path.into());
        self
    }

    /// Return the current contents of `path`, if present.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files
            .lock()
            .expect("mock files poisoned")
            .get(path)
            .cloned()
    }

    fn denied() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "mock: denied")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn is_file(&self, path: &Path) -> bool {
        self.contents(path).is_some()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.contents(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.failing_writes.iter().any(|p| p == path) {
            return Err(Self::denied());
        }
        self.files
            .lock()
            .expect("mock files poisoned")
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.failing_copies.iter().any(|p| p == to) {
            return Err(Self::denied());
        }
        let data = self.read(from)?;
        self.files
            .lock()
            .expect("mock files poisoned")
            .insert(to.to_path_buf(), data);
        Ok(())
    }

    fn hard_link(&self, original: &Path, link: &Path) -> io::Result<()> {
        if self.failing_links.iter().any(|p| p == link) {
            return Err(Self::denied());
        }
        if self.vanishing_links.iter().any(|p| p == link) {
            return Ok(());
        }
        self.copy(original, link)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.files
            .lock()
            .expect("mock files poisoned")
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn same_path(&self, a: &Path, b: &Path) -> bool {
        a == b && self.is_file(a)
    }
}
