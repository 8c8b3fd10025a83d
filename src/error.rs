//! Domain-specific error types for the module distribution engine.
//!
//! Internal modules return typed errors while the command layer converts
//! them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError    : module file cannot be opened or read (fatal)
//! ConfigWarning  : non-fatal parse conditions, counted as warnings
//! PathError      : relative-distance computation failures
//! ResourceError  : per-file action failures (re-exported from resources)
//! ```

use thiserror::Error;

pub use crate::resources::error::ResourceError;

/// Errors that arise while loading the module configuration file.
///
/// These are the only conditions that abort a run before any action executes.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The module file does not exist.
    #[error("module file not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The module file exists but could not be read.
    #[error("IO error reading module file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Classify an I/O error raised while opening `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let path = path.display().to_string();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Non-fatal conditions found while parsing the module file.
///
/// Each one is logged and counted as a warning; the offending directive is
/// dropped and parsing continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A `module` directive appeared before both `path` and `reference`.
    #[error("module '{module}' encountered but no path and reference were previously defined")]
    ModuleWithoutContext {
        /// Name of the rejected module.
        module: String,
    },

    /// A `module` directive had no name.
    #[error("module directive without a module name")]
    EmptyModuleName,

    /// The same module was listed twice for one path/reference pair.
    #[error("module '{module}' is already listed for path '{path}' and reference '{reference}'")]
    DuplicateModule {
        /// Canonical path key.
        path: String,
        /// Reference path key.
        reference: String,
        /// Repeated module name.
        module: String,
    },
}

/// Errors from relative path computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The reference path starts by ascending (`..`), which would need a
    /// mixed ascend/descend distance.
    #[error(
        "unsupported path distance: reference '{reference}' ascends above the working root, \
         cannot reach '{canonical}' relatively"
    )]
    UnsupportedDistance {
        /// Canonical path as given.
        canonical: String,
        /// Reference path as given.
        reference: String,
    },
}
