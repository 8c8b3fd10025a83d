//! Module configuration: the grouped module map and its loader.
//!
//! A configuration file lists `path`, `reference` and `module` directives;
//! [`load`] reads one into a [`ModuleMap`] keyed by canonical path, then
//! reference path, holding module names in declaration order.
pub mod parser;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigWarning};
use crate::logging::Log;

pub use parser::parse_str;

/// Canonical path → reference path → module names.
///
/// Keys are stored without trailing separators; module lists keep the order
/// in which the modules were declared and never contain duplicates.
///
/// # Examples
///
/// ```
/// use libdist::config::ModuleMap;
///
/// let mut map = ModuleMap::default();
/// assert!(map.insert("lib\\core", "src\\app", "foo"));
/// assert!(map.insert("lib\\core", "src\\app", "bar"));
/// assert!(!map.insert("lib\\core", "src\\app", "foo"));
/// assert_eq!(map.module_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMap {
    paths: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// All modules sharing one (canonical path, reference path) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceGroup<'a> {
    /// Canonical directory holding the authoritative files.
    pub path: &'a str,
    /// Directory receiving stubs, copies, or links.
    pub reference: &'a str,
    /// Module base names, in declaration order.
    pub modules: &'a [String],
}

impl ModuleMap {
    /// Add `module` under `path`/`reference`.
    ///
    /// Returns `false` (and leaves the map unchanged) when the module is
    /// already listed for that pair.
    pub fn insert(&mut self, path: &str, reference: &str, module: &str) -> bool {
        let modules = self
            .paths
            .entry(path.to_string())
            .or_default()
            .entry(reference.to_string())
            .or_default();
        if modules.iter().any(|m| m == module) {
            return false;
        }
        modules.push(module.to_string());
        true
    }

    /// Iterate over every reference group, canonical paths and reference
    /// paths in sorted order.
    pub fn groups(&self) -> impl Iterator<Item = ReferenceGroup<'_>> {
        self.paths.iter().flat_map(|(path, references)| {
            references
                .iter()
                .map(move |(reference, modules)| ReferenceGroup {
                    path,
                    reference,
                    modules,
                })
        })
    }

    /// Modules listed for `path`/`reference`, if any.
    #[must_use]
    pub fn modules(&self, path: &str, reference: &str) -> Option<&[String]> {
        self.paths
            .get(path)
            .and_then(|references| references.get(reference))
            .map(Vec::as_slice)
    }

    /// Canonical path keys, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// Returns `true` if no module was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.module_count() == 0
    }

    /// Total number of (path, reference, module) triples.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.paths
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

/// A non-fatal condition found on a specific line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-indexed line number.
    pub line: usize,
    /// What was wrong with the line.
    pub warning: ConfigWarning,
}

/// Result of parsing a module file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedConfig {
    /// The grouped modules.
    pub modules: ModuleMap,
    /// Conditions that were reported and counted as warnings.
    pub warnings: Vec<ParseWarning>,
}

/// Read and parse the module file at `path`.
///
/// The file is decoded lossily so stray non-UTF-8 bytes never abort a run.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file does not exist or cannot be read.
pub fn load(path: &Path, log: &dyn Log) -> Result<ParsedConfig, ConfigError> {
    let bytes = std::fs::read(path).map_err(|e| ConfigError::from_io(path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    log.debug(&format!("read {} bytes from {}", bytes.len(), path.display()));
    Ok(parse_str(&content, log))
}
