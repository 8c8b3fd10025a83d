// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace and a fluent builder so
// each integration test can lay out canonical files and a module file
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libdist::config::{self, ParsedConfig};
use libdist::executor::{self, Action, Context, Summary};
use libdist::logging::{BufferedLog, LogEntry, Logger};

/// Name of the module file written into every workspace.
pub const CONFIG_FILE: &str = "modules.txt";

/// Turn a `/`-separated relative path into a path under `root`.
pub fn under(root: &Path, rel: &str) -> PathBuf {
    rel.split('/').fold(root.to_path_buf(), |p, part| p.join(part))
}

/// An isolated workspace backed by a [`tempfile::TempDir`].
pub struct Workspace {
    /// Temporary directory that relative module paths resolve against.
    pub root: tempfile::TempDir,
}

/// Result of one executor run against a workspace.
pub struct Run {
    /// The summary returned by the executor.
    pub summary: Summary,
    /// Parse-time result for the module file.
    pub parsed: ParsedConfig,
    /// Every log entry emitted during parsing and execution.
    pub entries: Vec<LogEntry>,
}

impl Run {
    /// Messages of the entries matching `pred`.
    pub fn messages(&self, pred: impl Fn(&LogEntry) -> bool) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| pred(e))
            .map(|e| e.message().to_string())
            .collect()
    }
}

impl Workspace {
    /// Path to the workspace root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of a `/`-separated relative path.
    pub fn file(&self, rel: &str) -> PathBuf {
        under(self.path(), rel)
    }

    /// Contents of `rel`, if it exists.
    pub fn read(&self, rel: &str) -> Option<Vec<u8>> {
        std::fs::read(self.file(rel)).ok()
    }

    /// Contents of `rel` as text.
    pub fn read_string(&self, rel: &str) -> Option<String> {
        std::fs::read_to_string(self.file(rel)).ok()
    }

    /// Whether `rel` exists as a file.
    pub fn exists(&self, rel: &str) -> bool {
        self.file(rel).is_file()
    }

    /// Path of the module file.
    pub fn config_path(&self) -> PathBuf {
        self.path().join(CONFIG_FILE)
    }

    /// Parse the module file and run `action` over it.
    pub fn run(&self, action: Action) -> Run {
        self.run_with(action, false, false)
    }

    /// Like [`run`](Self::run) with dry-run and parallel switches.
    pub fn run_with(&self, action: Action, dry_run: bool, parallel: bool) -> Run {
        let log = Arc::new(BufferedLog::new(Arc::new(Logger::with_log_file(None))));
        let parsed = config::load(&self.config_path(), log.as_ref()).expect("load module file");
        let ctx = Context::new(log.clone(), dry_run, parallel).with_root(self.path());
        let mut summary = executor::execute(&parsed.modules, action, &ctx);
        summary.add_config_warnings(parsed.warnings.len());
        Run {
            summary,
            parsed,
            entries: log.entries(),
        }
    }
}

/// Fluent builder for [`Workspace`].
pub struct WorkspaceBuilder {
    ws: Workspace,
}

impl WorkspaceBuilder {
    /// Begin building an empty workspace.
    pub fn new() -> Self {
        Self {
            ws: Workspace {
                root: tempfile::tempdir().expect("create temp dir"),
            },
        }
    }

    /// Write the module file.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.ws.config_path(), content).expect("write module file");
        self
    }

    /// Create `rel` (and its parent directories) with `content`.
    pub fn with_file(self, rel: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.ws.file(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write file");
        self
    }

    /// Create an empty directory at `rel`.
    pub fn with_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ws.file(rel)).expect("create dir");
        self
    }

    /// Finish building.
    pub fn build(self) -> Workspace {
        self.ws
    }
}
