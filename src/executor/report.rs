//! Per-module results and the run summary.
use serde::Serialize;

use super::Action;

/// What happened to one extension of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtensionOutcome {
    /// The reference file was created or replaced.
    Applied,
    /// The reference file already had the wanted content.
    AlreadyCorrect,
    /// Dry run: the action would have been applied.
    DryRun,
    /// The canonical file for this extension does not exist.
    SourceMissing,
    /// The reference file is the canonical file itself.
    Skipped {
        /// Why nothing was done.
        reason: String,
    },
    /// The action failed.
    Failed {
        /// Short failure name (e.g. `copy_failed`).
        kind: &'static str,
        /// Full error message.
        message: String,
        /// Whether the failure counted as an error rather than a warning.
        fatal: bool,
    },
    /// Not attempted because an earlier extension aborted the module.
    Abandoned,
}

impl ExtensionOutcome {
    /// Warnings contributed by this outcome.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        match self {
            Self::SourceMissing | Self::Skipped { .. } | Self::Failed { fatal: false, .. } => 1,
            _ => 0,
        }
    }

    /// Errors contributed by this outcome.
    #[must_use]
    pub const fn errors(&self) -> usize {
        match self {
            Self::Failed { fatal: true, .. } => 1,
            _ => 0,
        }
    }
}

/// A module-level condition, reported once per module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCondition {
    /// No canonical file exists for any extension.
    AllExtensionsMissing,
    /// The reference path ascends, so no include path could be computed.
    UnsupportedDistance,
}

/// Outcome of one extension, tagged with the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionReport {
    /// Extension including the leading dot.
    pub extension: &'static str,
    /// What happened.
    #[serde(flatten)]
    pub outcome: ExtensionOutcome,
}

/// Everything that happened to one (path, reference, module) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    /// Canonical path as declared.
    pub path: String,
    /// Reference path as declared.
    pub reference: String,
    /// Module base name.
    pub module: String,
    /// One entry per processed extension, in extension order.
    pub extensions: Vec<ExtensionReport>,
    /// Module-level condition, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ModuleCondition>,
}

impl ModuleReport {
    /// Create an empty report.
    #[must_use]
    pub fn new(path: &str, reference: &str, module: &str) -> Self {
        Self {
            path: path.to_string(),
            reference: reference.to_string(),
            module: module.to_string(),
            extensions: Vec::new(),
            condition: None,
        }
    }

    /// Record the outcome for `extension`.
    pub fn record(&mut self, extension: &'static str, outcome: ExtensionOutcome) {
        self.extensions.push(ExtensionReport { extension, outcome });
    }

    /// Number of extensions whose canonical file was missing.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, ExtensionOutcome::SourceMissing))
    }

    /// Number of extensions that were applied, already correct, or would be
    /// applied in a dry run.
    #[must_use]
    pub fn placed(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                ExtensionOutcome::Applied
                    | ExtensionOutcome::AlreadyCorrect
                    | ExtensionOutcome::DryRun
            )
        })
    }

    fn count(&self, pred: impl Fn(&ExtensionOutcome) -> bool) -> usize {
        self.extensions.iter().filter(|e| pred(&e.outcome)).count()
    }

    /// Warnings recorded for this module.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.extensions.iter().map(|e| e.outcome.warnings()).sum()
    }

    /// Errors recorded for this module, module-level condition included.
    #[must_use]
    pub fn errors(&self) -> usize {
        let extension_errors: usize = self.extensions.iter().map(|e| e.outcome.errors()).sum();
        extension_errors + usize::from(self.condition.is_some())
    }
}

/// Accumulated result of one run.
///
/// # Examples
///
/// ```
/// use libdist::executor::{Action, Summary};
///
/// let mut summary = Summary::new(Action::Make);
/// assert_eq!(summary.exit_code(), 0);
/// summary.add_config_warnings(2);
/// assert_eq!(summary.warnings, 2);
/// assert_eq!(summary.exit_code(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// The action that was run.
    pub action: Action,
    /// Total warnings.
    pub warnings: usize,
    /// Total errors.
    pub errors: usize,
    /// Per-module detail, in processing order.
    pub modules: Vec<ModuleReport>,
}

impl Summary {
    /// Create an empty summary for `action`.
    #[must_use]
    pub const fn new(action: Action) -> Self {
        Self {
            action,
            warnings: 0,
            errors: 0,
            modules: Vec::new(),
        }
    }

    /// Add a module's report and its counts.
    pub fn push(&mut self, report: ModuleReport) {
        self.warnings += report.warnings();
        self.errors += report.errors();
        self.modules.push(report);
    }

    /// Add warnings raised outside the executor (e.g. while parsing).
    pub const fn add_config_warnings(&mut self, count: usize) {
        self.warnings += count;
    }

    /// Process exit code: `0` without errors, otherwise the negated error
    /// count.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.errors == 0 {
            return 0;
        }
        i32::try_from(self.errors).map_or(i32::MIN, |n| -n)
    }

    /// Final one-line tally.
    #[must_use]
    pub fn tally(&self) -> String {
        format!(
            "Completed with {} warning(s) {} error(s)",
            self.warnings, self.errors
        )
    }
}
