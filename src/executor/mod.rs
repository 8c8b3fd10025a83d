//! Action executor: applies one [`Action`] to every module of a
//! [`ModuleMap`].
//!
//! Each (canonical path, reference path, module) triple is processed
//! independently. For every extension in [`MODULE_EXTENSIONS`] the canonical
//! file is looked up and, when present, a stub, copy or hardlink is placed
//! at the reference location. Failures are recorded in the returned
//! [`Summary`] instead of being propagated.
mod parallel;
pub mod report;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{ModuleMap, ReferenceGroup};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::paths::{normalize, relative_distance, to_native};
use crate::resources::{
    Applicable, CopyResource, HardlinkResource, ResourceChange, StubResource,
};

pub use report::{ExtensionOutcome, ExtensionReport, ModuleCondition, ModuleReport, Summary};

/// Extensions tried for every module, in processing order.
pub const MODULE_EXTENSIONS: [&str; 4] = [".h", ".cpp", ".hpp", ".c"];

/// What to place at each reference location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Write a stub that includes the canonical file.
    Make,
    /// Copy the canonical file.
    #[value(name = "rel", alias = "release")]
    #[serde(rename = "rel")]
    Release,
    /// Hardlink the canonical file.
    Hardlink,
}

impl Action {
    /// Progressive form used in the startup line.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Make => "making references",
            Self::Release => "releasing",
            Self::Hardlink => "hardlinking",
        }
    }

    /// Name used on the command line and for the log file.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Make => "make",
            Self::Release => "rel",
            Self::Hardlink => "hardlink",
        }
    }

    const fn past_tense(self) -> &'static str {
        match self {
            Self::Make => "created",
            Self::Release => "released",
            Self::Hardlink => "hardlinked",
        }
    }

    const fn infinitive(self) -> &'static str {
        match self {
            Self::Make => "create",
            Self::Release => "release",
            Self::Hardlink => "hardlink",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared settings for one execution.
pub struct Context {
    /// Directory that relative paths are resolved against; the process
    /// working directory when `None`.
    pub root: Option<PathBuf>,
    /// Logger for progress output.
    pub log: Arc<dyn Log>,
    /// Evaluate everything but change nothing.
    pub dry_run: bool,
    /// Process modules concurrently.
    pub parallel: bool,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("parallel", &self.parallel)
            .field("fs_ops", &self.fs_ops)
            .finish()
    }
}

impl Context {
    /// Create a context operating on the real filesystem.
    #[must_use]
    pub fn new(log: Arc<dyn Log>, dry_run: bool, parallel: bool) -> Self {
        Self {
            root: None,
            log,
            dry_run,
            parallel,
            fs_ops: Arc::new(SystemFileSystemOps),
        }
    }

    /// Resolve relative paths against `root`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Replace the filesystem implementation.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }

    /// Turn a configuration path string into a filesystem path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        let native = to_native(path);
        match &self.root {
            Some(root) => root.join(native),
            None => native,
        }
    }
}

/// One module to process, borrowed from the map.
#[derive(Debug, Clone, Copy)]
struct Unit<'a> {
    path: &'a str,
    reference: &'a str,
    module: &'a str,
}

fn units<'a>(groups: impl Iterator<Item = ReferenceGroup<'a>>) -> Vec<Unit<'a>> {
    groups
        .flat_map(|group| {
            group.modules.iter().map(move |module| Unit {
                path: group.path,
                reference: group.reference,
                module,
            })
        })
        .collect()
}

/// Apply `action` to every module in `modules`.
///
/// The map is only read. Canonical and reference paths are visited in
/// sorted order, modules in declaration order; with `ctx.parallel` the
/// modules run concurrently but reports and log output keep that order.
pub fn execute(modules: &ModuleMap, action: Action, ctx: &Context) -> Summary {
    let mut summary = Summary::new(action);
    if modules.is_empty() {
        ctx.log.warn("no modules to act upon");
        return summary;
    }

    let work = units(modules.groups());
    let reports = if ctx.parallel {
        parallel::process_units(&work, action, ctx)
    } else {
        work.iter()
            .map(|unit| process_module(unit, action, ctx, ctx.log.as_ref()))
            .collect()
    };

    for report in reports {
        summary.push(report);
    }
    summary
}

/// Process all extensions of one module, logging to `log`.
fn process_module(unit: &Unit<'_>, action: Action, ctx: &Context, log: &dyn Log) -> ModuleReport {
    let mut report = ModuleReport::new(unit.path, unit.reference, unit.module);
    let path = normalize(unit.path);
    let reference = normalize(unit.reference);
    log.debug(&format!(
        "processing module {} ({path} -> {reference})",
        unit.module
    ));

    // Only stubs embed the distance.
    let fixed = if action == Action::Make {
        match relative_distance(&path, &reference) {
            Ok(fixed) => fixed,
            Err(e) => {
                log.error(&format!("module {}: {e}", unit.module));
                report.condition = Some(ModuleCondition::UnsupportedDistance);
                return report;
            }
        }
    } else {
        String::new()
    };

    let mut extensions = MODULE_EXTENSIONS.iter();
    for &ext in extensions.by_ref() {
        let path_file = format!("{path}{}{ext}", unit.module);
        let ref_file = format!("{reference}{}{ext}", unit.module);
        let canonical = ctx.resolve(&path_file);

        if !ctx.fs_ops.is_file(&canonical) {
            log.notice(&format!("{path_file} not found"));
            report.record(ext, ExtensionOutcome::SourceMissing);
            continue;
        }

        let target = ctx.resolve(&ref_file);
        let resource: Box<dyn Applicable> = match action {
            Action::Make => Box::new(StubResource::new(
                target,
                canonical,
                format!("{fixed}{}{ext}", unit.module),
            )),
            Action::Release => Box::new(CopyResource::new(canonical, target)),
            Action::Hardlink => Box::new(HardlinkResource::new(canonical, target)),
        };

        let outcome = apply_resource(resource.as_ref(), action, ctx, log);
        let abort = matches!(outcome, ExtensionOutcome::Failed { fatal: true, .. });
        report.record(ext, outcome);
        if abort {
            break;
        }
    }
    for &ext in extensions {
        report.record(ext, ExtensionOutcome::Abandoned);
    }

    if report.missing() == MODULE_EXTENSIONS.len() {
        log.error(&format!(
            "no files found for module {} in {path}",
            unit.module
        ));
        report.condition = Some(ModuleCondition::AllExtensionsMissing);
    }
    report
}

/// Apply one resource and translate the result into an outcome.
fn apply_resource(
    resource: &dyn Applicable,
    action: Action,
    ctx: &Context,
    log: &dyn Log,
) -> ExtensionOutcome {
    let desc = resource.description();
    if ctx.dry_run {
        log.dry_run(&format!("would {} {desc}", action.infinitive()));
        return ExtensionOutcome::DryRun;
    }

    match resource.apply(ctx.fs_ops.as_ref()) {
        Ok(ResourceChange::Applied) => {
            log.success(&format!("{} {desc}", action.past_tense()));
            ExtensionOutcome::Applied
        }
        Ok(ResourceChange::AlreadyCorrect) => {
            log.info(&format!("up to date: {desc}"));
            ExtensionOutcome::AlreadyCorrect
        }
        Ok(ResourceChange::Skipped { reason }) => {
            log.warn(&format!("skipping {desc}: {reason}"));
            ExtensionOutcome::Skipped { reason }
        }
        Err(e) => {
            let fatal = e.aborts_module();
            if fatal {
                log.error(&e.to_string());
            } else {
                log.warn(&e.to_string());
            }
            ExtensionOutcome::Failed {
                kind: e.kind(),
                message: e.to_string(),
                fatal,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{BufferedLog, LogEntry, Logger};
    use crate::operations::MockFileSystemOps;
    use std::path::Path;

    fn map(entries: &[(&str, &str, &str)]) -> ModuleMap {
        let mut map = ModuleMap::default();
        for (path, reference, module) in entries {
            map.insert(path, reference, module);
        }
        map
    }

    fn run(
        modules: &ModuleMap,
        action: Action,
        fs: MockFileSystemOps,
        dry_run: bool,
    ) -> (Summary, Arc<MockFileSystemOps>, Vec<LogEntry>) {
        let fs = Arc::new(fs);
        let log = Arc::new(BufferedLog::new(Arc::new(Logger::with_log_file(None))));
        let ctx = Context::new(log.clone(), dry_run, false).with_fs_ops(fs.clone());
        let summary = execute(modules, action, &ctx);
        (summary, fs, log.entries())
    }

    fn native(path: &str) -> PathBuf {
        to_native(path)
    }

    #[test]
    fn action_names_round_trip_through_clap() {
        use clap::ValueEnum as _;
        for action in Action::value_variants() {
            assert_eq!(Action::from_str(action.name(), true).unwrap(), *action);
        }
        assert_eq!(Action::from_str("RELEASE", true).unwrap(), Action::Release);
        assert!(Action::from_str("deploy", true).is_err());
    }

    #[test]
    fn make_writes_stub_with_relative_include() {
        let modules = map(&[("lib/core", "src/app", "foo")]);
        let fs = MockFileSystemOps::new().with_file(native("lib/core/foo.h"), b"int foo();");
        let (summary, fs, _) = run(&modules, Action::Make, fs, false);

        let stub = fs.contents(&native("src/app/foo.h")).unwrap();
        let stub = String::from_utf8(stub).unwrap();
        assert!(stub.ends_with("#include \"../../lib/core/foo.h\"\n"), "{stub}");
        assert_eq!(summary.warnings, 3);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.modules[0].condition, None);
    }

    #[test]
    fn all_extensions_missing_is_one_error() {
        let modules = map(&[("lib", "app", "ghost")]);
        for action in [Action::Make, Action::Release, Action::Hardlink] {
            let (summary, fs, entries) = run(&modules, action, MockFileSystemOps::new(), false);
            assert_eq!(summary.errors, 1);
            assert_eq!(summary.warnings, 4);
            assert_eq!(
                summary.modules[0].condition,
                Some(ModuleCondition::AllExtensionsMissing)
            );
            assert!(fs.contents(&native("app/ghost.h")).is_none());
            assert!(
                entries
                    .iter()
                    .any(|e| matches!(e, LogEntry::Error(m) if m.contains("ghost")))
            );
        }
    }

    #[test]
    fn make_create_failure_abandons_remaining_extensions() {
        let modules = map(&[("lib", "app", "foo"), ("lib", "app", "bar")]);
        let fs = MockFileSystemOps::new()
            .with_file(native("lib/foo.h"), b"h")
            .with_file(native("lib/foo.cpp"), b"cpp")
            .with_file(native("lib/bar.h"), b"h")
            .failing_write(native("app/foo.h"));
        let (summary, fs, _) = run(&modules, Action::Make, fs, false);

        let foo = &summary.modules[0];
        assert_eq!(foo.module, "foo");
        assert!(matches!(
            foo.extensions[0].outcome,
            ExtensionOutcome::Failed { fatal: true, .. }
        ));
        assert!(
            foo.extensions[1..]
                .iter()
                .all(|e| e.outcome == ExtensionOutcome::Abandoned)
        );
        assert!(fs.contents(&native("app/foo.cpp")).is_none());
        // The next module still runs.
        assert!(fs.contents(&native("app/bar.h")).is_some());
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 3);
    }

    #[test]
    fn release_copy_failure_is_a_warning() {
        let modules = map(&[("lib", "app", "foo")]);
        let fs = MockFileSystemOps::new()
            .with_file(native("lib/foo.h"), b"h")
            .with_file(native("lib/foo.c"), b"c")
            .failing_copy(native("app/foo.h"));
        let (summary, fs, _) = run(&modules, Action::Release, fs, false);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.warnings, 3);
        assert_eq!(fs.contents(&native("app/foo.c")).unwrap(), b"c");
    }

    #[test]
    fn hardlink_failure_is_a_warning() {
        let modules = map(&[("lib", "app", "foo")]);
        let fs = MockFileSystemOps::new()
            .with_file(native("lib/foo.hpp"), b"hpp")
            .failing_link(native("app/foo.hpp"));
        let (summary, _, _) = run(&modules, Action::Hardlink, fs, false);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.warnings, 4);
    }

    #[test]
    fn unsupported_distance_only_affects_make() {
        let modules = map(&[("lib", "../app", "foo")]);
        let fs = || MockFileSystemOps::new().with_file(native("lib/foo.h"), b"h");

        let (summary, fs_after, _) = run(&modules, Action::Make, fs(), false);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 0);
        assert_eq!(
            summary.modules[0].condition,
            Some(ModuleCondition::UnsupportedDistance)
        );
        assert!(summary.modules[0].extensions.is_empty());
        assert!(fs_after.contents(&native("../app/foo.h")).is_none());

        let (summary, fs_after, _) = run(&modules, Action::Release, fs(), false);
        assert_eq!(summary.errors, 0);
        assert!(fs_after.contents(&native("../app/foo.h")).is_some());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let modules = map(&[("lib", "app", "foo")]);
        let fs = MockFileSystemOps::new().with_file(native("lib/foo.h"), b"h");
        let (summary, fs, entries) = run(&modules, Action::Release, fs, true);
        assert!(fs.contents(&native("app/foo.h")).is_none());
        assert_eq!(summary.modules[0].extensions[0].outcome, ExtensionOutcome::DryRun);
        assert!(
            entries
                .iter()
                .any(|e| matches!(e, LogEntry::DryRun(m) if m.starts_with("would release")))
        );
    }

    #[test]
    fn empty_map_warns_without_counting() {
        let (summary, _, entries) =
            run(&ModuleMap::default(), Action::Make, MockFileSystemOps::new(), false);
        assert_eq!(summary.warnings, 0);
        assert_eq!(summary.errors, 0);
        assert_eq!(
            entries,
            vec![LogEntry::Warn("no modules to act upon".to_string())]
        );
    }

    #[test]
    fn modules_processed_in_declaration_order() {
        let modules = map(&[("lib", "app", "zeta"), ("lib", "app", "alpha")]);
        let (summary, _, _) = run(&modules, Action::Make, MockFileSystemOps::new(), false);
        let order: Vec<&str> = summary.modules.iter().map(|m| m.module.as_str()).collect();
        assert_eq!(order, ["zeta", "alpha"]);
    }

    #[test]
    fn missing_sources_are_notices() {
        let modules = map(&[("src/lib", "app", "foo")]);
        let fs = MockFileSystemOps::new().with_file(native("src/lib/foo.h"), b"h");
        let (_, _, entries) = run(&modules, Action::Release, fs, false);
        let notices: Vec<&str> = entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Notice(_)))
            .map(LogEntry::message)
            .collect();
        assert_eq!(
            notices,
            [
                "src/lib/foo.cpp not found",
                "src/lib/foo.hpp not found",
                "src/lib/foo.c not found",
            ]
        );
    }

    #[test]
    fn resolve_joins_root() {
        let log: Arc<dyn Log> = Arc::new(Logger::with_log_file(None));
        let ctx = Context::new(log, false, false).with_root("/work");
        assert_eq!(ctx.resolve("lib/foo.h"), Path::new("/work").join(native("lib/foo.h")));
        let bare = Context::new(Arc::new(Logger::with_log_file(None)), false, false);
        assert_eq!(bare.resolve("lib/foo.h"), native("lib/foo.h"));
    }
}
