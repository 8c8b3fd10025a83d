//! Top-level orchestration: load the module file, run the action, report.
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::config;
use crate::error::ConfigError;
use crate::executor::{self, Context, Summary};
use crate::logging::Log;

/// Exit code when the module file cannot be opened or read.
pub const EXIT_CONFIG_ERROR: i32 = 3;
/// Exit code for any other fatal failure.
pub const EXIT_FAILURE: i32 = 1;

/// Run the action selected on the command line.
///
/// Per-module problems never fail the run; they are counted in the returned
/// [`Summary`].
///
/// # Errors
///
/// Returns an error if the module file cannot be read or the JSON report
/// cannot be written.
pub fn run(cli: &Cli, log: Arc<dyn Log>) -> Result<Summary> {
    log.stage(&format!(
        "libdist {} {}...",
        crate::VERSION,
        cli.action.verb()
    ));
    if cli.dry_run {
        log.info("dry run: no files will be changed");
    }

    let parsed = config::load(&cli.config, log.as_ref())
        .with_context(|| format!("loading module file {}", cli.config.display()))?;
    log.debug(&format!(
        "{} module(s) in {} reference group(s)",
        parsed.modules.module_count(),
        parsed.modules.groups().count()
    ));

    let mut ctx = Context::new(Arc::clone(&log), cli.dry_run, cli.parallel);
    if let Some(root) = &cli.root {
        ctx = ctx.with_root(root);
    }

    let mut summary = executor::execute(&parsed.modules, cli.action, &ctx);
    summary.add_config_warnings(parsed.warnings.len());
    log.info(&summary.tally());

    if let Some(path) = &cli.report {
        write_report(&summary, path)?;
        log.debug(&format!("report written to {}", path.display()));
    }
    Ok(summary)
}

/// Write `summary` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_report(summary: &Summary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serializing run report")?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("writing report {}", path.display()))
}

/// Map a fatal error to the process exit code.
#[must_use]
pub fn error_exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        EXIT_CONFIG_ERROR
    } else {
        EXIT_FAILURE
    }
}
