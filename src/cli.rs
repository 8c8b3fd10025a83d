use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::executor::Action;

/// Top-level CLI entry point for the module distribution tool.
#[derive(Parser, Debug)]
#[command(
    name = "libdist",
    about = "Distribute shared source modules as include stubs, copies, or hardlinks",
    version = crate::VERSION
)]
pub struct Cli {
    /// Module file listing path, reference and module directives
    pub config: PathBuf,

    /// Action to perform: make, rel (release) or hardlink
    #[arg(value_enum, ignore_case = true)]
    pub action: Action,

    /// Show skipped comments and missing module files
    #[arg(short, long)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Resolve relative module paths against this directory
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Process modules in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Parse the process arguments, accepting the legacy `-verbose` spelling.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_args(std::env::args_os()))
    }
}

/// Rewrite the single-dash `-verbose` flag to `--verbose`.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if arg == "-verbose" {
                OsString::from("--verbose")
            } else {
                arg
            }
        })
        .collect()
}
