//! Shared source module distribution engine.
//!
//! Keeps one canonical copy of each source module and makes it appear in
//! other project trees, either as a generated stub that `#include`s the
//! canonical file, as a byte-identical copy, or as a hardlink. The work is
//! driven by a small line-oriented module file of `path`, `reference` and
//! `module` directives.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse module files into a [`config::ModuleMap`]
//! - **[`resources`]**: idempotent per-file actions (stub, copy, hardlink)
//! - **[`executor`]**: apply an action to every module and collect a summary
//! - **[`commands`]**: command-line orchestration and exit codes
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod resources;

/// Version string reported by `--version` and in log headers.
pub const VERSION: &str = match option_env!("LIBDIST_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
