//! Rayon-based parallel module processing.
use std::sync::Arc;

use super::{Action, Context, ModuleReport, Unit, process_module};
use crate::logging::BufferedLog;

/// Process `units` concurrently.
///
/// Each module logs into its own [`BufferedLog`]; once every module has
/// finished, the buffers are replayed into `ctx.log` in input order so the
/// console reads exactly as a sequential run would.
pub(super) fn process_units(units: &[Unit<'_>], action: Action, ctx: &Context) -> Vec<ModuleReport> {
    use rayon::prelude::*;
    let results: Vec<(ModuleReport, BufferedLog)> = units
        .par_iter()
        .map(|unit| {
            let log = BufferedLog::new(Arc::clone(&ctx.log));
            let report = process_module(unit, action, ctx, &log);
            (report, log)
        })
        .collect();

    results
        .into_iter()
        .map(|(report, log)| {
            log.flush();
            report
        })
        .collect()
}
