//! Reorder command implementation.

use crate::aggregate;
use crate::cache::PropertyCache;
use crate::cli::args::ReorderArgs;
use crate::cli::output::Output;
use crate::error::{ExitCode, PropError, Result};
use crate::select;
use crate::store::VaultStore;
use crate::types::BatchReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ReorderResponse {
    order: Vec<String>,
    dry_run: bool,
    report: BatchReport,
}

pub fn run(store: &mut VaultStore, args: &ReorderArgs, output: &Output) -> Result<ExitCode> {
    let files = select::resolve_targets(store, &[], &args.globs)?;
    let mut cache = PropertyCache::new();

    let verdict = aggregate::can_reorder(store, &files, &mut cache);
    if !verdict.can_reorder {
        return Err(PropError::ReorderRefused);
    }

    let order = if args.order.is_empty() {
        verdict.ordered_keys.clone()
    } else {
        aggregate::validate_order(&args.order, &verdict)?;
        args.order.clone()
    };

    let report = aggregate::apply_key_order(store, &files, &order, args.dry_run, &mut cache);
    if !output.is_quiet() {
        for failure in report.failures() {
            if let Some(error) = &failure.error {
                output.warn(&format!("{}: {}", failure.path, error));
            }
        }
    }

    let failed = report.failed();
    output.print(&ReorderResponse {
        order,
        dry_run: args.dry_run,
        report,
    })?;

    if failed > 0 {
        Ok(ExitCode::PartialFailure)
    } else {
        Ok(ExitCode::Success)
    }
}
