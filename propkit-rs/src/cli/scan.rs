//! Scan command implementation.

use crate::aggregate;
use crate::cache::PropertyCache;
use crate::cli::args::ScanArgs;
use crate::cli::output::Output;
use crate::error::{ExitCode, Result};
use crate::select;
use crate::store::VaultStore;
use crate::types::DisplayType;
use chrono::Utc;
use serde::Serialize;
use serde_yaml::Value;

#[derive(Debug, Serialize)]
struct KeyUsage {
    key: String,
    count: usize,
    display: DisplayType,
    examples: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct ScanResponse {
    files_scanned: usize,
    keys: Vec<KeyUsage>,
    can_reorder: bool,
    ordered_keys: Vec<String>,
    scanned_at: String,
}

pub fn run(store: &VaultStore, args: &ScanArgs, output: &Output) -> Result<ExitCode> {
    let files = select::resolve_targets(store, &[], &args.globs)?;
    let mut cache = PropertyCache::new();

    let entries = aggregate::scan(store, &files, &mut cache);
    let verdict = aggregate::can_reorder(store, &files, &mut cache);

    let keys: Vec<KeyUsage> = entries
        .into_iter()
        .map(|(key, entry)| KeyUsage {
            key,
            count: entry.count,
            display: aggregate::infer_display_type(&entry.examples),
            examples: entry.examples,
        })
        .collect();

    output.print(&ScanResponse {
        files_scanned: files.len(),
        keys,
        can_reorder: verdict.can_reorder,
        ordered_keys: verdict.ordered_keys,
        scanned_at: Utc::now().to_rfc3339(),
    })?;
    Ok(ExitCode::Success)
}
