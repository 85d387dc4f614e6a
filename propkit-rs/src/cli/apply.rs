//! Apply command implementation.

use crate::cache::PropertyCache;
use crate::cli::args::ApplyArgs;
use crate::cli::output::Output;
use crate::error::{ExitCode, PropError, Result};
use crate::merge::{self, ApplyOptions, MergePolicy};
use crate::select;
use crate::store::VaultStore;
use crate::types::{BatchReport, TemplateSource};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ApplyResponse {
    template: String,
    dry_run: bool,
    report: BatchReport,
}

pub fn run(store: &mut VaultStore, args: &ApplyArgs, output: &Output) -> Result<ExitCode> {
    let source = if args.dir {
        TemplateSource::Directory {
            path: PathBuf::from(&args.template),
            recursive: args.recursive,
        }
    } else {
        TemplateSource::Document {
            path: PathBuf::from(&args.template),
        }
    };
    let template_doc = select::resolve_template(store, &source)?;
    let targets = select::resolve_targets(store, &args.targets, &args.globs)?;

    let mut cache = PropertyCache::new();
    let template = cache.properties(store, &template_doc)?;
    let unknown: Vec<&str> = args
        .keys
        .iter()
        .map(String::as_str)
        .filter(|k| !template.contains_key(*k))
        .collect();
    if !unknown.is_empty() {
        return Err(PropError::UnknownSelection(unknown.join(", ")));
    }

    let options = ApplyOptions {
        selected_keys: args.keys.clone(),
        policy: MergePolicy {
            positioning: args.position.into(),
            override_all: args.override_all,
            override_keys: args.overrides.iter().cloned().collect::<BTreeSet<_>>(),
        },
        dry_run: args.dry_run,
    };

    let report = merge::apply_template(store, &template_doc, &targets, &options, &mut cache)?;
    if !output.is_quiet() {
        for failure in report.failures() {
            if let Some(error) = &failure.error {
                output.warn(&format!("{}: {}", failure.path, error));
            }
        }
    }

    let failed = report.failed();
    output.print(&ApplyResponse {
        template: template_doc.to_string(),
        dry_run: args.dry_run,
        report,
    })?;

    if failed > 0 {
        Ok(ExitCode::PartialFailure)
    } else {
        Ok(ExitCode::Success)
    }
}
