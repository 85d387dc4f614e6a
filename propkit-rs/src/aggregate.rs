//! Cross-file property aggregation.

use crate::cache::PropertyCache;
use crate::codec::{self, PropertySet};
use crate::error::{PropError, Result};
use crate::merge;
use crate::store::DocumentStore;
use crate::types::{BatchReport, DisplayType, DocumentOutcome, DocumentRef};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_yaml::Value;
use std::collections::BTreeSet;

/// Usage of one property key across a collection of documents.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateEntry {
    pub count: usize,
    /// Up to three distinct example values, in encounter order.
    pub examples: Vec<Value>,
}

/// Count key usage and collect example values across `files`. Resulting
/// entries are keyed in discovery order.
///
/// Unreadable documents are skipped with a warning and contribute nothing.
pub fn scan<S: DocumentStore + ?Sized>(
    store: &S,
    files: &[DocumentRef],
    cache: &mut PropertyCache,
) -> IndexMap<String, AggregateEntry> {
    let mut entries: IndexMap<String, AggregateEntry> = IndexMap::new();
    for file in files {
        let set = match cache.properties(store, file) {
            Ok(set) => set,
            Err(e) => {
                eprintln!("Warning: skipping {}: {}", file, e);
                continue;
            }
        };
        for (key, prop) in set.iter() {
            let value = codec::restore_value(prop);
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| AggregateEntry {
                    count: 0,
                    examples: Vec::new(),
                });
            entry.count += 1;
            if entry.examples.len() < 3 && !entry.examples.contains(&value) {
                entry.examples.push(value);
            }
        }
    }
    entries
}

/// Whether a collection of documents can be uniformly reordered.
#[derive(Debug, Clone, Serialize)]
pub struct ReorderVerdict {
    pub can_reorder: bool,
    /// Union of keys in discovery order.
    pub ordered_keys: Vec<String>,
}

/// A reorder is possible only when every document carries exactly the same
/// non-empty key set.
pub fn can_reorder<S: DocumentStore + ?Sized>(
    store: &S,
    files: &[DocumentRef],
    cache: &mut PropertyCache,
) -> ReorderVerdict {
    let mut union: IndexSet<String> = IndexSet::new();
    let mut common: Option<BTreeSet<String>> = None;

    for file in files {
        let set = match cache.properties(store, file) {
            Ok(set) => set,
            Err(e) => {
                eprintln!("Warning: skipping {}: {}", file, e);
                PropertySet::new()
            }
        };
        for key in set.keys() {
            union.insert(key.clone());
        }
        let keys: BTreeSet<String> = set.keys().cloned().collect();
        common = Some(match common {
            None => keys,
            Some(prev) => prev.intersection(&keys).cloned().collect(),
        });
    }

    let common = common.unwrap_or_default();
    ReorderVerdict {
        can_reorder: !common.is_empty() && common.len() == union.len(),
        ordered_keys: union.into_iter().collect(),
    }
}

/// Presentation type for an aggregated key, judged from its first example.
pub fn infer_display_type(examples: &[Value]) -> DisplayType {
    examples
        .first()
        .map(codec::detect_display_type)
        .unwrap_or(DisplayType::Text)
}

/// Check that `order` names exactly the keys of `verdict`, each once.
pub fn validate_order(order: &[String], verdict: &ReorderVerdict) -> Result<()> {
    let want: BTreeSet<&str> = verdict.ordered_keys.iter().map(String::as_str).collect();
    let got: BTreeSet<&str> = order.iter().map(String::as_str).collect();
    if want == got && order.len() == got.len() {
        return Ok(());
    }

    let missing: Vec<&str> = want.difference(&got).copied().collect();
    let extra: Vec<&str> = got.difference(&want).copied().collect();
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing {}", missing.join(", ")));
    }
    if !extra.is_empty() {
        parts.push(format!("unknown {}", extra.join(", ")));
    }
    if parts.is_empty() {
        parts.push("duplicate keys".to_string());
    }
    Err(PropError::InvalidOrder(parts.join("; ")))
}

/// Rewrite each document's header with its keys following `order`.
///
/// Values are untouched. Keys a document carries beyond `order` keep their
/// relative order after the ordered ones. Failures are recorded per document
/// and the batch continues.
pub fn apply_key_order<S: DocumentStore>(
    store: &mut S,
    files: &[DocumentRef],
    order: &[String],
    dry_run: bool,
    cache: &mut PropertyCache,
) -> BatchReport {
    let mut report = BatchReport::new();
    for file in files {
        match reorder_one(store, file, order, dry_run, cache) {
            Ok(outcome) => report.record(outcome),
            Err(e) => report.record(DocumentOutcome::failed(file, e.to_string())),
        }
    }
    report.finish()
}

fn reorder_one<S: DocumentStore>(
    store: &mut S,
    file: &DocumentRef,
    order: &[String],
    dry_run: bool,
    cache: &mut PropertyCache,
) -> Result<DocumentOutcome> {
    let existing = cache.properties(&*store, file)?;

    let mut reordered = PropertySet::new();
    for key in order {
        if let Some(prop) = existing.get(key) {
            reordered.insert(key.clone(), prop.clone());
        }
    }
    for (key, prop) in existing.iter() {
        if !reordered.contains_key(key) {
            reordered.insert(key.clone(), prop.clone());
        }
    }

    let text = merge::render_document(&*store, file, &reordered)?;
    if dry_run {
        return Ok(DocumentOutcome::planned(file, text));
    }
    store.write(file, &text)?;
    cache.invalidate(file);
    Ok(DocumentOutcome::applied(file))
}
