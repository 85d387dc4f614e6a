//! Template merge engine.
//!
//! Applies a template document's properties to target documents. Placement
//! and value origin are decided independently: positioning builds the key
//! skeleton, the override policy then resolves each selected key's value, so
//! a key can be relocated while keeping its existing value and vice versa.

use crate::cache::PropertyCache;
use crate::codec::{self, PropertySet};
use crate::error::Result;
use crate::parser;
use crate::serializer;
use crate::store::DocumentStore;
use crate::types::{BatchReport, DocumentOutcome, DocumentRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::{BTreeSet, HashSet};

/// Where template-supplied keys land relative to a target's existing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Positioning {
    /// Existing keys keep their order, template keys are appended.
    #[default]
    Below,
    /// Template keys come first, existing keys follow.
    Above,
    /// Template keys only; unselected existing keys are dropped.
    Remove,
}

/// How a merge decides placement and value origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergePolicy {
    pub positioning: Positioning,
    /// Take every selected value from the template.
    pub override_all: bool,
    /// Keys whose value always comes from the template.
    pub override_keys: BTreeSet<String>,
}

impl MergePolicy {
    fn overrides(&self, key: &str) -> bool {
        self.override_all || self.override_keys.contains(key)
    }
}

/// Options for one template application batch.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Template keys to apply. Empty means every template key.
    pub selected_keys: Vec<String>,
    pub policy: MergePolicy,
    /// Render results without writing them.
    pub dry_run: bool,
}

/// Compute the merged property set for one target.
///
/// Selected keys not present in the template are ignored. When a selected
/// key also exists in the target and the policy does not override it, the
/// existing value wins while the key keeps its skeleton position.
pub fn merge_properties(
    template: &PropertySet,
    selected_keys: &[String],
    existing: &PropertySet,
    policy: &MergePolicy,
) -> PropertySet {
    let selected: Vec<&str> = selected_keys
        .iter()
        .map(String::as_str)
        .filter(|k| template.contains_key(k))
        .collect();
    let selected_set: HashSet<&str> = selected.iter().copied().collect();

    let mut from_template = PropertySet::new();
    for key in &selected {
        if let Some(prop) = template.get(key) {
            from_template.insert((*key).to_string(), prop.clone());
        }
    }

    let mut remaining = PropertySet::new();
    for (key, prop) in existing.iter() {
        if !selected_set.contains(key.as_str()) {
            remaining.insert(key.clone(), prop.clone());
        }
    }

    let mut merged = PropertySet::new();
    match policy.positioning {
        Positioning::Below => {
            merged.extend_from(&remaining);
            merged.extend_from(&from_template);
        }
        Positioning::Above => {
            merged.extend_from(&from_template);
            merged.extend_from(&remaining);
        }
        Positioning::Remove => merged.extend_from(&from_template),
    }

    // Value resolution; inserting an existing key keeps its slot.
    for key in &selected {
        if !policy.overrides(key) {
            if let Some(prev) = existing.get(key) {
                merged.insert((*key).to_string(), prev.clone());
            }
        }
    }

    merged
}

/// Apply a template's properties to each target document, strictly in order.
///
/// The template itself is skipped when it appears among the targets. Each
/// failure is recorded in the report and the batch continues with the next
/// document.
pub fn apply_template<S: DocumentStore>(
    store: &mut S,
    template_doc: &DocumentRef,
    targets: &[DocumentRef],
    options: &ApplyOptions,
    cache: &mut PropertyCache,
) -> Result<BatchReport> {
    let template = cache.properties(&*store, template_doc)?;
    let selected: Vec<String> = if options.selected_keys.is_empty() {
        template.keys().cloned().collect()
    } else {
        options.selected_keys.clone()
    };

    let mut report = BatchReport::new();
    for target in targets {
        if target == template_doc {
            continue;
        }
        match apply_one(store, &template, &selected, target, options, cache) {
            Ok(outcome) => report.record(outcome),
            Err(e) => report.record(DocumentOutcome::failed(target, e.to_string())),
        }
    }
    Ok(report.finish())
}

fn apply_one<S: DocumentStore>(
    store: &mut S,
    template: &PropertySet,
    selected_keys: &[String],
    target: &DocumentRef,
    options: &ApplyOptions,
    cache: &mut PropertyCache,
) -> Result<DocumentOutcome> {
    let existing = cache.properties(&*store, target)?;
    let merged = merge_properties(template, selected_keys, &existing, &options.policy);
    let text = render_document(&*store, target, &merged)?;
    if options.dry_run {
        return Ok(DocumentOutcome::planned(target, text));
    }
    store.write(target, &text)?;
    cache.invalidate(target);
    Ok(DocumentOutcome::applied(target))
}

/// Restore, flatten and serialize a property set, splicing the result into
/// the target's current text. An empty set removes the header block.
pub(crate) fn render_document<S: DocumentStore + ?Sized>(
    store: &S,
    target: &DocumentRef,
    set: &PropertySet,
) -> Result<String> {
    let restored = codec::restore(set);
    let flattened: IndexMap<String, Value> = restored
        .into_iter()
        .map(|(key, value)| (key, serializer::flatten_value(&value)))
        .collect();
    let body = serializer::serialize_properties(&flattened);
    let content = store.read(target)?;
    Ok(parser::replace_header(&content, &body))
}
