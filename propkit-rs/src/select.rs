//! Template-source and target resolution.

use crate::error::{PropError, Result};
use crate::store::VaultStore;
use crate::types::{DocumentRef, TemplateSource};
use std::collections::HashSet;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Resolve a template source to one concrete template document.
///
/// A directory source must hold exactly one document: none fails with
/// `TemplateNotFound`, more than one with `AmbiguousTemplate`.
pub fn resolve_template(store: &VaultStore, source: &TemplateSource) -> Result<DocumentRef> {
    match source {
        TemplateSource::Document { path } => {
            let doc = store.normalize_doc_path(&path.to_string_lossy());
            if !store.exists(&doc) {
                return Err(PropError::DocumentNotFound(doc.path().to_path_buf()));
            }
            Ok(doc)
        }
        TemplateSource::Directory { path, recursive } => {
            let pattern = if *recursive {
                format!("{}/**/*.md", path.display())
            } else {
                format!("{}/*.md", path.display())
            };
            let mut docs = store.list_matching(&pattern)?;
            match docs.len() {
                0 => Err(PropError::TemplateNotFound(path.clone())),
                1 => Ok(docs.remove(0)),
                count => Err(PropError::AmbiguousTemplate {
                    path: path.clone(),
                    count,
                }),
            }
        }
    }
}

/// Resolve explicit paths and glob patterns into a deduplicated target list,
/// in discovery order.
///
/// With neither given, every document in the vault is a target. Paths that
/// differ only in Unicode normalization count as the same document.
pub fn resolve_targets(
    store: &VaultStore,
    paths: &[String],
    patterns: &[String],
) -> Result<Vec<DocumentRef>> {
    if paths.is_empty() && patterns.is_empty() {
        return store.list_documents();
    }

    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for path in paths {
        let has_foreign_ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e != "md");
        if has_foreign_ext {
            eprintln!("Warning: skipping unsupported document type: {}", path);
            continue;
        }
        let doc = store.normalize_doc_path(path);
        if seen.insert(canonical(&doc)) {
            targets.push(doc);
        }
    }

    for pattern in patterns {
        for doc in store.list_matching(pattern)? {
            if seen.insert(canonical(&doc)) {
                targets.push(doc);
            }
        }
    }

    Ok(targets)
}

fn canonical(doc: &DocumentRef) -> String {
    doc.path().to_string_lossy().nfc().collect()
}
