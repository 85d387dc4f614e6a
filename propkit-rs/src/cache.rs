//! Per-operation memoization of tagged property sets.

use crate::codec::{self, PropertySet};
use crate::error::{PropError, Result};
use crate::store::DocumentStore;
use crate::types::DocumentRef;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;

/// Memoizes document-path to tagged-property-set lookups for the duration of
/// one top-level operation.
///
/// A cache is constructed per operation and discarded with it. It is never
/// refreshed behind the caller's back: a document changed on disk after its
/// first read keeps serving the memoized set until [`invalidate`] is called.
///
/// [`invalidate`]: PropertyCache::invalidate
#[derive(Debug, Default)]
pub struct PropertyCache {
    entries: HashMap<PathBuf, PropertySet>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tagged properties of `doc`, parsed at most once per cache lifetime.
    ///
    /// A document without a header, or with a header that fails to parse,
    /// reads as an empty set. IO failures propagate.
    pub fn properties<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        doc: &DocumentRef,
    ) -> Result<PropertySet> {
        if let Some(set) = self.entries.get(doc.path()) {
            return Ok(set.clone());
        }
        let mapping = match store.header_mapping(doc) {
            Ok(mapping) => mapping.unwrap_or_default(),
            Err(PropError::InvalidHeader { .. }) => IndexMap::new(),
            Err(e) => return Err(e),
        };
        let set = codec::tag(&mapping);
        self.entries.insert(doc.path().to_path_buf(), set.clone());
        Ok(set)
    }

    /// Drop the memoized entry for `doc`, typically after writing it.
    pub fn invalidate(&mut self, doc: &DocumentRef) {
        self.entries.remove(doc.path());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
