//! Propkit - A library for bulk-managing structured header properties in
//! Obsidian-style vaults.
//!
//! # Overview
//!
//! Propkit provides a programmatic interface to the `---`-fenced property
//! headers of markdown documents, enabling:
//! - Type-preserving property round-trips (a string `"007"` stays a string)
//! - Header serialization in the editor's own style (block scalars, block lists)
//! - Template application across many documents (below/above/replace, with
//!   per-key override control and per-document failure isolation)
//! - Vault-wide key aggregation (usage counts, examples, shared key order)
//! - Key reordering when every scanned document agrees on the key set
//!
//! # Example
//!
//! ```no_run
//! use propkit::{DocumentRef, PropertyCache, VaultStore};
//! use propkit::merge::{apply_template, ApplyOptions};
//!
//! // Open a vault
//! let mut store = VaultStore::open("/path/to/vault").unwrap();
//! let mut cache = PropertyCache::new();
//!
//! // Apply a template's properties to every document
//! let template = DocumentRef::new("templates/daily.md");
//! let targets = store.list_documents().unwrap();
//! let report = apply_template(&mut store, &template, &targets, &ApplyOptions::default(), &mut cache).unwrap();
//! println!("applied {} of {}", report.applied, report.attempted);
//! ```

pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod merge;
pub mod parser;
pub mod select;
pub mod serializer;
pub mod store;
pub mod types;

// Re-export main types at crate root
pub use cache::PropertyCache;
pub use codec::{PropertySet, TaggedProperty, TaggedValue, TypeTag};
pub use config::Config;
pub use error::{PropError, Result};
pub use merge::{ApplyOptions, MergePolicy, Positioning};
pub use store::{DocumentStore, MemoryStore, VaultStore};
pub use types::*;
