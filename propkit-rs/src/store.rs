//! Document storage.

use crate::error::{PropError, Result};
use crate::parser;
use crate::types::DocumentRef;
use glob::glob;
use indexmap::IndexMap;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Access to document text and parsed headers.
///
/// The merge engine and the aggregator only ever touch documents through
/// this trait, so a different backing (or failure injection in tests) plugs
/// in here.
pub trait DocumentStore {
    /// Full text of a document.
    fn read(&self, doc: &DocumentRef) -> Result<String>;

    /// Replace a document's full text.
    fn write(&mut self, doc: &DocumentRef, text: &str) -> Result<()>;

    /// Parsed header mapping, `None` when the document has no header.
    fn header_mapping(&self, doc: &DocumentRef) -> Result<Option<IndexMap<String, Value>>> {
        let content = self.read(doc)?;
        parser::parse_header_with_path(&content, doc.path())
    }
}

/// Filesystem-backed store rooted at a vault directory.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    /// Open a vault at the given root directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(PropError::VaultNotFound(root));
        }
        Ok(VaultStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a document inside the vault.
    pub fn full_path(&self, doc: &DocumentRef) -> PathBuf {
        self.root.join(doc.path())
    }

    /// Normalize a user-supplied document path, appending `.md` when the
    /// extension is missing.
    pub fn normalize_doc_path(&self, path: &str) -> DocumentRef {
        if path.ends_with(".md") {
            DocumentRef::new(path)
        } else {
            DocumentRef::new(format!("{path}.md"))
        }
    }

    pub fn exists(&self, doc: &DocumentRef) -> bool {
        self.full_path(doc).is_file()
    }

    /// List every document in the vault, sorted by path. Hidden directories
    /// and files (dot-prefixed) are skipped.
    pub fn list_documents(&self) -> Result<Vec<DocumentRef>> {
        self.list_matching("**/*.md")
    }

    /// List documents matching a glob pattern relative to the vault root.
    pub fn list_matching(&self, pattern: &str) -> Result<Vec<DocumentRef>> {
        let full_pattern = self.root.join(pattern);
        let full_pattern = full_pattern.to_string_lossy();

        let mut paths = Vec::new();
        for entry in glob(&full_pattern)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                        continue;
                    }
                    let Ok(relative) = path.strip_prefix(&self.root) else {
                        continue;
                    };
                    if is_hidden(relative) {
                        continue;
                    }
                    paths.push(relative.to_path_buf());
                }
                Err(e) => eprintln!("Warning: error reading path: {}", e),
            }
        }
        paths.sort();
        Ok(paths.into_iter().map(DocumentRef::new).collect())
    }
}

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| s.starts_with('.') && s != "." && s != "..")
    })
}

impl DocumentStore for VaultStore {
    fn read(&self, doc: &DocumentRef) -> Result<String> {
        let path = self.full_path(doc);
        if !path.is_file() {
            return Err(PropError::DocumentNotFound(doc.path().to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write(&mut self, doc: &DocumentRef, text: &str) -> Result<()> {
        let path = self.full_path(doc);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(fs::write(path, text)?)
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: BTreeMap<PathBuf, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.docs.insert(path.into(), text.into());
    }

    pub fn text(&self, path: impl AsRef<Path>) -> Option<&String> {
        self.docs.get(path.as_ref())
    }

    pub fn documents(&self) -> impl Iterator<Item = DocumentRef> + '_ {
        self.docs.keys().map(DocumentRef::new)
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, doc: &DocumentRef) -> Result<String> {
        self.docs
            .get(doc.path())
            .cloned()
            .ok_or_else(|| PropError::DocumentNotFound(doc.path().to_path_buf()))
    }

    fn write(&mut self, doc: &DocumentRef, text: &str) -> Result<()> {
        self.docs.insert(doc.path().to_path_buf(), text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_vault() -> (TempDir, VaultStore) {
        let temp = TempDir::new().unwrap();
        let store = VaultStore::open(temp.path()).unwrap();
        (temp, store)
    }

    #[test]
    fn test_open_missing_root_fails() {
        let result = VaultStore::open("/nonexistent/vault/path");
        assert!(matches!(result, Err(PropError::VaultNotFound(_))));
    }

    #[test]
    fn test_read_write_round_trip() {
        let (_temp, mut store) = setup_test_vault();
        let doc = DocumentRef::new("note.md");
        store.write(&doc, "---\na: 1\n---\nBody").unwrap();
        assert_eq!(store.read(&doc).unwrap(), "---\na: 1\n---\nBody");
    }

    #[test]
    fn test_read_missing_document() {
        let (_temp, store) = setup_test_vault();
        let result = store.read(&DocumentRef::new("missing.md"));
        assert!(matches!(result, Err(PropError::DocumentNotFound(_))));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let (_temp, mut store) = setup_test_vault();
        let doc = DocumentRef::new("deep/nested/note.md");
        store.write(&doc, "content").unwrap();
        assert!(store.exists(&doc));
    }

    #[test]
    fn test_normalize_doc_path() {
        let (_temp, store) = setup_test_vault();
        assert_eq!(
            store.normalize_doc_path("note"),
            DocumentRef::new("note.md")
        );
        assert_eq!(
            store.normalize_doc_path("note.md"),
            DocumentRef::new("note.md")
        );
    }

    #[test]
    fn test_list_documents_sorted_and_filtered() {
        let (_temp, mut store) = setup_test_vault();
        store.write(&DocumentRef::new("b.md"), "b").unwrap();
        store.write(&DocumentRef::new("a.md"), "a").unwrap();
        store.write(&DocumentRef::new("sub/c.md"), "c").unwrap();
        store
            .write(&DocumentRef::new(".hidden/skip.md"), "hidden")
            .unwrap();

        let docs = store.list_documents().unwrap();
        let names: Vec<String> = docs.iter().map(|d| d.to_string()).collect();
        assert_eq!(names, ["a.md", "b.md", "sub/c.md"]);
    }

    #[test]
    fn test_list_matching_pattern() {
        let (_temp, mut store) = setup_test_vault();
        store.write(&DocumentRef::new("daily/one.md"), "1").unwrap();
        store.write(&DocumentRef::new("daily/two.md"), "2").unwrap();
        store.write(&DocumentRef::new("other.md"), "3").unwrap();

        let docs = store.list_matching("daily/*.md").unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_header_mapping_through_store() {
        let (_temp, mut store) = setup_test_vault();
        let doc = DocumentRef::new("note.md");
        store
            .write(&doc, "---\ntitle: Hello\ncount: 2\n---\nBody")
            .unwrap();

        let mapping = store.header_mapping(&doc).unwrap().unwrap();
        assert_eq!(mapping["title"], Value::String("Hello".to_string()));
        assert_eq!(mapping["count"], Value::Number(2.into()));
    }

    #[test]
    fn test_header_mapping_none_without_header() {
        let (_temp, mut store) = setup_test_vault();
        let doc = DocumentRef::new("plain.md");
        store.write(&doc, "no header here").unwrap();
        assert_eq!(store.header_mapping(&doc).unwrap(), None);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let doc = DocumentRef::new("a.md");
        store.write(&doc, "---\nx: 1\n---\n").unwrap();
        assert_eq!(store.read(&doc).unwrap(), "---\nx: 1\n---\n");
        assert_eq!(store.documents().count(), 1);
    }
}
