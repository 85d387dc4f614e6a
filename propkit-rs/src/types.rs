//! Shared types used across propkit.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Reference to a document, as a path relative to the vault root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(PathBuf);

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DocumentRef(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Where the template document is looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TemplateSource {
    /// A single document used directly as the template.
    Document { path: PathBuf },
    /// A directory expected to hold exactly one template document.
    Directory { path: PathBuf, recursive: bool },
}

/// Presentation type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Text,
    List,
    Number,
    Checkbox,
    Date,
    Datetime,
}

/// Status of one document in a batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The document was rewritten.
    Applied,
    /// A dry run; the rendered result is in `preview`.
    Planned,
    /// The document could not be processed.
    Failed,
}

/// Outcome of one document in a batch operation.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub path: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl DocumentOutcome {
    pub fn applied(doc: &DocumentRef) -> Self {
        DocumentOutcome {
            path: doc.to_string(),
            status: OutcomeStatus::Applied,
            error: None,
            preview: None,
        }
    }

    pub fn planned(doc: &DocumentRef, preview: String) -> Self {
        DocumentOutcome {
            path: doc.to_string(),
            status: OutcomeStatus::Planned,
            error: None,
            preview: Some(preview),
        }
    }

    pub fn failed(doc: &DocumentRef, error: String) -> Self {
        DocumentOutcome {
            path: doc.to_string(),
            status: OutcomeStatus::Failed,
            error: Some(error),
            preview: None,
        }
    }
}

/// Report for a sequential batch operation.
///
/// `attempted` counts every processed document, `applied` the subset that
/// succeeded. Skipped documents (the template itself) appear in neither.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub applied: usize,
    pub attempted: usize,
    pub outcomes: Vec<DocumentOutcome>,
    pub completed_at: String,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: DocumentOutcome) {
        self.attempted += 1;
        if outcome.status != OutcomeStatus::Failed {
            self.applied += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Stamp the completion time and return the finished report.
    pub fn finish(mut self) -> Self {
        self.completed_at = Utc::now().to_rfc3339();
        self
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.applied
    }

    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Failed)
    }
}
