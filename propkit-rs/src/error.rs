//! Error types and exit codes for propkit.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes for the CLI.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const DOCUMENT_NOT_FOUND: i32 = 2;
    pub const TEMPLATE_NOT_FOUND: i32 = 3;
    pub const INVALID_SELECTION: i32 = 4;
    pub const INVALID_HEADER: i32 = 5;
    pub const REORDER_REFUSED: i32 = 6;
    pub const PARTIAL_FAILURE: i32 = 10;
}

/// Main error type for propkit operations.
#[derive(Error, Debug)]
pub enum PropError {
    #[error("Vault not found at: {0}")]
    VaultNotFound(PathBuf),

    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("No template document found under: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Ambiguous template source: {count} documents under {path}")]
    AmbiguousTemplate { path: PathBuf, count: usize },

    #[error("Invalid header in {path}: {message}")]
    InvalidHeader { path: PathBuf, message: String },

    #[error("Selected keys not present in template: {0}")]
    UnknownSelection(String),

    #[error("Documents do not share a common key set; reorder refused")]
    ReorderRefused,

    #[error("Invalid key order: {0}")]
    InvalidOrder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("{0}")]
    Other(String),
}

impl PropError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PropError::DocumentNotFound(_) => exit_code::DOCUMENT_NOT_FOUND,
            PropError::TemplateNotFound(_) | PropError::AmbiguousTemplate { .. } => {
                exit_code::TEMPLATE_NOT_FOUND
            }
            PropError::UnknownSelection(_) | PropError::InvalidOrder(_) => {
                exit_code::INVALID_SELECTION
            }
            PropError::InvalidHeader { .. } => exit_code::INVALID_HEADER,
            PropError::ReorderRefused => exit_code::REORDER_REFUSED,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Result type alias for propkit operations.
pub type Result<T> = std::result::Result<T, PropError>;

/// Exit code for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    GeneralError,
    DocumentNotFound,
    TemplateNotFound,
    InvalidSelection,
    InvalidHeader,
    ReorderRefused,
    PartialFailure,
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
            ExitCode::GeneralError => exit_code::GENERAL_ERROR,
            ExitCode::DocumentNotFound => exit_code::DOCUMENT_NOT_FOUND,
            ExitCode::TemplateNotFound => exit_code::TEMPLATE_NOT_FOUND,
            ExitCode::InvalidSelection => exit_code::INVALID_SELECTION,
            ExitCode::InvalidHeader => exit_code::INVALID_HEADER,
            ExitCode::ReorderRefused => exit_code::REORDER_REFUSED,
            ExitCode::PartialFailure => exit_code::PARTIAL_FAILURE,
        }
    }
}
