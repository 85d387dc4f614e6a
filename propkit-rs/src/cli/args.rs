//! CLI argument definitions using clap.

use crate::merge::Positioning;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "propkit")]
#[command(
    version,
    about = "Bulk-manage structured header properties in Obsidian-style vaults"
)]
pub struct Cli {
    /// Path to the vault (defaults to config, then the current directory)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }
}

/// Output format for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a document's properties
    Show(ShowArgs),
    /// Merge a template's properties into target documents
    Apply(ApplyArgs),
    /// Aggregate property usage across documents
    Scan(ScanArgs),
    /// Rewrite headers to a common key order
    Reorder(ReorderArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Document path or name
    pub path: String,

    /// Show a single property
    #[arg(long)]
    pub key: Option<String>,

    /// Include semantic types and preserved source text
    #[arg(long)]
    pub types: bool,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Template document path, or a directory with --dir
    pub template: String,

    /// Treat TEMPLATE as a directory holding the template document
    #[arg(long)]
    pub dir: bool,

    /// Search the template directory recursively
    #[arg(long, requires = "dir")]
    pub recursive: bool,

    /// Target document (repeatable; default: every document)
    #[arg(long = "target", value_name = "PATH")]
    pub targets: Vec<String>,

    /// Glob pattern selecting targets (repeatable)
    #[arg(long = "glob", value_name = "PATTERN")]
    pub globs: Vec<String>,

    /// Template key to apply (repeatable; default: all template keys)
    #[arg(long = "key", value_name = "KEY")]
    pub keys: Vec<String>,

    /// Where template keys land relative to existing ones
    #[arg(long, value_enum, default_value_t = PositionArg::Below)]
    pub position: PositionArg,

    /// Take every selected value from the template
    #[arg(long)]
    pub override_all: bool,

    /// Key whose value always comes from the template (repeatable)
    #[arg(long = "override", value_name = "KEY")]
    pub overrides: Vec<String>,

    /// Render results without writing them
    #[arg(long)]
    pub dry_run: bool,
}

/// CLI spelling of the positioning modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PositionArg {
    /// Existing keys keep their order, template keys are appended
    Below,
    /// Template keys come first
    Above,
    /// The header becomes the template selection only
    Replace,
}

impl From<PositionArg> for Positioning {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::Below => Positioning::Below,
            PositionArg::Above => Positioning::Above,
            PositionArg::Replace => Positioning::Remove,
        }
    }
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Glob pattern narrowing the scanned documents (repeatable)
    #[arg(long = "glob", value_name = "PATTERN")]
    pub globs: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// Glob pattern narrowing the reordered documents (repeatable)
    #[arg(long = "glob", value_name = "PATTERN")]
    pub globs: Vec<String>,

    /// Comma-separated key order (default: discovery order)
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    pub order: Vec<String>,

    /// Render results without writing them
    #[arg(long)]
    pub dry_run: bool,
}
