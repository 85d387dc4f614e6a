//! Parsing utilities for documents.

pub mod header;

pub use header::{HeaderSplit, parse_header, parse_header_with_path, replace_header, split_header};
