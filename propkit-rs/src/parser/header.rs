//! Structured header parsing and replacement.
//!
//! A header is a block at the very top of a document, fenced above and below
//! by lines consisting of exactly three dashes. Text between the fences is
//! YAML; everything after the closing fence is the body.

use crate::codec::key_to_string;
use crate::error::{PropError, Result};
use indexmap::IndexMap;
use serde_yaml::Value;
use std::path::Path;

/// A document split into header text and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSplit<'a> {
    /// Raw header text between the fences, `None` when there is no header.
    pub raw: Option<&'a str>,
    /// Everything after the closing fence, or the whole document.
    pub body: &'a str,
}

/// Split a document into header and body.
///
/// The header must start on the very first line. A document whose opening
/// fence is never closed counts as having no header.
pub fn split_header(content: &str) -> HeaderSplit<'_> {
    let no_header = HeaderSplit {
        raw: None,
        body: content,
    };

    let Some(first_line_end) = content.find('\n') else {
        return no_header;
    };
    if content[..first_line_end].trim_end_matches('\r') != "---" {
        return no_header;
    }

    let mut pos = first_line_end + 1;
    while pos <= content.len() {
        let line_end = content[pos..].find('\n').map(|i| pos + i);
        let line = match line_end {
            Some(end) => &content[pos..end],
            None => &content[pos..],
        };
        if line.trim_end_matches('\r') == "---" {
            let raw = &content[first_line_end + 1..pos];
            let body = match line_end {
                Some(end) => &content[end + 1..],
                None => "",
            };
            return HeaderSplit {
                raw: Some(raw),
                body,
            };
        }
        match line_end {
            Some(end) => pos = end + 1,
            None => break,
        }
    }

    no_header
}

/// Parse the header of a document into an ordered mapping.
///
/// Returns `None` when the document has no header. A header that is valid
/// YAML but not a mapping yields an empty mapping.
pub fn parse_header(content: &str) -> Result<Option<IndexMap<String, Value>>> {
    parse_header_with_path(content, Path::new("<content>"))
}

/// Like [`parse_header`], attributing parse failures to `path`.
pub fn parse_header_with_path(
    content: &str,
    path: &Path,
) -> Result<Option<IndexMap<String, Value>>> {
    let Some(raw) = split_header(content).raw else {
        return Ok(None);
    };
    let value: Value = serde_yaml::from_str(raw).map_err(|e| PropError::InvalidHeader {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Some(mapping_entries(value)))
}

fn mapping_entries(value: Value) -> IndexMap<String, Value> {
    let mut entries = IndexMap::new();
    if let Value::Mapping(map) = value {
        for (k, v) in map {
            entries.insert(key_to_string(&k), v);
        }
    }
    entries
}

/// Replace the document's header block with `header_body`, or prepend one if
/// the document has none. An empty body removes the block entirely.
pub fn replace_header(content: &str, header_body: &str) -> String {
    let split = split_header(content);
    if header_body.is_empty() {
        return split.body.to_string();
    }
    format!("---\n{}---\n{}", header_body, split.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_no_header() {
        let content = "Just some text\nwith multiple lines";
        let split = split_header(content);
        assert_eq!(split.raw, None);
        assert_eq!(split.body, content);
    }

    #[test]
    fn test_split_with_header() {
        let content = "---\ntitle: Test\ntags:\n  - a\n---\n\nBody text";
        let split = split_header(content);
        assert_eq!(split.raw, Some("title: Test\ntags:\n  - a\n"));
        assert_eq!(split.body, "\nBody text");
    }

    #[test]
    fn test_split_header_only_document() {
        let content = "---\ntitle: Test\n---";
        let split = split_header(content);
        assert_eq!(split.raw, Some("title: Test\n"));
        assert_eq!(split.body, "");
    }

    #[test]
    fn test_split_unclosed_fence() {
        let content = "---\ntitle: Test\nno closing fence";
        let split = split_header(content);
        assert_eq!(split.raw, None);
        assert_eq!(split.body, content);
    }

    #[test]
    fn test_split_fence_not_at_top() {
        let content = "intro\n---\ntitle: Test\n---\n";
        assert_eq!(split_header(content).raw, None);
    }

    #[test]
    fn test_split_dashes_in_body() {
        let content = "---\na: 1\n---\ntext\n---\nmore";
        let split = split_header(content);
        assert_eq!(split.raw, Some("a: 1\n"));
        assert_eq!(split.body, "text\n---\nmore");
    }

    #[test]
    fn test_split_crlf_fences() {
        let content = "---\r\na: 1\r\n---\r\nBody";
        let split = split_header(content);
        assert_eq!(split.raw, Some("a: 1\r\n"));
        assert_eq!(split.body, "Body");
    }

    #[test]
    fn test_split_four_dashes_is_not_a_fence() {
        let content = "----\na: 1\n---\n";
        assert_eq!(split_header(content).raw, None);
    }

    #[test]
    fn test_parse_header_entries_in_order() {
        let content = "---\nzeta: 1\nalpha: 2\nmid: 3\n---\nBody";
        let entries = parse_header(content).unwrap().unwrap();
        let keys: Vec<&String> = entries.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(entries["alpha"], Value::Number(2.into()));
    }

    #[test]
    fn test_parse_no_header() {
        assert_eq!(parse_header("plain text").unwrap(), None);
    }

    #[test]
    fn test_parse_empty_header() {
        let entries = parse_header("---\n---\nBody").unwrap().unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_non_mapping_header_degrades() {
        let entries = parse_header("---\njust a scalar\n---\n").unwrap().unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_invalid_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\n";
        let err = parse_header_with_path(content, Path::new("bad.md")).unwrap_err();
        match err {
            PropError::InvalidHeader { path, .. } => {
                assert_eq!(path, Path::new("bad.md"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_numeric_key_becomes_string() {
        let entries = parse_header("---\n2024: done\n---\n").unwrap().unwrap();
        assert!(entries.contains_key("2024"));
    }

    #[test]
    fn test_replace_existing_header() {
        let content = "---\nold: 1\n---\nBody";
        let updated = replace_header(content, "new: 2\n");
        assert_eq!(updated, "---\nnew: 2\n---\nBody");
    }

    #[test]
    fn test_replace_prepends_when_missing() {
        let updated = replace_header("Body only", "a: 1\n");
        assert_eq!(updated, "---\na: 1\n---\nBody only");
    }

    #[test]
    fn test_replace_with_empty_removes_header() {
        let content = "---\nold: 1\n---\nBody";
        assert_eq!(replace_header(content, ""), "Body");
    }

    #[test]
    fn test_replace_round_trips_through_split() {
        let updated = replace_header("Body", "k: v\n");
        let split = split_header(&updated);
        assert_eq!(split.raw, Some("k: v\n"));
        assert_eq!(split.body, "Body");
    }
}
