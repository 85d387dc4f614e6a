//! Show command implementation.

use crate::cli::args::ShowArgs;
use crate::cli::output::Output;
use crate::codec::{self, TaggedValue, TypeTag};
use crate::error::{ExitCode, PropError, Result};
use crate::parser;
use crate::store::{DocumentStore, VaultStore};
use crate::types::DisplayType;
use serde::Serialize;
use serde_yaml::Value;

#[derive(Debug, Serialize)]
struct PropertyView {
    key: String,
    #[serde(rename = "type")]
    tag: TypeTag,
    display: DisplayType,
    value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_text: Option<String>,
}

pub fn run(store: &VaultStore, args: &ShowArgs, output: &Output) -> Result<ExitCode> {
    let doc = store.normalize_doc_path(&args.path);
    let content = store.read(&doc)?;
    let Some(mapping) = parser::parse_header_with_path(&content, doc.path())? else {
        return Err(PropError::InvalidHeader {
            path: doc.path().to_path_buf(),
            message: "document has no header".to_string(),
        });
    };

    if let Some(key) = &args.key {
        let Some(value) = mapping.get(key) else {
            return Err(PropError::Other(format!(
                "property '{}' not found in {}",
                key, doc
            )));
        };
        if args.types {
            output.print(&view_of(key, value))?;
        } else {
            output.print(value)?;
        }
        return Ok(ExitCode::Success);
    }

    if args.types {
        let views: Vec<PropertyView> = mapping.iter().map(|(k, v)| view_of(k, v)).collect();
        output.print(&views)?;
    } else {
        output.print(&mapping)?;
    }
    Ok(ExitCode::Success)
}

fn view_of(key: &str, value: &Value) -> PropertyView {
    let prop = codec::tag_value(value);
    let original_text = match &prop.value {
        TaggedValue::Scalar { original_text, .. } => original_text.clone(),
        _ => None,
    };
    PropertyView {
        key: key.to_string(),
        tag: prop.tag,
        display: codec::detect_display_type(value),
        value: value.clone(),
        original_text,
    }
}
