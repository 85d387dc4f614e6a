//! Type-preserving property codec.
//!
//! Values read out of a header carry both a parsed representation and a
//! semantic type tag. Strings whose parsed form would not write back to the
//! same literal (`"007"`, `"1.50"`, `"+42"`) additionally keep their exact
//! source text, so a tag/restore cycle never changes what a document says.

use crate::types::DisplayType;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::sync::LazyLock;

// Calendar date: YYYY-MM-DD and nothing else.
static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

// Datetime: date followed by a T and at least hours and minutes.
static DATETIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}").unwrap());

// Integer or decimal with an optional sign, for display classification.
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").unwrap());

/// Semantic type assigned to a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Null,
    String,
    Number,
    Boolean,
    Array,
    Object,
}

/// A value in tagged form. Lists and mappings are tagged per element so
/// source text survives at any nesting depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaggedValue {
    /// A scalar plus, when its literal form is ambiguous, the source text.
    Scalar {
        value: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        original_text: Option<String>,
    },
    List(Vec<TaggedValue>),
    Mapping(IndexMap<String, TaggedValue>),
}

/// A property value together with its semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedProperty {
    #[serde(rename = "type")]
    pub tag: TypeTag,
    pub value: TaggedValue,
}

/// An ordered mapping from property key to tagged value.
///
/// Iteration order is the order the header is written in. Keys are
/// case-sensitive and unique; inserting an existing key replaces its value
/// and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(IndexMap<String, TaggedProperty>);

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, prop: TaggedProperty) {
        self.0.insert(key, prop);
    }

    pub fn get(&self, key: &str) -> Option<&TaggedProperty> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TaggedProperty)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append every entry of `other`, replacing values of shared keys in
    /// place.
    pub fn extend_from(&mut self, other: &PropertySet) {
        for (key, prop) in other.iter() {
            self.insert(key.clone(), prop.clone());
        }
    }
}

impl FromIterator<(String, TaggedProperty)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (String, TaggedProperty)>>(iter: I) -> Self {
        PropertySet(iter.into_iter().collect())
    }
}

/// Semantic type of a value. A pure function of the value's shape.
pub fn detect_type(value: &Value) -> TypeTag {
    match value {
        Value::Null => TypeTag::Null,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Number(_) => TypeTag::Number,
        Value::String(_) => TypeTag::String,
        Value::Sequence(_) => TypeTag::Array,
        Value::Mapping(_) => TypeTag::Object,
        // Unrecognized shapes degrade to text.
        Value::Tagged(_) => TypeTag::String,
    }
}

/// Classify a value for presentation purposes only. Never affects what is
/// written back.
pub fn detect_display_type(value: &Value) -> DisplayType {
    match value {
        Value::Null => DisplayType::Text,
        Value::Bool(_) => DisplayType::Checkbox,
        Value::Number(_) => DisplayType::Number,
        Value::Sequence(_) => DisplayType::List,
        Value::String(s) => {
            if NUMERIC.is_match(s) {
                DisplayType::Number
            } else if DATETIME.is_match(s) {
                DisplayType::Datetime
            } else if DATE.is_match(s) {
                DisplayType::Date
            } else {
                DisplayType::Text
            }
        }
        Value::Mapping(_) | Value::Tagged(_) => DisplayType::Text,
    }
}

/// True when the string parses cleanly as a number, meaning a naive
/// re-serialization would lose its literal form.
pub(crate) fn parses_as_number(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

/// Render a mapping key as the string form it takes in a header.
pub(crate) fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Tag a parsed header mapping into a [`PropertySet`].
pub fn tag(properties: &IndexMap<String, Value>) -> PropertySet {
    properties
        .iter()
        .map(|(key, value)| (key.clone(), tag_value(value)))
        .collect()
}

/// Tag a single value. Total: any input yields a tagged result.
pub fn tag_value(value: &Value) -> TaggedProperty {
    TaggedProperty {
        tag: detect_type(value),
        value: tag_tree(value),
    }
}

fn tag_tree(value: &Value) -> TaggedValue {
    match value {
        Value::Sequence(items) => TaggedValue::List(items.iter().map(tag_tree).collect()),
        Value::Mapping(map) => {
            let mut entries = IndexMap::new();
            for (k, v) in map {
                entries.insert(key_to_string(k), tag_tree(v));
            }
            TaggedValue::Mapping(entries)
        }
        Value::String(s) if parses_as_number(s) => TaggedValue::Scalar {
            value: value.clone(),
            original_text: Some(s.clone()),
        },
        other => TaggedValue::Scalar {
            value: other.clone(),
            original_text: None,
        },
    }
}

/// Restore a tagged set to a plain header mapping. Inverse of [`tag`].
pub fn restore(set: &PropertySet) -> IndexMap<String, Value> {
    set.iter()
        .map(|(key, prop)| (key.clone(), restore_value(prop)))
        .collect()
}

/// Restore one tagged property, preferring preserved source text over a
/// recomputed literal.
pub fn restore_value(prop: &TaggedProperty) -> Value {
    restore_tree(&prop.value)
}

fn restore_tree(value: &TaggedValue) -> Value {
    match value {
        TaggedValue::Scalar {
            original_text: Some(text),
            ..
        } => Value::String(text.clone()),
        TaggedValue::Scalar { value, .. } => value.clone(),
        TaggedValue::List(items) => Value::Sequence(items.iter().map(restore_tree).collect()),
        TaggedValue::Mapping(entries) => {
            let mut map = serde_yaml::Mapping::new();
            for (k, v) in entries {
                map.insert(Value::String(k.clone()), restore_tree(v));
            }
            Value::Mapping(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping_of(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_detect_type_shapes() {
        assert_eq!(detect_type(&Value::Null), TypeTag::Null);
        assert_eq!(detect_type(&Value::Bool(true)), TypeTag::Boolean);
        assert_eq!(detect_type(&Value::Number(7.into())), TypeTag::Number);
        assert_eq!(
            detect_type(&Value::String("hi".to_string())),
            TypeTag::String
        );
        assert_eq!(detect_type(&Value::Sequence(vec![])), TypeTag::Array);
        assert_eq!(
            detect_type(&Value::Mapping(serde_yaml::Mapping::new())),
            TypeTag::Object
        );
    }

    #[test]
    fn test_display_type_null_is_text() {
        assert_eq!(detect_display_type(&Value::Null), DisplayType::Text);
    }

    #[test]
    fn test_display_type_scalars() {
        assert_eq!(
            detect_display_type(&Value::Bool(false)),
            DisplayType::Checkbox
        );
        assert_eq!(
            detect_display_type(&Value::Number(3.into())),
            DisplayType::Number
        );
        assert_eq!(
            detect_display_type(&Value::Sequence(vec![Value::Null])),
            DisplayType::List
        );
    }

    #[test]
    fn test_display_type_string_patterns() {
        let cases = [
            ("007", DisplayType::Number),
            ("-1.5", DisplayType::Number),
            ("+42", DisplayType::Number),
            ("2024-03-01", DisplayType::Date),
            ("2024-03-01T09:30", DisplayType::Datetime),
            ("2024-03-01T09:30:15Z", DisplayType::Datetime),
            ("2024-3-1", DisplayType::Text),
            ("1e5", DisplayType::Text),
            ("hello", DisplayType::Text),
            ("", DisplayType::Text),
        ];
        for (input, expected) in cases {
            assert_eq!(
                detect_display_type(&Value::String(input.to_string())),
                expected,
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_tag_preserves_numeric_string() {
        let prop = tag_value(&Value::String("007".to_string()));
        assert_eq!(prop.tag, TypeTag::String);
        match &prop.value {
            TaggedValue::Scalar { original_text, .. } => {
                assert_eq!(original_text.as_deref(), Some("007"));
            }
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn test_tag_plain_string_has_no_original() {
        let prop = tag_value(&Value::String("hello".to_string()));
        match &prop.value {
            TaggedValue::Scalar { original_text, .. } => assert!(original_text.is_none()),
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn test_genuine_number_vs_numeric_string() {
        let number = tag_value(&Value::Number(7.into()));
        assert_eq!(number.tag, TypeTag::Number);

        let string = tag_value(&Value::String("7".to_string()));
        assert_eq!(string.tag, TypeTag::String);
        assert_eq!(restore_value(&string), Value::String("7".to_string()));
        assert_eq!(restore_value(&number), Value::Number(7.into()));
    }

    #[test]
    fn test_round_trip_numeric_string() {
        let props = mapping_of(&[("id", Value::String("007".to_string()))]);
        let restored = restore(&tag(&props));
        assert_eq!(restored["id"], Value::String("007".to_string()));
    }

    #[test]
    fn test_round_trip_list_elements() {
        let list = Value::Sequence(vec![
            Value::String("007".to_string()),
            Value::String("plain".to_string()),
            Value::Number(3.into()),
        ]);
        let props = mapping_of(&[("items", list.clone())]);
        let restored = restore(&tag(&props));
        assert_eq!(restored["items"], list);
    }

    #[test]
    fn test_round_trip_nested_mapping() {
        let mut inner = serde_yaml::Mapping::new();
        inner.insert(
            Value::String("version".to_string()),
            Value::String("1.50".to_string()),
        );
        inner.insert(Value::String("count".to_string()), Value::Number(2.into()));
        let props = mapping_of(&[("meta", Value::Mapping(inner.clone()))]);
        let restored = restore(&tag(&props));
        assert_eq!(restored["meta"], Value::Mapping(inner));
    }

    #[test]
    fn test_retag_is_idempotent() {
        let props = mapping_of(&[
            ("id", Value::String("+42".to_string())),
            ("done", Value::Bool(true)),
            ("note", Value::Null),
        ]);
        let once = tag(&props);
        let twice = tag(&restore(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_tag_preserves_key_order() {
        let props = mapping_of(&[
            ("zeta", Value::Null),
            ("alpha", Value::Null),
            ("mid", Value::Null),
        ]);
        let set = tag(&props);
        let keys: Vec<&String> = set.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insert_existing_key_keeps_position() {
        let mut set = tag(&mapping_of(&[
            ("a", Value::Number(1.into())),
            ("b", Value::Number(2.into())),
        ]));
        set.insert("a".to_string(), tag_value(&Value::Number(9.into())));
        let keys: Vec<&String> = set.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(restore_value(set.get("a").unwrap()), Value::Number(9.into()));
    }

    #[test]
    fn test_parses_as_number_cases() {
        assert!(parses_as_number("007"));
        assert!(parses_as_number("1.50"));
        assert!(parses_as_number("+42"));
        assert!(parses_as_number(" 3 "));
        assert!(parses_as_number("1e5"));
        assert!(!parses_as_number(""));
        assert!(!parses_as_number("  "));
        assert!(!parses_as_number("abc"));
        assert!(!parses_as_number("1.2.3"));
    }
}
