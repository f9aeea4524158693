//! Document input and indexed output for mapper parsing.
//!
//! A [`Document`] is the flattened field-name/value cursor a mapping tree parses.
//! Nested JSON objects are flattened into dotted names, so `{"title": {"raw": "x"}}`
//! exposes the field `title.raw`. Parsing produces a [`ParsedDocument`], the ordered
//! list of values each leaf field extracted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ParseError;
use crate::path::{ContentPath, SEPARATOR};

/// A single typed value extracted from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Long(i64),
    Double(f64),
    Text(String),
}

impl FieldValue {
    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is a long value.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            FieldValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the number if this is a double value.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            FieldValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the flag if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// A value indexed under a qualified field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedField {
    pub name: String,
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stored: bool,
}

/// The flattened fields of one incoming document, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a JSON object into a document.
    ///
    /// Nested objects contribute their fields under dotted names. Arrays and scalars
    /// are kept as the value of the enclosing name.
    pub fn from_json(source: &Value) -> Result<Self, ParseError> {
        let Value::Object(object) = source else {
            return Err(ParseError::NotAnObject {
                found: json_kind(source).to_string(),
            });
        };
        let mut document = Document::new();
        flatten_into(&mut document.fields, None, object);
        Ok(document)
    }

    /// Appends a field.
    pub fn push(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_mut(name, value);
        self
    }

    /// Mutable reference version of [`Document::push`].
    pub fn push_mut(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Every value stored under exactly `name`, in source order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.fields
            .iter()
            .filter(move |(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterates all `(name, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn flatten_into(out: &mut Vec<(String, Value)>, prefix: Option<&str>, object: &serde_json::Map<String, Value>) {
    for (key, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}{SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) => flatten_into(out, Some(&name), inner),
            other => out.push((name, other.clone())),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The values extracted from one document, in the order mappers produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    fields: Vec<IndexedField>,
}

impl ParsedDocument {
    /// All indexed values.
    pub fn fields(&self) -> &[IndexedField] {
        &self.fields
    }

    /// The values indexed under `name`.
    pub fn get(&self, name: &str) -> Vec<&FieldValue> {
        self.fields
            .iter()
            .filter(|f| f.name == name)
            .map(|f| &f.value)
            .collect()
    }

    /// Whether any value was indexed under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Number of indexed values.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<IndexedField> {
        self.fields
    }
}

/// State threaded through one document parse.
///
/// Carries the document being read, the [`ContentPath`] of the mapper currently
/// parsing, and the values indexed so far.
#[derive(Debug)]
pub struct ParseContext<'a> {
    document: &'a Document,
    path: ContentPath,
    parsed: ParsedDocument,
}

impl<'a> ParseContext<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            path: ContentPath::new(),
            parsed: ParsedDocument::default(),
        }
    }

    /// The document being parsed.
    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn path(&self) -> &ContentPath {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut ContentPath {
        &mut self.path
    }

    /// Records an indexed value.
    pub fn add_field(&mut self, field: IndexedField) {
        self.parsed.fields.push(field);
    }

    /// Values indexed so far.
    pub fn parsed(&self) -> &ParsedDocument {
        &self.parsed
    }

    pub fn into_parsed(self) -> ParsedDocument {
        self.parsed
    }
}
