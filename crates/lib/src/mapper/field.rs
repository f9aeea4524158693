//! Leaf field mappers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    FieldMapperListener, Mapper, MergeContext, ParseError,
    parse::{FieldValue, IndexedField, ParseContext, json_kind},
};

/// The declared value type of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
}

impl FieldType {
    /// The type tag used in mapping definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
        }
    }

    /// Converts a raw JSON scalar to this type.
    ///
    /// Numbers and booleans are accepted by `string` fields as their text form, and
    /// numeric or boolean fields accept their value written as a string. Anything
    /// else, including out of range integers, is rejected.
    pub fn coerce(&self, raw: &Value) -> Option<FieldValue> {
        match (self, raw) {
            (FieldType::String, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldType::String, Value::Number(n)) => Some(FieldValue::Text(n.to_string())),
            (FieldType::String, Value::Bool(b)) => Some(FieldValue::Text(b.to_string())),

            (FieldType::Integer, Value::Number(n)) => n
                .as_i64()
                .filter(|v| i32::try_from(*v).is_ok())
                .map(FieldValue::Long),
            (FieldType::Integer, Value::String(s)) => {
                s.trim().parse::<i32>().ok().map(|v| FieldValue::Long(v.into()))
            }

            (FieldType::Long, Value::Number(n)) => n.as_i64().map(FieldValue::Long),
            (FieldType::Long, Value::String(s)) => s.trim().parse::<i64>().ok().map(FieldValue::Long),

            (FieldType::Float, Value::Number(n)) => n
                .as_f64()
                .filter(|v| v.abs() <= f64::from(f32::MAX))
                .map(FieldValue::Double),
            (FieldType::Float, Value::String(s)) => {
                s.trim().parse::<f32>().ok().map(|v| FieldValue::Double(v.into()))
            }

            (FieldType::Double, Value::Number(n)) => n.as_f64().map(FieldValue::Double),
            (FieldType::Double, Value::String(s)) => {
                s.trim().parse::<f64>().ok().map(FieldValue::Double)
            }

            (FieldType::Boolean, Value::Bool(b)) => Some(FieldValue::Boolean(*b)),
            (FieldType::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Some(FieldValue::Boolean(true)),
                "false" => Some(FieldValue::Boolean(false)),
                _ => None,
            },

            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "integer" => Ok(FieldType::Integer),
            "long" => Ok(FieldType::Long),
            "float" => Ok(FieldType::Float),
            "double" => Ok(FieldType::Double),
            "boolean" => Ok(FieldType::Boolean),
            other => Err(other.to_string()),
        }
    }
}

/// A terminal mapper describing one indexable value.
///
/// Field mappers are immutable once built. `index_name` is the qualified name the
/// builder computed from the content path, and is the key the field registry uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapper {
    name: String,
    index_name: String,
    field_type: FieldType,
    store: bool,
}

impl FieldMapper {
    pub(crate) fn new(
        name: impl Into<String>,
        index_name: impl Into<String>,
        field_type: FieldType,
        store: bool,
    ) -> Self {
        Self {
            name: name.into(),
            index_name: index_name.into(),
            field_type,
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The qualified name assigned at build time.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Whether the original value is kept alongside the indexed one.
    pub fn store(&self) -> bool {
        self.store
    }

    /// Indexes every value stored under this field's qualified name.
    ///
    /// Missing fields and `null` values index nothing. Each array element is
    /// indexed as a separate value.
    pub fn parse(&self, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        let full_name = ctx.path().full_path_as_text(&self.name);
        let document = ctx.document();
        for raw in document.values(&full_name) {
            match raw {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items.iter().filter(|item| !item.is_null()) {
                        self.parse_value(&full_name, item, ctx)?;
                    }
                }
                other => self.parse_value(&full_name, other, ctx)?,
            }
        }
        Ok(())
    }

    fn parse_value(
        &self,
        full_name: &str,
        raw: &Value,
        ctx: &mut ParseContext<'_>,
    ) -> Result<(), ParseError> {
        let value = self
            .field_type
            .coerce(raw)
            .ok_or_else(|| ParseError::MalformedValue {
                field: full_name.to_string(),
                expected: self.field_type.to_string(),
                value: match raw {
                    Value::String(_) | Value::Number(_) | Value::Bool(_) => raw.to_string(),
                    other => json_kind(other).to_string(),
                },
            })?;
        tracing::trace!(field = full_name, "indexed value");
        ctx.add_field(IndexedField {
            name: full_name.to_string(),
            value,
            stored: self.store,
        });
        Ok(())
    }

    /// Checks an incoming mapper against this field.
    ///
    /// Field mappers never change during a merge, so every difference is reported
    /// as a conflict.
    pub(crate) fn merge(&self, incoming: &Mapper, ctx: &mut MergeContext<'_>) {
        let Mapper::Field(other) = incoming else {
            ctx.add_conflict(format!(
                "mapper [{}] of different type, current_type [{}], merged_type [{}]",
                self.name,
                self.field_type,
                incoming.type_name()
            ));
            return;
        };
        if self.field_type != other.field_type {
            ctx.add_conflict(format!(
                "mapper [{}] of different type, current_type [{}], merged_type [{}]",
                self.name, self.field_type, other.field_type
            ));
        }
        if self.store != other.store {
            ctx.add_conflict(format!(
                "mapper [{}] has different store values",
                self.name
            ));
        }
    }

    pub(crate) fn traverse(&self, listener: &mut dyn FieldMapperListener) {
        listener.field_mapper(self);
    }

    pub(crate) fn to_json(&self, out: &mut Map<String, Value>) {
        let mut description = Map::new();
        description.insert("type".to_string(), Value::from(self.field_type.as_str()));
        if self.store {
            description.insert("store".to_string(), Value::Bool(true));
        }
        out.insert(self.name.clone(), Value::Object(description));
    }
}
