//! Parsing of declarative mapping definitions into builders.
//!
//! Definitions use the same shape mappers serialize to:
//!
//! ```json
//! {
//!   "title": {
//!     "type": "multi_field",
//!     "pathType": "full",
//!     "fields": {
//!       "title": { "type": "string" },
//!       "raw": { "type": "string", "store": true }
//!     }
//!   }
//! }
//! ```
//!
//! A document mapping wraps its top-level fields as
//! `{"<type name>": {"properties": {...}}}`.

use std::str::FromStr;

use serde_json::{Map, Value};

use super::{
    FieldBuilder, FieldType, MapperBuilder, MapperParsingError, MultiFieldBuilder,
    multi_field::CONTENT_TYPE,
};
use crate::path::PathType;

/// Key holding the top-level fields of a document mapping.
pub const PROPERTIES: &str = "properties";

/// Parses the definition of the mapper called `name`.
pub fn parse_mapper(name: &str, definition: &Value) -> Result<MapperBuilder, MapperParsingError> {
    let Value::Object(properties) = definition else {
        return Err(MapperParsingError::NotAnObject {
            name: name.to_string(),
        });
    };
    let type_name = match properties.get("type") {
        Some(Value::String(type_name)) => type_name.as_str(),
        Some(_) => {
            return Err(MapperParsingError::InvalidProperty {
                name: name.to_string(),
                property: "type".to_string(),
                reason: "expected a string".to_string(),
            });
        }
        None => {
            return Err(MapperParsingError::MissingType {
                name: name.to_string(),
            });
        }
    };

    if type_name == CONTENT_TYPE {
        return parse_multi_field(name, properties).map(MapperBuilder::from);
    }
    let field_type =
        FieldType::from_str(type_name).map_err(|type_name| MapperParsingError::UnknownType {
            name: name.to_string(),
            type_name,
        })?;
    parse_field(name, field_type, properties).map(MapperBuilder::from)
}

/// Parses every entry of a `{name: definition}` object, in order.
pub fn parse_mappers(definitions: &Map<String, Value>) -> Result<Vec<MapperBuilder>, MapperParsingError> {
    definitions
        .iter()
        .map(|(name, definition)| parse_mapper(name, definition))
        .collect()
}

/// Parses a document mapping into its type name and top-level builders.
pub fn parse_document_mapping(
    source: &Value,
) -> Result<(String, Vec<MapperBuilder>), MapperParsingError> {
    let Value::Object(root) = source else {
        return Err(MapperParsingError::InvalidRoot {
            reason: "expected an object".to_string(),
        });
    };
    let mut entries = root.iter();
    let (Some((type_name, mapping)), None) = (entries.next(), entries.next()) else {
        return Err(MapperParsingError::InvalidRoot {
            reason: format!("expected exactly one mapping type, found {}", root.len()),
        });
    };
    let Value::Object(mapping) = mapping else {
        return Err(MapperParsingError::NotAnObject {
            name: type_name.clone(),
        });
    };
    let builders = match mapping.get(PROPERTIES) {
        None => Vec::new(),
        Some(Value::Object(properties)) => parse_mappers(properties)?,
        Some(_) => {
            return Err(MapperParsingError::InvalidProperty {
                name: type_name.clone(),
                property: PROPERTIES.to_string(),
                reason: "expected an object".to_string(),
            });
        }
    };
    Ok((type_name.clone(), builders))
}

fn parse_multi_field(
    name: &str,
    properties: &Map<String, Value>,
) -> Result<MultiFieldBuilder, MapperParsingError> {
    let mut builder = MultiFieldBuilder::new(name);
    for (property, value) in properties {
        match property.as_str() {
            "type" => {}
            "pathType" => {
                let path_type = value
                    .as_str()
                    .ok_or_else(|| invalid_property(name, property, "expected a string"))
                    .and_then(|text| {
                        PathType::from_str(text)
                            .map_err(|err| invalid_property(name, property, &err.to_string()))
                    })?;
                builder.path_type_mut(path_type);
            }
            "fields" => {
                let Value::Object(fields) = value else {
                    return Err(invalid_property(name, property, "expected an object"));
                };
                for child in parse_mappers(fields)? {
                    builder.add_mut(child);
                }
            }
            other => tracing::trace!(field = name, property = other, "ignoring unknown property"),
        }
    }
    Ok(builder)
}

fn parse_field(
    name: &str,
    field_type: FieldType,
    properties: &Map<String, Value>,
) -> Result<FieldBuilder, MapperParsingError> {
    let mut builder = FieldBuilder::new(name, field_type);
    for (property, value) in properties {
        match property.as_str() {
            "type" => {}
            "store" => {
                let store = parse_bool(value)
                    .ok_or_else(|| invalid_property(name, property, "expected a boolean"))?;
                builder.store_mut(store);
            }
            other => tracing::trace!(field = name, property = other, "ignoring unknown property"),
        }
    }
    Ok(builder)
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" || s == "yes" => Some(true),
        Value::String(s) if s == "false" || s == "no" => Some(false),
        _ => None,
    }
}

fn invalid_property(name: &str, property: &str, reason: &str) -> MapperParsingError {
    MapperParsingError::InvalidProperty {
        name: name.to_string(),
        property: property.to_string(),
        reason: reason.to_string(),
    }
}
