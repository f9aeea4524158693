//! Error types for mapper operations.
//!
//! Merge conflicts are not errors: they are collected in a [`super::MergeContext`]
//! and returned as data. The types here cover the failures that stop an
//! operation outright.

use thiserror::Error;

/// A document value could not be parsed by the mapper it was routed to.
///
/// Parse errors are scoped to one document. The mapping tree never retries;
/// the caller decides whether to reject the document or abort the batch.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// A value could not be converted to the field's declared type
    #[error("Failed to parse field [{field}]: expected a {expected} value, found {value}")]
    MalformedValue {
        field: String,
        expected: String,
        value: String,
    },

    /// The document source was not a JSON object
    #[error("Document source must be an object, found {found}")]
    NotAnObject { found: String },
}

impl ParseError {
    /// The qualified field name the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::MalformedValue { field, .. } => Some(field),
            ParseError::NotAnObject { .. } => None,
        }
    }

    /// Check if this error was caused by a value of the wrong type.
    pub fn is_malformed_value(&self) -> bool {
        matches!(self, ParseError::MalformedValue { .. })
    }
}

/// A merge could not run because the incoming mapping tree is malformed.
///
/// These are detected before anything is applied, so a failed merge leaves the
/// live tree untouched.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// The incoming tree breaks a container invariant
    #[error("Malformed mapping [{mapper}]: {reason}")]
    Structural { mapper: String, reason: String },
}

impl MergeError {
    /// Check if this error was raised by the structural check.
    pub fn is_structural(&self) -> bool {
        matches!(self, MergeError::Structural { .. })
    }

    /// The name of the offending mapper.
    pub fn mapper(&self) -> &str {
        match self {
            MergeError::Structural { mapper, .. } => mapper,
        }
    }
}

/// A mapping definition could not be turned into builders.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MapperParsingError {
    /// A mapper definition is not a JSON object
    #[error("Mapping definition for [{name}] must be an object")]
    NotAnObject { name: String },

    /// A mapper definition has no `type`
    #[error("No type specified for property [{name}]")]
    MissingType { name: String },

    /// A mapper definition names a type no builder handles
    #[error("No handler for type [{type_name}] declared on field [{name}]")]
    UnknownType { name: String, type_name: String },

    /// A mapper definition carries an unusable property value
    #[error("Invalid property [{property}] on field [{name}]: {reason}")]
    InvalidProperty {
        name: String,
        property: String,
        reason: String,
    },

    /// The document mapping root is not a single-key object
    #[error("Malformed document mapping: {reason}")]
    InvalidRoot { reason: String },
}

impl MapperParsingError {
    /// Check if this error names a type without a builder.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, MapperParsingError::UnknownType { .. })
    }

    /// The field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            MapperParsingError::NotAnObject { name }
            | MapperParsingError::MissingType { name }
            | MapperParsingError::UnknownType { name, .. }
            | MapperParsingError::InvalidProperty { name, .. } => Some(name),
            MapperParsingError::InvalidRoot { .. } => None,
        }
    }
}

impl From<ParseError> for crate::Error {
    fn from(err: ParseError) -> Self {
        crate::Error::Parse(err)
    }
}

impl From<MergeError> for crate::Error {
    fn from(err: MergeError) -> Self {
        crate::Error::Merge(err)
    }
}

impl From<MapperParsingError> for crate::Error {
    fn from(err: MapperParsingError) -> Self {
        crate::Error::Mapping(err)
    }
}
