//! Mappers: the nodes of a mapping tree.
//!
//! A [`Mapper`] can parse values out of a document, merge with a same-named mapper
//! from an incoming schema, report its leaf fields to a [`FieldMapperListener`], and
//! serialize itself back to a mapping definition.
//!
//! # Core Types
//!
//! - [`FieldMapper`] - a terminal, typed field
//! - [`MultiFieldMapper`] - a container with a default mapper and named sub-mappers
//! - [`MapperBuilder`] - staged construction of mapper trees
//! - [`MergeContext`] - merge flags and collected conflicts
//!
//! # Examples
//!
//! ```
//! use docmapper::mapper::{
//!     BuilderContext, FieldBuilder, FieldType, Mapper, MultiFieldBuilder, parse::Document,
//! };
//!
//! let mapper = Mapper::from(
//!     MultiFieldBuilder::new("title")
//!         .add(FieldBuilder::new("title", FieldType::String))
//!         .add(FieldBuilder::new("raw", FieldType::String))
//!         .build(&mut BuilderContext::new()),
//! );
//!
//! let document = Document::new().push("title", "Hello").push("title.raw", "Hello");
//! let parsed = mapper.parse_document(&document)?;
//! assert_eq!(parsed.len(), 2);
//! # Ok::<(), docmapper::Error>(())
//! ```

pub mod builder;
pub mod definition;
pub mod errors;
pub mod field;
pub mod merge;
pub mod multi_field;
pub mod parse;

use std::sync::Arc;

use serde_json::{Map, Value};

pub use builder::{BuilderContext, FieldBuilder, MapperBuilder, MultiFieldBuilder};
pub use errors::{MapperParsingError, MergeError, ParseError};
pub use field::{FieldMapper, FieldType};
pub use merge::{MergeContext, MergeFlags, MergeResult};
pub use multi_field::{MultiFieldMapper, MultiFieldSnapshot};
pub use parse::{Document, FieldValue, IndexedField, ParseContext, ParsedDocument};

/// Receives every leaf field found while traversing a mapping tree.
pub trait FieldMapperListener {
    fn field_mapper(&mut self, mapper: &FieldMapper);
}

impl FieldMapperListener for Vec<FieldMapper> {
    fn field_mapper(&mut self, mapper: &FieldMapper) {
        self.push(mapper.clone());
    }
}

/// A node of the mapping tree.
///
/// Every merge site matches on this enum exhaustively, so a new mapper shape has to
/// be handled everywhere a merge can meet it.
#[derive(Debug, PartialEq)]
pub enum Mapper {
    Field(FieldMapper),
    MultiField(MultiFieldMapper),
}

impl Mapper {
    pub fn name(&self) -> &str {
        match self {
            Mapper::Field(field) => field.name(),
            Mapper::MultiField(multi) => multi.name(),
        }
    }

    /// The type tag written to the mapping definition.
    pub fn type_name(&self) -> &'static str {
        match self {
            Mapper::Field(field) => field.field_type().as_str(),
            Mapper::MultiField(_) => multi_field::CONTENT_TYPE,
        }
    }

    pub fn as_field(&self) -> Option<&FieldMapper> {
        match self {
            Mapper::Field(field) => Some(field),
            Mapper::MultiField(_) => None,
        }
    }

    pub fn as_multi_field(&self) -> Option<&MultiFieldMapper> {
        match self {
            Mapper::MultiField(multi) => Some(multi),
            Mapper::Field(_) => None,
        }
    }

    /// Parses this mapper's fields out of the context's document.
    ///
    /// The context's path is left as it was found, including when an error is
    /// returned.
    pub fn parse(&self, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        match self {
            Mapper::Field(field) => field.parse(ctx),
            Mapper::MultiField(multi) => multi.parse(ctx),
        }
    }

    /// Parses a whole document with this mapper at the root of the path.
    pub fn parse_document(&self, document: &Document) -> Result<ParsedDocument, ParseError> {
        let mut ctx = ParseContext::new(document);
        self.parse(&mut ctx)?;
        Ok(ctx.into_parsed())
    }

    /// Merges `incoming` into this mapper.
    ///
    /// Incompatibilities are recorded as conflicts on `ctx`. An error is returned only
    /// when `incoming` is structurally malformed; that check runs before anything is
    /// applied, so an error leaves this mapper untouched.
    pub fn merge(&self, incoming: &Mapper, ctx: &mut MergeContext<'_>) -> Result<(), MergeError> {
        incoming.validate()?;
        self.merge_validated(incoming, ctx);
        Ok(())
    }

    pub(crate) fn merge_validated(&self, incoming: &Mapper, ctx: &mut MergeContext<'_>) {
        match self {
            Mapper::Field(field) => field.merge(incoming, ctx),
            Mapper::MultiField(multi) => multi.merge(incoming, ctx),
        }
    }

    /// Checks the container invariants of this tree.
    pub fn validate(&self) -> Result<(), MergeError> {
        match self {
            Mapper::Field(_) => Ok(()),
            Mapper::MultiField(multi) => multi.validate(),
        }
    }

    /// Copies this tree so that no container node is shared with the original.
    pub fn deep_copy(&self) -> Arc<Mapper> {
        Arc::new(match self {
            Mapper::Field(field) => Mapper::Field(field.clone()),
            Mapper::MultiField(multi) => Mapper::MultiField(multi.deep_copy()),
        })
    }

    pub fn traverse(&self, listener: &mut dyn FieldMapperListener) {
        match self {
            Mapper::Field(field) => field.traverse(listener),
            Mapper::MultiField(multi) => multi.traverse(listener),
        }
    }

    /// Writes `name: description` into `out`.
    pub fn to_json(&self, out: &mut Map<String, Value>) {
        match self {
            Mapper::Field(field) => field.to_json(out),
            Mapper::MultiField(multi) => multi.to_json(out),
        }
    }

    /// This mapper's definition as a single-key JSON object.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        self.to_json(&mut out);
        Value::Object(out)
    }
}

impl From<FieldMapper> for Mapper {
    fn from(field: FieldMapper) -> Self {
        Mapper::Field(field)
    }
}

impl From<MultiFieldMapper> for Mapper {
    fn from(multi: MultiFieldMapper) -> Self {
        Mapper::MultiField(multi)
    }
}
