//! Document mappers: the root of a mapping tree.
//!
//! A [`DocumentMapper`] owns the top-level mappers of one mapping type together
//! with the [`FieldMappers`] registry of every leaf field in the tree. It is the
//! entry point for parsing documents, merging schema changes and serializing the
//! mapping back to its definition.
//!
//! # Examples
//!
//! ```
//! use docmapper::{DocumentMapper, MergeFlags};
//! use serde_json::json;
//!
//! let mapper = DocumentMapper::from_value(&json!({
//!     "tweet": {"properties": {
//!         "title": {"type": "multi_field", "fields": {
//!             "title": {"type": "string"},
//!             "raw": {"type": "string"}
//!         }}
//!     }}
//! }))?;
//!
//! let parsed = mapper.parse_json(&json!({"title": "Hello"}))?;
//! assert_eq!(parsed.len(), 1);
//!
//! let incoming = DocumentMapper::from_value(&json!({
//!     "tweet": {"properties": {
//!         "title": {"type": "multi_field", "fields": {
//!             "sort": {"type": "string"}
//!         }}
//!     }}
//! }))?;
//! let result = mapper.merge(&incoming, MergeFlags::new())?;
//! assert!(!result.has_conflicts());
//! assert!(mapper.field_mappers().contains("title.sort"));
//! # Ok::<(), docmapper::Error>(())
//! ```

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::{
    Result,
    mapper::{
        BuilderContext, Document, FieldMapper, FieldMapperListener, Mapper, MapperBuilder,
        MergeContext, MergeError, MergeFlags, MergeResult, ParseContext, ParseError,
        ParsedDocument, definition,
    },
    registry::{FieldMappers, FieldRegistry},
};

/// Builder for a [`DocumentMapper`].
#[derive(Debug, Clone)]
pub struct DocumentMapperBuilder {
    type_name: String,
    builders: Vec<MapperBuilder>,
}

impl DocumentMapperBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            builders: Vec::new(),
        }
    }

    /// Adds a top-level mapper.
    pub fn add(mut self, builder: impl Into<MapperBuilder>) -> Self {
        self.add_mut(builder);
        self
    }

    /// Mutable reference version of [`DocumentMapperBuilder::add`].
    pub fn add_mut(&mut self, builder: impl Into<MapperBuilder>) -> &mut Self {
        self.builders.push(builder.into());
        self
    }

    /// Builds every top-level mapper and registers all of their leaf fields.
    ///
    /// Top-level mappers sharing a name keep only the last one built.
    pub fn build(self) -> DocumentMapper {
        let mut context = BuilderContext::new();
        let mut mappers = IndexMap::with_capacity(self.builders.len());
        for builder in self.builders {
            let mapper = builder.build(&mut context);
            mappers.insert(mapper.name().to_string(), Arc::new(mapper));
        }

        let field_mappers = FieldMappers::new();
        let mut fields: Vec<FieldMapper> = Vec::new();
        for mapper in mappers.values() {
            mapper.traverse(&mut fields);
        }
        for field in fields {
            field_mappers.add_field_mapper(field);
        }

        tracing::debug!(
            type_name = %self.type_name,
            mappers = mappers.len(),
            fields = field_mappers.len(),
            "built document mapper"
        );
        DocumentMapper {
            type_name: self.type_name,
            mappers: ArcSwap::from_pointee(mappers),
            mutex: Mutex::new(()),
            field_mappers,
        }
    }
}

/// The root of one mapping type's tree.
#[derive(Debug)]
pub struct DocumentMapper {
    type_name: String,
    mappers: ArcSwap<IndexMap<String, Arc<Mapper>>>,
    mutex: Mutex<()>,
    field_mappers: FieldMappers,
}

impl DocumentMapper {
    pub fn builder(type_name: impl Into<String>) -> DocumentMapperBuilder {
        DocumentMapperBuilder::new(type_name)
    }

    /// Builds a document mapper from its JSON definition.
    pub fn from_value(source: &Value) -> Result<Self> {
        let (type_name, builders) = definition::parse_document_mapping(source)?;
        let mut builder = DocumentMapperBuilder::new(type_name);
        for mapper in builders {
            builder.add_mut(mapper);
        }
        Ok(builder.build())
    }

    /// Builds a document mapper from JSON definition text.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(&value)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The current top-level mappers.
    pub fn mappers(&self) -> Arc<IndexMap<String, Arc<Mapper>>> {
        self.mappers.load_full()
    }

    pub fn mapper(&self, name: &str) -> Option<Arc<Mapper>> {
        self.mappers.load().get(name).cloned()
    }

    /// Registry of every leaf field in this tree.
    pub fn field_mappers(&self) -> &FieldMappers {
        &self.field_mappers
    }

    /// Parses a flattened document.
    pub fn parse(&self, document: &Document) -> std::result::Result<ParsedDocument, ParseError> {
        let mappers = self.mappers.load_full();
        let mut ctx = ParseContext::new(document);
        for mapper in mappers.values() {
            mapper.parse(&mut ctx)?;
        }
        let parsed = ctx.into_parsed();
        tracing::trace!(
            type_name = %self.type_name,
            indexed = parsed.len(),
            "parsed document"
        );
        Ok(parsed)
    }

    /// Parses a JSON document source.
    pub fn parse_json(&self, source: &Value) -> Result<ParsedDocument> {
        let document = Document::from_json(source)?;
        Ok(self.parse(&document)?)
    }

    /// Merges another document mapper's tree into this one.
    ///
    /// Conflicts are returned in the [`MergeResult`]; with [`MergeFlags::simulate`]
    /// set nothing is applied. The incoming tree is checked for structural errors
    /// before anything is merged.
    pub fn merge(
        &self,
        incoming: &DocumentMapper,
        flags: MergeFlags,
    ) -> std::result::Result<MergeResult, MergeError> {
        let incoming_mappers = incoming.mappers.load_full();
        for mapper in incoming_mappers.values() {
            mapper.validate()?;
        }

        let _guard = self.mutex.lock();
        let mut ctx = MergeContext::new(&self.field_mappers, flags);
        let current = self.mappers.load_full();

        let mut next: Option<IndexMap<String, Arc<Mapper>>> = None;
        let mut registrations: Vec<FieldMapper> = Vec::new();
        for (name, incoming_mapper) in incoming_mappers.iter() {
            match current.get(name) {
                Some(mapper) => mapper.merge_validated(incoming_mapper, &mut ctx),
                None => {
                    if !flags.simulate() {
                        let adopted = incoming_mapper.deep_copy();
                        adopted.traverse(&mut registrations);
                        next.get_or_insert_with(|| IndexMap::clone(&current))
                            .insert(name.clone(), adopted);
                    }
                }
            }
        }

        if let Some(next) = next {
            for field in registrations {
                self.field_mappers.add_field_mapper(field);
            }
            self.mappers.store(Arc::new(next));
        }

        let result = ctx.into_result();
        tracing::debug!(
            type_name = %self.type_name,
            simulate = flags.simulate(),
            conflicts = result.conflicts().len(),
            "merged mapping"
        );
        Ok(result)
    }

    pub fn traverse(&self, listener: &mut dyn FieldMapperListener) {
        for mapper in self.mappers.load().values() {
            mapper.traverse(listener);
        }
    }

    /// The mapping definition: `{"<type name>": {"properties": {...}}}`.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for mapper in self.mappers.load().values() {
            mapper.to_json(&mut properties);
        }
        let mut mapping = Map::new();
        mapping.insert(definition::PROPERTIES.to_string(), Value::Object(properties));
        let mut root = Map::new();
        root.insert(self.type_name.clone(), Value::Object(mapping));
        Value::Object(root)
    }
}

impl PartialEq for DocumentMapper {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && *self.mappers.load_full() == *other.mappers.load_full()
    }
}
