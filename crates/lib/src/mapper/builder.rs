//! Builders for mapper trees.
//!
//! Builders are plain, single-owner values. They accumulate configuration during
//! schema definition and are consumed by `build`, which computes qualified names
//! from the [`BuilderContext`] path and returns the finished mapper.
//!
//! Every builder supports two styles of construction:
//! 1. Ownership chaining: each method returns `self`.
//! 2. Mutable reference: methods ending in `_mut` modify the builder in place.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{FieldMapper, FieldType, Mapper, MultiFieldMapper};
use crate::path::{ContentPath, PathType};

/// State threaded through one `build` call tree.
#[derive(Debug, Clone, Default)]
pub struct BuilderContext {
    path: ContentPath,
}

impl BuilderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &ContentPath {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut ContentPath {
        &mut self.path
    }
}

/// Builder for a leaf [`FieldMapper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBuilder {
    name: String,
    field_type: FieldType,
    store: bool,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            store: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(mut self, store: bool) -> Self {
        self.store = store;
        self
    }

    pub fn store_mut(&mut self, store: bool) -> &mut Self {
        self.store = store;
        self
    }

    /// Builds the field, naming it from the context's current path.
    pub fn build(self, context: &mut BuilderContext) -> FieldMapper {
        let index_name = context.path().full_path_as_text(&self.name);
        FieldMapper::new(self.name, index_name, self.field_type, self.store)
    }
}

/// Builder for a [`MultiFieldMapper`].
///
/// # Example
///
/// ```
/// use docmapper::{
///     mapper::{BuilderContext, FieldBuilder, FieldType, MultiFieldBuilder},
///     path::PathType,
/// };
///
/// let title = MultiFieldBuilder::new("title")
///     .path_type(PathType::JustName)
///     .add(FieldBuilder::new("title", FieldType::String))
///     .add(FieldBuilder::new("raw", FieldType::String))
///     .build(&mut BuilderContext::new());
///
/// assert!(title.default_mapper().is_some());
/// assert_eq!(title.mapper_names(), vec!["raw".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiFieldBuilder {
    name: String,
    path_type: PathType,
    default_builder: Option<Box<MapperBuilder>>,
    builders: Vec<MapperBuilder>,
}

impl MultiFieldBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path_type: PathType::Full,
            default_builder: None,
            builders: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path_type(mut self, path_type: PathType) -> Self {
        self.path_type = path_type;
        self
    }

    pub fn path_type_mut(&mut self, path_type: PathType) -> &mut Self {
        self.path_type = path_type;
        self
    }

    /// Adds a sub-mapper builder.
    ///
    /// A builder named like this multi-field becomes the default mapper, replacing
    /// any earlier one. Every other builder becomes a named sub-mapper.
    pub fn add(mut self, builder: impl Into<MapperBuilder>) -> Self {
        self.add_mut(builder);
        self
    }

    /// Mutable reference version of [`MultiFieldBuilder::add`].
    pub fn add_mut(&mut self, builder: impl Into<MapperBuilder>) -> &mut Self {
        let builder = builder.into();
        if builder.name() == self.name {
            self.default_builder = Some(Box::new(builder));
        } else {
            self.builders.push(builder);
        }
        self
    }

    /// Builds the multi-field.
    ///
    /// The default mapper is built at the caller's path; sub-mappers are built with
    /// this multi-field's name pushed. Sub-builders sharing a name keep only the
    /// last one built. The context's path is restored before returning.
    pub fn build(self, context: &mut BuilderContext) -> MultiFieldMapper {
        let orig_path_type = context.path_mut().set_path_type(self.path_type);

        let default_mapper = self
            .default_builder
            .map(|builder| Arc::new(builder.build(context)));

        context.path_mut().add(self.name.as_str());
        let mut mappers = IndexMap::with_capacity(self.builders.len());
        for builder in self.builders {
            let mapper = builder.build(context);
            if let Some(replaced) = mappers.insert(mapper.name().to_string(), Arc::new(mapper)) {
                tracing::debug!(
                    multi_field = %self.name,
                    mapper = replaced.name(),
                    "duplicate sub-mapper name, keeping the last definition"
                );
            }
        }
        context.path_mut().remove();

        context.path_mut().set_path_type(orig_path_type);

        MultiFieldMapper::new(self.name, self.path_type, mappers, default_mapper)
    }
}

/// A builder for any mapper shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapperBuilder {
    Field(FieldBuilder),
    MultiField(MultiFieldBuilder),
}

impl MapperBuilder {
    pub fn name(&self) -> &str {
        match self {
            MapperBuilder::Field(builder) => builder.name(),
            MapperBuilder::MultiField(builder) => builder.name(),
        }
    }

    pub fn build(self, context: &mut BuilderContext) -> Mapper {
        match self {
            MapperBuilder::Field(builder) => Mapper::Field(builder.build(context)),
            MapperBuilder::MultiField(builder) => Mapper::MultiField(builder.build(context)),
        }
    }
}

impl From<FieldBuilder> for MapperBuilder {
    fn from(builder: FieldBuilder) -> Self {
        MapperBuilder::Field(builder)
    }
}

impl From<MultiFieldBuilder> for MapperBuilder {
    fn from(builder: MultiFieldBuilder) -> Self {
        MapperBuilder::MultiField(builder)
    }
}
