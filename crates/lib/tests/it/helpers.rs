use std::sync::Mutex;

use docmapper::{
    mapper::{
        BuilderContext, FieldBuilder, FieldMapper, FieldType, Mapper, MergeContext, MergeFlags,
        MergeResult, MultiFieldBuilder,
    },
    path::PathType,
    registry::FieldRegistry,
};

// ==========================
// MAPPER FACTORIES
// ==========================

/// The `title` multi-field: default string field `title` plus a `raw` sub-field.
pub fn title_builder(path_type: PathType) -> MultiFieldBuilder {
    MultiFieldBuilder::new("title")
        .path_type(path_type)
        .add(FieldBuilder::new("title", FieldType::String))
        .add(FieldBuilder::new("raw", FieldType::String))
}

/// Builds any builder at the root of a fresh context.
pub fn build(builder: impl Into<docmapper::mapper::MapperBuilder>) -> Mapper {
    builder.into().build(&mut BuilderContext::new())
}

/// The `title` multi-field in full path mode.
pub fn title_mapper() -> Mapper {
    build(title_builder(PathType::Full))
}

/// A `title` multi-field with only the given string sub-fields.
pub fn title_with_children(children: &[&str]) -> Mapper {
    let mut builder = MultiFieldBuilder::new("title");
    for child in children {
        builder.add_mut(FieldBuilder::new(*child, FieldType::String));
    }
    build(builder)
}

pub fn multi_field(mapper: &Mapper) -> &docmapper::mapper::MultiFieldMapper {
    mapper
        .as_multi_field()
        .expect("mapper should be a multi_field")
}

// ==========================
// REGISTRY DOUBLES
// ==========================

/// A registry that records every registration in call order.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub registered: Mutex<Vec<String>>,
}

impl RecordingRegistry {
    pub fn names(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }
}

impl FieldRegistry for RecordingRegistry {
    fn add_field_mapper(&self, mapper: FieldMapper) {
        self.registered
            .lock()
            .unwrap()
            .push(mapper.index_name().to_string());
    }
}

/// Merges `incoming` into `mapper` against `registry`, returning the collected conflicts.
pub fn merge_with(
    mapper: &Mapper,
    incoming: &Mapper,
    registry: &dyn FieldRegistry,
    flags: MergeFlags,
) -> MergeResult {
    let mut ctx = MergeContext::new(registry, flags);
    mapper
        .merge(incoming, &mut ctx)
        .expect("merge should not hit a structural error");
    ctx.into_result()
}
