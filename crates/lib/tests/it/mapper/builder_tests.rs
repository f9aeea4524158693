//! Builder tests: default routing, qualified names, path scoping and duplicate names.

use docmapper::{
    mapper::{BuilderContext, FieldBuilder, FieldMapper, FieldType, Mapper, MultiFieldBuilder},
    path::PathType,
};

use crate::helpers::*;

#[test]
fn test_builder_routes_same_named_child_to_default() {
    let mapper = title_mapper();
    let multi = multi_field(&mapper);

    let default_mapper = multi.default_mapper().expect("default mapper should be set");
    assert_eq!(default_mapper.name(), "title");
    assert_eq!(multi.mapper_names(), vec!["raw".to_string()]);
    assert!(multi.mapper("title").is_none());
}

#[test]
fn test_full_path_index_names() {
    let mapper = title_mapper();
    let multi = multi_field(&mapper);

    let default_mapper = multi.default_mapper().unwrap();
    assert_eq!(default_mapper.as_field().unwrap().index_name(), "title");

    let raw = multi.mapper("raw").unwrap();
    assert_eq!(raw.as_field().unwrap().index_name(), "title.raw");
}

#[test]
fn test_just_name_index_names() {
    let mapper = build(title_builder(PathType::JustName));
    let raw = multi_field(&mapper).mapper("raw").unwrap();
    assert_eq!(raw.as_field().unwrap().index_name(), "raw");
}

#[test]
fn test_build_restores_context_path() {
    let mut context = BuilderContext::new();
    context.path_mut().add("outer");

    let _ = title_builder(PathType::JustName).build(&mut context);

    assert_eq!(context.path().path_type(), PathType::Full);
    assert_eq!(context.path().depth(), 1);
    assert_eq!(context.path().full_path_as_text("x"), "outer.x");
}

#[test]
fn test_nested_multi_fields_scope_path_type() {
    // outer is just_name, inner is full: inner's children see the full path again
    let inner = MultiFieldBuilder::new("inner")
        .path_type(PathType::Full)
        .add(FieldBuilder::new("leaf", FieldType::Long));
    let outer = MultiFieldBuilder::new("outer")
        .path_type(PathType::JustName)
        .add(FieldBuilder::new("sibling", FieldType::Long))
        .add(inner);

    let mapper = build(outer);
    let outer = multi_field(&mapper);
    assert_eq!(
        outer.mapper("sibling").unwrap().as_field().unwrap().index_name(),
        "sibling"
    );

    let inner = outer.mapper("inner").unwrap();
    let leaf = multi_field(&inner).mapper("leaf").unwrap();
    assert_eq!(leaf.as_field().unwrap().index_name(), "outer.inner.leaf");
}

#[test]
fn test_duplicate_child_names_last_write_wins() {
    let builder = MultiFieldBuilder::new("title")
        .add(FieldBuilder::new("raw", FieldType::String))
        .add(FieldBuilder::new("raw", FieldType::Long).store(true));

    let mapper = build(builder);
    let multi = multi_field(&mapper);
    assert_eq!(multi.snapshot().len(), 1);

    let raw = multi.mapper("raw").unwrap();
    let raw = raw.as_field().unwrap();
    assert_eq!(raw.field_type(), FieldType::Long);
    assert!(raw.store());
}

#[test]
fn test_later_default_builder_replaces_earlier() {
    let builder = MultiFieldBuilder::new("title")
        .add(FieldBuilder::new("title", FieldType::String))
        .add(FieldBuilder::new("title", FieldType::Long));

    let mapper = build(builder);
    let default_mapper = multi_field(&mapper).default_mapper().unwrap();
    assert_eq!(default_mapper.as_field().unwrap().field_type(), FieldType::Long);
    assert!(multi_field(&mapper).snapshot().is_empty());
}

#[test]
fn test_mutable_builder_style() {
    let mut builder = MultiFieldBuilder::new("body");
    builder
        .path_type_mut(PathType::JustName)
        .add_mut(FieldBuilder::new("body", FieldType::String))
        .add_mut(FieldBuilder::new("length", FieldType::Integer));

    let mapper = build(builder);
    assert!(matches!(mapper, Mapper::MultiField(ref m) if m.path_type() == PathType::JustName));
    assert_eq!(multi_field(&mapper).mapper_names(), vec!["length".to_string()]);
}

#[test]
fn test_leaf_field_mappers_visited_by_traverse() {
    let mapper = title_mapper();
    let fields = multi_field(&mapper).field_mappers();
    let names: Vec<&str> = fields.iter().map(|f| f.index_name()).collect();
    assert_eq!(names, vec!["title", "title.raw"]);
}

#[test]
fn test_traverse_skips_container_default() {
    // a default mapper that is itself a multi_field is not descended into
    let default_multi = MultiFieldBuilder::new("title").add(FieldBuilder::new("deep", FieldType::String));
    let builder = MultiFieldBuilder::new("title")
        .add(default_multi)
        .add(FieldBuilder::new("raw", FieldType::String));

    let mapper = build(builder);
    let mut fields: Vec<FieldMapper> = Vec::new();
    mapper.traverse(&mut fields);
    let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["raw"]);
}
