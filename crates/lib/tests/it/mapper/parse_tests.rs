//! Parse tests: default-mapper path scoping, value coercion and error handling.

use docmapper::{
    mapper::{
        Document, FieldBuilder, FieldType, FieldValue, MultiFieldBuilder, ParseContext, ParseError,
    },
    path::PathType,
};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_container_name_populates_only_default() {
    let mapper = title_mapper();
    let document = Document::from_json(&json!({"title": "Hello"})).unwrap();

    let parsed = mapper.parse_document(&document).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.get("title"), vec![&FieldValue::Text("Hello".to_string())]);
    assert!(!parsed.contains("title.raw"));
}

#[test]
fn test_full_path_children_require_container_prefix() {
    let mapper = title_mapper();

    let unprefixed = Document::new().push("raw", "r");
    assert!(mapper.parse_document(&unprefixed).unwrap().is_empty());

    let prefixed = Document::new().push("title.raw", "r");
    let parsed = mapper.parse_document(&prefixed).unwrap();
    assert_eq!(parsed.get("title.raw"), vec![&FieldValue::Text("r".to_string())]);
}

#[test]
fn test_just_name_children_ignore_container_prefix() {
    let mapper = build(title_builder(PathType::JustName));

    let prefixed = Document::new().push("title.raw", "r");
    assert!(mapper.parse_document(&prefixed).unwrap().is_empty());

    let unprefixed = Document::new().push("raw", "r").push("title", "t");
    let parsed = mapper.parse_document(&unprefixed).unwrap();
    assert_eq!(parsed.get("raw"), vec![&FieldValue::Text("r".to_string())]);
    assert_eq!(parsed.get("title"), vec![&FieldValue::Text("t".to_string())]);
}

#[test]
fn test_nested_json_is_flattened() {
    let mapper = title_mapper();
    let document = Document::from_json(&json!({"title": {"raw": "nested"}})).unwrap();
    assert_eq!(document.len(), 1);

    let parsed = mapper.parse_document(&document).unwrap();
    assert_eq!(parsed.get("title.raw"), vec![&FieldValue::Text("nested".to_string())]);
}

#[test]
fn test_children_parse_in_insertion_order() {
    let builder = MultiFieldBuilder::new("f")
        .add(FieldBuilder::new("c", FieldType::String))
        .add(FieldBuilder::new("a", FieldType::String))
        .add(FieldBuilder::new("b", FieldType::String));
    let mapper = build(builder);
    let document = Document::new().push("f.a", "1").push("f.b", "2").push("f.c", "3");

    let parsed = mapper.parse_document(&document).unwrap();
    let names: Vec<&str> = parsed.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["f.c", "f.a", "f.b"]);
}

#[test]
fn test_value_coercion() {
    let builder = MultiFieldBuilder::new("n")
        .add(FieldBuilder::new("n", FieldType::Integer))
        .add(FieldBuilder::new("text", FieldType::String))
        .add(FieldBuilder::new("flag", FieldType::Boolean))
        .add(FieldBuilder::new("ratio", FieldType::Double));
    let mapper = build(builder);

    let document = Document::new()
        .push("n", "42")
        .push("n.text", 7)
        .push("n.flag", "true")
        .push("n.ratio", 0.5);
    let parsed = mapper.parse_document(&document).unwrap();

    assert_eq!(parsed.get("n"), vec![&FieldValue::Long(42)]);
    assert_eq!(parsed.get("n.text"), vec![&FieldValue::Text("7".to_string())]);
    assert_eq!(parsed.get("n.flag"), vec![&FieldValue::Boolean(true)]);
    assert_eq!(parsed.get("n.ratio"), vec![&FieldValue::Double(0.5)]);
}

#[test]
fn test_arrays_and_nulls() {
    let mapper = title_mapper();
    let document = Document::from_json(&json!({"title": ["a", null, "b"]})).unwrap();
    let parsed = mapper.parse_document(&document).unwrap();
    assert_eq!(parsed.len(), 2);

    let document = Document::from_json(&json!({"title": null})).unwrap();
    assert!(mapper.parse_document(&document).unwrap().is_empty());
}

#[test]
fn test_malformed_value_is_reported() {
    let builder = MultiFieldBuilder::new("count").add(FieldBuilder::new("exact", FieldType::Long));
    let mapper = build(builder);
    let document = Document::new().push("count.exact", "not a number");

    let err = mapper.parse_document(&document).unwrap_err();
    assert!(err.is_malformed_value());
    assert_eq!(err.field(), Some("count.exact"));
    assert!(err.to_string().contains("long"));
}

#[test]
fn test_integer_out_of_range_is_malformed() {
    let mapper = build(FieldBuilder::new("small", FieldType::Integer));
    let document = Document::new().push("small", i64::from(i32::MAX) + 1);
    assert!(mapper.parse_document(&document).is_err());
}

#[test]
fn test_parse_error_restores_path() {
    let mapper = build(
        MultiFieldBuilder::new("count")
            .path_type(PathType::JustName)
            .add(FieldBuilder::new("exact", FieldType::Long)),
    );
    let document = Document::new().push("exact", json!({"nested": true}).to_string());

    let mut ctx = ParseContext::new(&document);
    ctx.path_mut().add("root");
    let err = mapper.parse(&mut ctx).unwrap_err();

    assert!(matches!(err, ParseError::MalformedValue { .. }));
    assert_eq!(ctx.path().path_type(), PathType::Full);
    assert_eq!(ctx.path().depth(), 1);
}

#[test]
fn test_document_must_be_object() {
    let err = Document::from_json(&json!(["a"])).unwrap_err();
    assert_eq!(
        err,
        ParseError::NotAnObject {
            found: "array".to_string()
        }
    );
}

#[test]
fn test_store_flag_marks_indexed_fields() {
    let mapper = build(FieldBuilder::new("body", FieldType::String).store(true));
    let parsed = mapper
        .parse_document(&Document::new().push("body", "text"))
        .unwrap();
    assert!(parsed.fields()[0].stored);
}
