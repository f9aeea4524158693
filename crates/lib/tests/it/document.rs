//! Tests for the DocumentMapper root: definitions, parsing and merging whole mappings.

use docmapper::{
    DocumentMapper, Error, MergeFlags,
    mapper::{FieldBuilder, FieldType, FieldValue, MultiFieldBuilder},
    path::PathType,
};
use serde_json::{Value, json};

fn tweet_mapping() -> Value {
    json!({
        "tweet": {
            "properties": {
                "user": {"type": "string"},
                "title": {
                    "type": "multi_field",
                    "pathType": "full",
                    "fields": {
                        "title": {"type": "string"},
                        "raw": {"type": "string"}
                    }
                }
            }
        }
    })
}

fn tweet_mapper() -> DocumentMapper {
    DocumentMapper::from_value(&tweet_mapping()).unwrap()
}

#[test]
fn test_from_value_registers_every_leaf() {
    let mapper = tweet_mapper();
    assert_eq!(mapper.type_name(), "tweet");
    assert_eq!(
        mapper.field_mappers().index_names(),
        vec!["user", "title", "title.raw"]
    );
    assert!(mapper.mapper("title").unwrap().as_multi_field().is_some());
}

#[test]
fn test_to_json_round_trip() {
    let mapper = tweet_mapper();
    assert_eq!(mapper.to_json(), tweet_mapping());

    let text = serde_json::to_string(&mapper.to_json()).unwrap();
    let reparsed = DocumentMapper::from_json_str(&text).unwrap();
    assert_eq!(reparsed, mapper);
}

#[test]
fn test_builder_matches_definition() {
    let built = DocumentMapper::builder("tweet")
        .add(FieldBuilder::new("user", FieldType::String))
        .add(
            MultiFieldBuilder::new("title")
                .add(FieldBuilder::new("title", FieldType::String))
                .add(FieldBuilder::new("raw", FieldType::String)),
        )
        .build();
    assert_eq!(built, tweet_mapper());
}

#[test]
fn test_parse_json_document() {
    let mapper = tweet_mapper();
    let parsed = mapper
        .parse_json(&json!({"user": "kimchy", "title": "Hello", "ignored": 1}))
        .unwrap();

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.get("user"), vec![&FieldValue::Text("kimchy".to_string())]);
    assert_eq!(parsed.get("title"), vec![&FieldValue::Text("Hello".to_string())]);
}

#[test]
fn test_parse_json_errors_are_document_errors() {
    let mapper = DocumentMapper::builder("stats")
        .add(FieldBuilder::new("likes", FieldType::Integer))
        .build();

    let err = mapper.parse_json(&json!({"likes": "many"})).unwrap_err();
    assert!(err.is_document_error());
    assert!(!err.is_mapping_error());
    assert_eq!(err.module(), "parse");

    let err = mapper.parse_json(&json!("not an object")).unwrap_err();
    assert!(err.is_document_error());
}

#[test]
fn test_definition_errors_are_mapping_errors() {
    let err = DocumentMapper::from_value(&json!({"tweet": {"properties": {"x": {"type": "blob"}}}}))
        .unwrap_err();
    assert!(err.is_mapping_error());
    assert!(matches!(err, Error::Mapping(_)));

    let err = DocumentMapper::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, Error::Serialize(_)));
    assert_eq!(err.module(), "serialize");
    assert!(!err.is_mapping_error());
}

#[test]
fn test_merge_adds_top_level_and_nested_fields() {
    let mapper = tweet_mapper();
    let incoming = DocumentMapper::from_value(&json!({
        "tweet": {"properties": {
            "likes": {"type": "integer"},
            "title": {"type": "multi_field", "fields": {"sort": {"type": "string"}}}
        }}
    }))
    .unwrap();

    let result = mapper.merge(&incoming, MergeFlags::new()).unwrap();

    assert!(!result.has_conflicts());
    assert_eq!(
        mapper.field_mappers().index_names(),
        vec!["user", "title", "title.raw", "title.sort", "likes"]
    );
    let parsed = mapper
        .parse_json(&json!({"likes": 3, "title": {"sort": "s"}}))
        .unwrap();
    assert_eq!(parsed.get("likes"), vec![&FieldValue::Long(3)]);
    assert_eq!(parsed.get("title.sort"), vec![&FieldValue::Text("s".to_string())]);
}

#[test]
fn test_merge_simulate_reports_without_applying() {
    let mapper = tweet_mapper();
    let before = mapper.to_json();
    let incoming = DocumentMapper::builder("tweet")
        .add(FieldBuilder::new("title", FieldType::String))
        .add(FieldBuilder::new("user", FieldType::Long))
        .add(FieldBuilder::new("likes", FieldType::Integer))
        .build();

    let result = mapper.merge(&incoming, MergeFlags::simulated()).unwrap();

    assert!(result.simulated());
    assert_eq!(result.conflicts().len(), 2);
    assert_eq!(mapper.to_json(), before);
    assert!(!mapper.field_mappers().contains("likes"));

    let result = mapper.merge(&incoming, MergeFlags::new()).unwrap();
    assert_eq!(result.conflicts().len(), 2);
    assert!(mapper.field_mappers().contains("likes"));
}

#[test]
fn test_merge_keeps_snapshots_of_top_level_mappers() {
    let mapper = tweet_mapper();
    let before = mapper.mappers();
    let incoming = DocumentMapper::builder("tweet")
        .add(FieldBuilder::new("likes", FieldType::Integer))
        .build();

    mapper.merge(&incoming, MergeFlags::new()).unwrap();

    assert_eq!(before.len(), 2);
    assert_eq!(mapper.mappers().len(), 3);
}

#[test]
fn test_just_name_fields_register_short_names() {
    let mapper = DocumentMapper::builder("doc")
        .add(
            MultiFieldBuilder::new("body")
                .path_type(PathType::JustName)
                .add(FieldBuilder::new("body", FieldType::String))
                .add(FieldBuilder::new("length", FieldType::Integer)),
        )
        .build();

    assert_eq!(mapper.field_mappers().index_names(), vec!["body", "length"]);
    let parsed = mapper.parse_json(&json!({"body": "b", "length": 1})).unwrap();
    assert_eq!(parsed.len(), 2);
}

#[test]
fn test_merge_result_serializes() {
    let mapper = tweet_mapper();
    let incoming = DocumentMapper::builder("tweet")
        .add(FieldBuilder::new("user", FieldType::Long))
        .build();

    let result = mapper.merge(&incoming, MergeFlags::simulated()).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["simulate"], json!(true));
    assert_eq!(value["conflicts"].as_array().unwrap().len(), 1);
}
