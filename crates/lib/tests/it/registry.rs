//! Tests for the FieldMappers registry.

use std::sync::Arc;

use docmapper::{
    mapper::{FieldBuilder, FieldMapper, FieldType, MultiFieldBuilder},
    registry::{FieldMappers, FieldRegistry},
};

use crate::helpers::*;

fn leaves(mapper: &docmapper::Mapper) -> Vec<FieldMapper> {
    let mut fields: Vec<FieldMapper> = Vec::new();
    mapper.traverse(&mut fields);
    fields
}

#[test]
fn test_registry_lookup_by_index_and_short_name() {
    let registry = FieldMappers::new();
    assert!(registry.is_empty());

    for field in leaves(&title_mapper()) {
        registry.add_field_mapper(field);
    }
    let body = build(
        MultiFieldBuilder::new("body").add(FieldBuilder::new("raw", FieldType::String)),
    );
    for field in leaves(&body) {
        registry.add_field_mapper(field);
    }

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.index_names(), vec!["title", "title.raw", "body.raw"]);
    assert_eq!(registry.get("title.raw").unwrap().name(), "raw");
    assert!(registry.get("raw").is_none());

    let raws: Vec<String> = registry
        .by_name("raw")
        .iter()
        .map(|field| field.index_name().to_string())
        .collect();
    assert_eq!(raws, vec!["title.raw", "body.raw"]);
}

#[test]
fn test_reregistering_replaces_in_place() {
    let registry = FieldMappers::new();
    for field in leaves(&title_mapper()) {
        registry.add_field_mapper(field);
    }
    let stored = build(FieldBuilder::new("title", FieldType::String).store(true));
    for field in leaves(&stored) {
        registry.add_field_mapper(field);
    }

    assert_eq!(registry.index_names(), vec!["title", "title.raw"]);
    assert!(registry.get("title").unwrap().store());
}

#[test]
fn test_snapshot_unaffected_by_later_registration() {
    let registry = FieldMappers::new();
    let before = registry.snapshot();

    for field in leaves(&title_mapper()) {
        registry.add_field_mapper(field);
    }

    assert!(before.is_empty());
    assert_eq!(registry.snapshot().len(), 2);
}

#[test]
fn test_concurrent_registration_loses_nothing() {
    let registry = Arc::new(FieldMappers::new());

    std::thread::scope(|scope| {
        for i in 0..8 {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                let mapper = build(FieldBuilder::new(format!("f{i}"), FieldType::Long));
                for field in leaves(&mapper) {
                    registry.add_field_mapper(field);
                }
            });
        }
    });

    assert_eq!(registry.len(), 8);
    assert!(registry.contains("f7"));
}
