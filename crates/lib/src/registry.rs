//! The document-wide registry of leaf field mappers.
//!
//! Mapping trees report every leaf field they introduce, at initial build and
//! during non-simulated merges, through the [`FieldRegistry`] trait. Registration
//! always completes before the merged snapshot is published, so a reader that can
//! see a field in the tree can also resolve it here.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;

use crate::mapper::FieldMapper;

/// Receives leaf field mappers as they are introduced into a mapping tree.
pub trait FieldRegistry: Send + Sync {
    fn add_field_mapper(&self, mapper: FieldMapper);
}

/// In-memory [`FieldRegistry`] keyed by qualified index name.
///
/// Lookups read a published snapshot and never block on registration.
#[derive(Debug, Default)]
pub struct FieldMappers {
    fields: ArcSwap<IndexMap<String, FieldMapper>>,
}

impl FieldMappers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The field registered under `index_name`.
    pub fn get(&self, index_name: &str) -> Option<FieldMapper> {
        self.fields.load().get(index_name).cloned()
    }

    pub fn contains(&self, index_name: &str) -> bool {
        self.fields.load().contains_key(index_name)
    }

    /// Every field registered under the short name `name`.
    pub fn by_name(&self, name: &str) -> Vec<FieldMapper> {
        self.fields
            .load()
            .values()
            .filter(|field| field.name() == name)
            .cloned()
            .collect()
    }

    /// Registered index names, in registration order.
    pub fn index_names(&self) -> Vec<String> {
        self.fields.load().keys().cloned().collect()
    }

    /// The current set of registered fields.
    pub fn snapshot(&self) -> Arc<IndexMap<String, FieldMapper>> {
        self.fields.load_full()
    }

    pub fn len(&self) -> usize {
        self.fields.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.load().is_empty()
    }
}

impl FieldRegistry for FieldMappers {
    fn add_field_mapper(&self, mapper: FieldMapper) {
        let index_name = mapper.index_name().to_string();
        tracing::trace!(field = %index_name, "registering field mapper");
        self.fields.rcu(|current| {
            let mut next = IndexMap::clone(current);
            next.insert(index_name.clone(), mapper.clone());
            next
        });
    }
}
