//! Multi-field container mappers.
//!
//! A multi-field maps one document field several ways: a *default* mapper named
//! like the container indexes the field itself, and named sub-mappers index
//! variants of it under `<container>.<sub>` (or just `<sub>` in
//! [`PathType::JustName`] mode).
//!
//! # Concurrency
//!
//! The default mapper and sub-mappers live in an immutable [`MultiFieldSnapshot`]
//! published through an [`ArcSwap`]. Parsers load the current snapshot without
//! locking. Merges serialize on a per-node mutex, build the next snapshot in full,
//! register any new leaf fields, and only then publish it. A reader that loaded
//! a snapshot before a merge keeps seeing that snapshot unchanged.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::{
    FieldMapper, FieldMapperListener, Mapper, MergeContext, MergeError, ParseError,
    parse::ParseContext,
};
use crate::path::PathType;

/// Type tag of multi-field mappings.
pub const CONTENT_TYPE: &str = "multi_field";

/// One published state of a multi-field's mappers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiFieldSnapshot {
    default_mapper: Option<Arc<Mapper>>,
    mappers: IndexMap<String, Arc<Mapper>>,
}

impl MultiFieldSnapshot {
    /// The mapper for the field itself, if any.
    pub fn default_mapper(&self) -> Option<&Arc<Mapper>> {
        self.default_mapper.as_ref()
    }

    /// The named sub-mappers, in insertion order.
    pub fn mappers(&self) -> &IndexMap<String, Arc<Mapper>> {
        &self.mappers
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Mapper>> {
        self.mappers.get(name)
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

/// A container mapper with an optional default mapper and named sub-mappers.
#[derive(Debug)]
pub struct MultiFieldMapper {
    name: String,
    path_type: PathType,
    state: ArcSwap<MultiFieldSnapshot>,
    mutex: Mutex<()>,
}

impl MultiFieldMapper {
    pub fn new(
        name: impl Into<String>,
        path_type: PathType,
        mappers: IndexMap<String, Arc<Mapper>>,
        default_mapper: Option<Arc<Mapper>>,
    ) -> Self {
        Self {
            name: name.into(),
            path_type,
            state: ArcSwap::from_pointee(MultiFieldSnapshot {
                default_mapper,
                mappers,
            }),
            mutex: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    /// Loads the current snapshot.
    ///
    /// The returned snapshot is never modified; later merges publish a new one.
    pub fn snapshot(&self) -> Arc<MultiFieldSnapshot> {
        self.state.load_full()
    }

    /// The current default mapper.
    pub fn default_mapper(&self) -> Option<Arc<Mapper>> {
        self.state.load().default_mapper.clone()
    }

    /// The current sub-mapper called `name`.
    pub fn mapper(&self, name: &str) -> Option<Arc<Mapper>> {
        self.state.load().mappers.get(name).cloned()
    }

    /// Names of the current sub-mappers, in insertion order.
    pub fn mapper_names(&self) -> Vec<String> {
        self.state.load().mappers.keys().cloned().collect()
    }

    pub fn parse(&self, ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
        let snapshot = self.state.load_full();
        let orig_path_type = ctx.path_mut().set_path_type(self.path_type);
        let result = self.parse_snapshot(&snapshot, ctx);
        ctx.path_mut().set_path_type(orig_path_type);
        result
    }

    fn parse_snapshot(
        &self,
        snapshot: &MultiFieldSnapshot,
        ctx: &mut ParseContext<'_>,
    ) -> Result<(), ParseError> {
        // the default mapper is parsed without adding our name to the path
        if let Some(default_mapper) = &snapshot.default_mapper {
            default_mapper.parse(ctx)?;
        }

        ctx.path_mut().add(self.name.as_str());
        let result = snapshot
            .mappers
            .values()
            .try_for_each(|mapper| mapper.parse(ctx));
        ctx.path_mut().remove();
        result
    }

    pub(crate) fn merge(&self, incoming: &Mapper, ctx: &mut MergeContext<'_>) {
        let Mapper::MultiField(merge_with) = incoming else {
            ctx.add_conflict(format!(
                "Can't merge a non multi_field mapping [{}] of type [{}] with a multi_field mapping [{}]",
                incoming.name(),
                incoming.type_name(),
                self.name
            ));
            return;
        };

        let _guard = self.mutex.lock();
        let simulate = ctx.flags().simulate();
        let current = self.state.load_full();
        let incoming_state = merge_with.state.load_full();

        let mut registrations: Vec<FieldMapper> = Vec::new();
        let mut next_default = None;
        match (&current.default_mapper, &incoming_state.default_mapper) {
            (None, Some(incoming_default)) => {
                if !simulate {
                    let adopted = incoming_default.deep_copy();
                    // only a leaf default is registered, as in traverse
                    if let Mapper::Field(field) = adopted.as_ref() {
                        registrations.push(field.clone());
                    }
                    next_default = Some(adopted);
                }
            }
            (Some(default_mapper), Some(incoming_default)) => {
                default_mapper.merge_validated(incoming_default, ctx);
            }
            (_, None) => {}
        }

        let mut next_mappers: Option<IndexMap<String, Arc<Mapper>>> = None;
        for (name, incoming_mapper) in &incoming_state.mappers {
            match current.mappers.get(name) {
                Some(mapper) => mapper.merge_validated(incoming_mapper, ctx),
                None => {
                    if !simulate {
                        let adopted = incoming_mapper.deep_copy();
                        adopted.traverse(&mut registrations);
                        next_mappers
                            .get_or_insert_with(|| current.mappers.clone())
                            .insert(name.clone(), adopted);
                    }
                }
            }
        }

        if simulate || (next_default.is_none() && next_mappers.is_none()) {
            return;
        }

        let added = next_mappers
            .as_ref()
            .map_or(0, |mappers| mappers.len() - current.mappers.len());
        let registered = registrations.len();
        for field in registrations {
            ctx.registry().add_field_mapper(field);
        }
        self.state.store(Arc::new(MultiFieldSnapshot {
            default_mapper: next_default.or_else(|| current.default_mapper.clone()),
            mappers: next_mappers.unwrap_or_else(|| current.mappers.clone()),
        }));
        tracing::debug!(
            mapper = %self.name,
            added,
            registered,
            "published merged multi_field mappings"
        );
    }

    /// Checks the container invariants over this mapper and its descendants.
    pub(crate) fn validate(&self) -> Result<(), MergeError> {
        let snapshot = self.state.load_full();
        if let Some(default_mapper) = &snapshot.default_mapper {
            if default_mapper.name() != self.name {
                return Err(MergeError::Structural {
                    mapper: self.name.clone(),
                    reason: format!(
                        "default mapper is named [{}] instead of the multi_field name",
                        default_mapper.name()
                    ),
                });
            }
            default_mapper.validate()?;
        }
        for (key, mapper) in &snapshot.mappers {
            if key != mapper.name() {
                return Err(MergeError::Structural {
                    mapper: self.name.clone(),
                    reason: format!("sub-mapper [{}] is registered as [{key}]", mapper.name()),
                });
            }
            if mapper.name() == self.name {
                return Err(MergeError::Structural {
                    mapper: self.name.clone(),
                    reason: "a sub-mapper shares the multi_field name; it must be the default mapper"
                        .to_string(),
                });
            }
            mapper.validate()?;
        }
        Ok(())
    }

    pub(crate) fn deep_copy(&self) -> Self {
        let snapshot = self.state.load_full();
        Self::new(
            self.name.clone(),
            self.path_type,
            snapshot
                .mappers
                .iter()
                .map(|(name, mapper)| (name.clone(), mapper.deep_copy()))
                .collect(),
            snapshot.default_mapper.as_ref().map(|m| m.deep_copy()),
        )
    }

    /// Notifies the listener of every sub-field, and of the default mapper when it
    /// is a leaf. A default mapper that is itself a container is not descended into.
    pub(crate) fn traverse(&self, listener: &mut dyn FieldMapperListener) {
        let snapshot = self.state.load_full();
        if let Some(Mapper::Field(field)) = snapshot.default_mapper.as_deref() {
            listener.field_mapper(field);
        }
        for mapper in snapshot.mappers.values() {
            mapper.traverse(listener);
        }
    }

    pub(crate) fn to_json(&self, out: &mut Map<String, Value>) {
        let snapshot = self.state.load_full();
        let mut fields = Map::new();
        if let Some(default_mapper) = &snapshot.default_mapper {
            default_mapper.to_json(&mut fields);
        }
        for mapper in snapshot.mappers.values() {
            mapper.to_json(&mut fields);
        }

        let mut description = Map::new();
        description.insert("type".to_string(), Value::from(CONTENT_TYPE));
        description.insert("pathType".to_string(), Value::from(self.path_type.as_str()));
        description.insert("fields".to_string(), Value::Object(fields));
        out.insert(self.name.clone(), Value::Object(description));
    }

    /// Leaf fields reachable from this container, as [`MultiFieldMapper::traverse`] visits them.
    pub fn field_mappers(&self) -> Vec<FieldMapper> {
        let mut fields: Vec<FieldMapper> = Vec::new();
        self.traverse(&mut fields);
        fields
    }
}

impl PartialEq for MultiFieldMapper {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.path_type == other.path_type
            && *self.state.load_full() == *other.state.load_full()
    }
}
