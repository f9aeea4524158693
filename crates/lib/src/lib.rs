//!
//! docmapper: the mapping core of a document indexing engine.
//! This library defines how named fields of semi-structured documents are declared,
//! nested, and evolved over time without taking read locks.
//!
//! ## Core Concepts
//!
//! * **Mappers (`mapper::Mapper`)**: Nodes of the mapping tree. A mapper is either a leaf
//!   field (`mapper::FieldMapper`) or a multi-field container (`mapper::MultiFieldMapper`)
//!   holding a default self-mapper plus named sub-fields.
//! * **Builders (`mapper::MapperBuilder`)**: Staged, single-owner constructors that turn a
//!   declarative description into an immutable mapper tree.
//! * **Content paths (`path::ContentPath`)**: Scoped state that computes the dotted name of
//!   a field while building or parsing.
//! * **Merging (`mapper::MergeContext`)**: Schema changes are merged into the live tree.
//!   Conflicts are collected as data, and a merge can be simulated as a dry run.
//! * **Document mappers (`document::DocumentMapper`)**: The root of a mapping tree, owning
//!   the top-level mappers and the field registry (`registry::FieldMappers`).
//! * **Cluster health (`health::ClusterHealthResponse`)**: The binary health record
//!   exchanged alongside mapping operations.
//!
//! Readers always work from an immutable snapshot. A merge builds the next snapshot
//! in full and publishes it atomically, so parsing never blocks on schema changes.

pub mod document;
pub mod health;
pub mod mapper;
pub mod path;
pub mod registry;

pub use document::DocumentMapper;
pub use mapper::{Mapper, MergeFlags, MergeResult};
pub use path::{ContentPath, PathType};

/// Result type used throughout the docmapper library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the docmapper library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Errors raised while reading a path type or path component
    #[error(transparent)]
    Path(path::PathError),

    /// A document value could not be parsed by its field mapper
    #[error(transparent)]
    Parse(mapper::ParseError),

    /// A merge hit a structurally invalid mapping
    #[error(transparent)]
    Merge(mapper::MergeError),

    /// A mapping definition could not be turned into builders
    #[error(transparent)]
    Mapping(mapper::MapperParsingError),

    /// Structured errors from the cluster health codec
    #[error(transparent)]
    Health(health::HealthError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Path(_) => "path",
            Error::Parse(_) => "parse",
            Error::Merge(_) => "merge",
            Error::Mapping(_) => "mapping",
            Error::Health(_) => "health",
        }
    }

    /// Check if this error was caused by a malformed document.
    ///
    /// These errors are scoped to a single document; callers typically reject
    /// that document and keep indexing.
    pub fn is_document_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// Check if this error was caused by an invalid mapping definition or tree.
    pub fn is_mapping_error(&self) -> bool {
        match self {
            Error::Mapping(_) | Error::Path(_) => true,
            Error::Merge(err) => err.is_structural(),
            _ => false,
        }
    }

    /// Check if this error was caused by a malformed wire record.
    pub fn is_wire_error(&self) -> bool {
        matches!(self, Error::Health(_))
    }
}
