//! Subcommand implementations.

pub mod health;
pub mod merge;
pub mod parse;
pub mod show;

use std::path::Path;

use docmapper::DocumentMapper;
use serde_json::Value;

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

/// Load a document mapper from a mapping definition file.
pub fn load_mapper(path: &Path) -> Result<DocumentMapper, Box<dyn std::error::Error>> {
    let definition = read_json(path)?;
    let mapper = DocumentMapper::from_value(&definition)?;
    tracing::info!(
        path = %path.display(),
        type_name = mapper.type_name(),
        fields = mapper.field_mappers().len(),
        "loaded mapping"
    );
    Ok(mapper)
}

/// Rows of `index name | name | type | stored` for every registered field.
pub fn field_rows(mapper: &DocumentMapper) -> Vec<Vec<String>> {
    mapper
        .field_mappers()
        .snapshot()
        .values()
        .map(|field| {
            vec![
                field.index_name().to_string(),
                field.name().to_string(),
                field.field_type().to_string(),
                if field.store() { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect()
}

pub const FIELD_HEADERS: [&str; 4] = ["INDEX NAME", "NAME", "TYPE", "STORED"];
