//! Parse command - indexes a JSON document with a mapping.

use super::{load_mapper, read_json};
use crate::cli::ParseArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the parse command
pub fn run(args: &ParseArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mapper = load_mapper(&args.mapping)?;
    let source = read_json(&args.document)?;
    let parsed = mapper.parse_json(&source)?;
    tracing::info!(indexed = parsed.len(), "parsed document");

    match format {
        OutputFormat::Human => {
            if parsed.is_empty() {
                println!("No fields indexed");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = parsed
                .fields()
                .iter()
                .map(|field| {
                    vec![
                        field.name.clone(),
                        serde_json::to_string(&field.value).unwrap_or_default(),
                        if field.stored { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["FIELD", "VALUE", "STORED"], &rows);
        }
        OutputFormat::Json => print_json(parsed.fields())?,
    }

    Ok(())
}
