//! Show command - builds a mapping and prints its definition and fields.

use super::{FIELD_HEADERS, field_rows, load_mapper};
use crate::cli::ShowArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the show command
pub fn run(args: &ShowArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mapper = load_mapper(&args.mapping)?;

    match format {
        OutputFormat::Human => {
            println!("Type:     {}", mapper.type_name());
            println!("Mappers:  {}", mapper.mappers().len());
            println!("Fields:   {}", mapper.field_mappers().len());
            println!();
            print_table(&FIELD_HEADERS, &field_rows(&mapper));
            println!();
            println!("{}", serde_json::to_string_pretty(&mapper.to_json())?);
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "mapping": mapper.to_json(),
                "fields": mapper.field_mappers().index_names(),
            });
            print_json(&value)?;
        }
    }

    Ok(())
}
