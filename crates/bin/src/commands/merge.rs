//! Merge command - merges an incoming mapping and reports conflicts.

use docmapper::MergeFlags;

use super::load_mapper;
use crate::cli::MergeArgs;
use crate::output::{OutputFormat, print_json};

/// Run the merge command
///
/// Returns `Ok(false)` when conflicts were found so the caller can exit non-zero.
pub fn run(args: &MergeArgs, format: OutputFormat) -> Result<bool, Box<dyn std::error::Error>> {
    let mapper = load_mapper(&args.mapping)?;
    let incoming = load_mapper(&args.incoming)?;

    let flags = MergeFlags::new().with_simulate(args.simulate);
    let result = mapper.merge(&incoming, flags)?;

    match format {
        OutputFormat::Human => {
            if result.has_conflicts() {
                println!("Conflicts:");
                for conflict in result.conflicts() {
                    println!("  {conflict}");
                }
            } else {
                println!("No conflicts");
            }
            if args.simulate {
                println!("Simulated: mapping left unchanged");
            }
            println!();
            println!("{}", serde_json::to_string_pretty(&mapper.to_json())?);
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "simulate": result.simulated(),
                "conflicts": result.conflicts(),
                "mapping": mapper.to_json(),
            });
            print_json(&value)?;
        }
    }

    Ok(!result.has_conflicts())
}
