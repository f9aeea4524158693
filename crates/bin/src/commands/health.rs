//! Health command - decodes or encodes a binary cluster health record.

use docmapper::health::ClusterHealthResponse;

use super::read_json;
use crate::cli::HealthArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the health command
pub fn run(args: &HealthArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(source) = &args.encode {
        let response: ClusterHealthResponse = serde_json::from_value(read_json(source)?)?;
        let bytes = response.to_bytes()?;
        std::fs::write(&args.file, &bytes)?;
        tracing::info!(
            path = %args.file.display(),
            bytes = bytes.len(),
            "wrote health record"
        );
        return Ok(());
    }

    let bytes = std::fs::read(&args.file)?;
    let response = ClusterHealthResponse::from_bytes(&bytes)?;

    match format {
        OutputFormat::Human => {
            println!("Cluster:          {}", response.cluster_name);
            println!("Status:           {:?}", response.status);
            println!("Active primaries: {}", response.active_primary_shards);
            println!("Active shards:    {}", response.active_shards);
            println!("Relocating:       {}", response.relocating_shards);
            println!("Timed out:        {}", response.timed_out);
            println!();
            let rows: Vec<Vec<String>> = response
                .iter()
                .map(|index| {
                    vec![
                        index.index.clone(),
                        format!("{:?}", index.status),
                        index.number_of_shards.to_string(),
                        index.number_of_replicas.to_string(),
                        index.active_shards.to_string(),
                    ]
                })
                .collect();
            print_table(&["INDEX", "STATUS", "SHARDS", "REPLICAS", "ACTIVE"], &rows);
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
