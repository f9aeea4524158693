use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing, with --log / DOCMAPPER_LOG taking precedence over RUST_LOG
    let filter = match &cli.log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::from_default_env().add_directive("docmapper=info".parse()?),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let format: output::OutputFormat = cli.format.into();
    match &cli.command {
        Commands::Show(args) => commands::show::run(args, format),
        Commands::Parse(args) => commands::parse::run(args, format),
        Commands::Merge(args) => {
            if !commands::merge::run(args, format)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Health(args) => commands::health::run(args, format),
    }
}
