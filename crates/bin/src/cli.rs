//! CLI argument definitions for the docmapper binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Output format selection on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    /// Aligned text for terminals
    Human,
    /// One JSON document per command
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Human => OutputFormat::Human,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Inspect, apply and merge document mappings
#[derive(Parser, Debug)]
#[command(name = "docmapper")]
#[command(about = "docmapper: build, parse with and merge document mappings")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "human", env = "DOCMAPPER_FORMAT")]
    pub format: Format,

    /// Log filter directives, e.g. `docmapper=debug`
    #[arg(long, global = true, env = "DOCMAPPER_LOG")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a mapping definition and print it with its registered fields
    Show(ShowArgs),
    /// Parse a JSON document with a mapping and print the indexed fields
    Parse(ParseArgs),
    /// Merge an incoming mapping into an existing one
    Merge(MergeArgs),
    /// Decode or encode a binary cluster health record
    Health(HealthArgs),
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Mapping definition file (`{"<type>": {"properties": {...}}}`)
    pub mapping: PathBuf,
}

/// Arguments for the parse command
#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// Mapping definition file
    pub mapping: PathBuf,

    /// JSON document to parse
    pub document: PathBuf,
}

/// Arguments for the merge command
#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Mapping definition to merge into
    pub mapping: PathBuf,

    /// Incoming mapping definition
    pub incoming: PathBuf,

    /// Only report conflicts, leaving the mapping unchanged
    #[arg(short, long)]
    pub simulate: bool,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Binary health record file
    pub file: PathBuf,

    /// JSON health description to encode into `file` instead of decoding it
    #[arg(short, long)]
    pub encode: Option<PathBuf>,
}
