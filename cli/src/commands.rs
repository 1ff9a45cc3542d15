pub mod expand;
pub mod generate;
use crate::writer::Format;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate the resources of a single Spanner template from its properties
    Generate(generate::GenerateCommand),

    /// Expand all Spanner templates of a Deployment Manager config
    Expand(expand::ExpandCommand),
}

/// Flags shared by all commands
#[derive(clap::Args, Clone, Debug, Default)]
pub(crate) struct SharedArgs {
    /// Path to the settings file (spanner-dm.toml in the current directory by default)
    #[arg(long)]
    pub(crate) config_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub(crate) format: Option<Format>,

    /// Write the result into a file instead of stdout
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}
