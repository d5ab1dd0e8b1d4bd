use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a folio.toml config file with the default settings
    Config {
        /// Where to write the configuration
        #[clap(long, default_value = "folio.toml")]
        path: PathBuf,
        /// Overwrite the file if it already exists
        #[clap(long)]
        force: bool,
    },
    /// Renders the report according to the configuration
    Render {
        /// Configuration file (folio.toml is used if present)
        #[clap(short, long)]
        config: Option<PathBuf>,
        /// Output PDF, overriding the configured path
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
