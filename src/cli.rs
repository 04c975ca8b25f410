use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "awm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub subcommand: Sub,
}

#[derive(Subcommand)]
pub enum Sub {
    /// Validate the config file and print a summary of its binds.
    Validate {
        /// Path to config file (default: `$XDG_CONFIG_HOME/awm/config.kdl`).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
