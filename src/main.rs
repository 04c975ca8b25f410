#[macro_use]
extern crate tracing;

use std::process;

use anyhow::Context;
use awm::cli::{Cli, Sub};
use awm::input::BindTable;
use awm::utils::default_config_path;
use awm_config::Config;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "awm=debug,awm_config=debug";

fn main() -> anyhow::Result<()> {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    match cli.subcommand {
        Sub::Validate { config } => {
            let _span = tracy_client::span!("validate");

            let path = match config {
                Some(path) => path,
                None => default_config_path().context("error getting the config path")?,
            };

            let config = match Config::load(&path) {
                Ok(config) => config,
                Err(err) => {
                    warn!("{err:?}");
                    process::exit(1);
                }
            };

            let binds = BindTable::from_config(&config);
            info!(
                "config is valid: {} binds, {} shift binds, {} workspaces per output",
                binds.plain_len(),
                binds.shift_len(),
                config.layout.workspaces_per_output,
            );
        }
    }

    Ok(())
}
