//! Pannable CLI
//!
//! Runs kinetic scrolling scenarios headless and manages `pannable.toml`
//! configuration files.

mod config;
mod scenario;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

/// Kinetic pannable area toolkit
#[derive(Parser, Debug)]
#[command(name = "pannable")]
#[command(about = "Run kinetic scrolling scenarios and manage pannable configuration")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON scenario against a headless area and print a report
    Simulate {
        /// Scenario file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Config file or directory containing pannable.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration files
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a config file with default values
    Init {
        #[arg(short, long, default_value = config::CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a config file
    Check { path: PathBuf },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Simulate {
            scenario,
            config,
            output,
        } => {
            let config = config::load(config.as_deref())?;
            let scenario = Scenario::from_path(&scenario)?;
            info!("Running {} scenario steps", scenario.steps.len());

            let report = simulate::run(&scenario, config)?;
            let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Report written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Config(ConfigCommand::Init { path, force }) => {
            config::init(&path, force)?;
            info!("Wrote {}", path.display());
        }
        Command::Config(ConfigCommand::Check { path }) => {
            config::load(Some(&path))?;
            info!("{} is valid", path.display());
        }
    }

    Ok(())
}
