//! Playground CLI - development server for a single web component.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "Development playground for a web component")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to playground.toml config file
    #[arg(short, long, default_value = "playground.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the playground dev server
    Dev {
        /// Port to listen on (defaults to config or 7000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Write the manifest with deployed endpoint URLs filled in
    Manifest {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let config = commands::config::load(&cli.config)?;

    match cli.command {
        Commands::Dev { port, no_open } => {
            commands::dev::run(config, port, !no_open).await?;
        }
        Commands::Manifest { out } => {
            commands::manifest::run(&config, &out)?;
        }
    }

    Ok(())
}
