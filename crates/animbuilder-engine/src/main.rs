//! # Animation Builder
//!
//! Host for the sprite animation preview tools.
//!
//! This binary ties together:
//! - Kernel: sprite definitions, clips and playback
//! - Tools: windows, queries and the floating toolbar
//!
//! ```bash
//! animbuilder --base-dir assets --script preview.txt
//! echo "preview" | animbuilder
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod script;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{BuilderConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "animbuilder")]
#[command(about = "Preview sprite animations")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Directory sprite paths are resolved against (overrides the config)
    #[arg(short, long)]
    base_dir: Option<PathBuf>,

    /// Command script to run instead of reading stdin
    #[arg(short, long)]
    script: Option<PathBuf>,
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = BuilderConfig::load_from(&cli.config);
    if let Some(base_dir) = cli.base_dir {
        config.base_directory = base_dir;
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(&config.log_filter),
    };
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    info!("Animation builder starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    app::run(config, cli.script.as_deref())?;

    info!("Animation builder shutdown complete");
    Ok(())
}
