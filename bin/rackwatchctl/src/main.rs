//! ---
//! rw_section: "05-networking-external-interfaces"
//! rw_subsection: "binary"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Terminal dashboard for simulated rack telemetry."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rackwatch_common::{init_tracing, AppConfig};
use tracing::info;

mod control;
mod render;
mod snapshot;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Simulated data-center rack dashboard",
    long_about = None
)]
struct Cli {
    /// Configuration file (TOML). Defaults to RACKWATCH_CONFIG or ./rackwatch.toml when present.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Generate fresh telemetry and render alerts and savings")]
    Snapshot(snapshot::SnapshotArgs),
    #[command(subcommand, about = "Operator controls (acknowledgement only, nothing is actuated)")]
    Control(control::ControlCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = AppConfig::resolve(cli.config.as_deref())?;
    init_tracing(env!("CARGO_PKG_NAME"), &loaded.config.logging)?;
    info!(
        source = %loaded
            .source
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_owned()),
        racks = loaded.config.racks.len(),
        "configuration loaded"
    );

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Commands::Snapshot(args) => snapshot::run(args, &loaded.config, &mut stdout)?,
        Commands::Control(cmd) => control::run(cmd, &loaded.config, &mut stdout)?,
    }
    Ok(())
}
