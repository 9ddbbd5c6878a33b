mod commands;
mod shutdown;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use d2mem_core::TargetConfig;
use d2mem_core::memory::layout::timing;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "d2mem")]
#[command(version, about = "Diablo II: Resurrected player state reader")]
struct Args {
    /// Target configuration (JSON); built-in defaults when omitted
    #[arg(short, long, global = true, env = "D2MEM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the game and print every state change (default)
    Watch {
        /// Delay between polls while attached
        #[arg(long, default_value_t = timing::POLL_INTERVAL_MS)]
        interval_ms: u64,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Resolve anchors, player and endpoint once and print them
    Anchors,
    /// Write the built-in configuration to a file
    InitConfig {
        path: PathBuf,

        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("d2mem=info".parse()?)
                .add_directive("d2mem_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let config = TargetConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            config
        }
        None => TargetConfig::default(),
    };

    match args.command.unwrap_or(Command::Watch {
        interval_ms: timing::POLL_INTERVAL_MS,
        json: false,
    }) {
        Command::Watch { interval_ms, json } => {
            commands::watch::run(config, Duration::from_millis(interval_ms), json)
        }
        Command::Anchors => commands::anchors::run(&config),
        Command::InitConfig { path, force } => commands::config::run(&path, force),
    }
}
