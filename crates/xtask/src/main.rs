//! Development tasks for the combat workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Replay, Roll, Verify};

/// Development tasks for the combat workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the combat core", long_about = None)]
#[command(version)]
struct Cli {
    /// Session config (TOML) supplying defaults such as the seed
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Roll dice from a seeded stream
    Roll(Roll),

    /// Fold an event log and print the resulting state
    Replay(Replay),

    /// Check that an event log replays identically at every prefix
    Verify(Verify),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for RUST_LOG and other env vars)
    let _ = dotenvy::dotenv();
    utils::init_tracing();

    let cli = Cli::parse();
    let config = utils::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Roll(cmd) => cmd.execute(config.as_ref()),
        Command::Replay(cmd) => cmd.execute(),
        Command::Verify(cmd) => cmd.execute(config.as_ref()),
    }
}
