//! Fold an event log and inspect the resulting state
//!
//! Reads a JSON array of events, rebuilds the combat state and prints it
//! together with its state root.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use combat_core::{RoundState, build_state};

use crate::utils;

/// Fold an event log and print the resulting state
#[derive(Parser)]
pub struct Replay {
    /// Event log (JSON array of events)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Only fold the first N events
    #[arg(short, long, value_name = "N")]
    upto: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Summary view (round, order, active turn)
    Summary,
    /// Full JSON output
    Json,
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let events = utils::read_events(&self.file)?;
        let end = self.upto.map_or(events.len(), |n| n.min(events.len()));
        let state = build_state(&events[..end])
            .with_context(|| format!("Failed to replay {}", self.file.display()))?;
        let root = hex::encode(state.state_root().context("Failed to hash state")?);
        tracing::info!(events = end, %root, "log replayed");

        match self.format {
            OutputFormat::Summary => {
                let size = std::fs::metadata(&self.file).map(|m| m.len() as usize).unwrap_or(0);
                println!(
                    "{} {} ({})",
                    style("Event Log:").bold().cyan(),
                    self.file.display(),
                    utils::format_bytes(size)
                );
                println!(
                    "{} {} of {}",
                    style("Events Folded:").bold().cyan(),
                    end,
                    events.len()
                );
                println!("{} {}", style("State Root:").bold().cyan(), root);
                println!();
                print_summary(&state);
            }
            OutputFormat::Json => {
                let json = serde_json::json!({ "events": end, "state_root": root, "state": state });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json).context("Failed to serialize state to JSON")?
                );
            }
        }
        Ok(())
    }
}

fn print_summary(state: &RoundState) {
    println!("{}", style("=== Combat State Summary ===").bold().green());
    println!();

    println!("{}", style("Round:").bold().yellow());
    println!("  Number: {}", state.round_number);
    println!("  Surprise Round: {}", state.is_surprise_round);
    println!();

    println!("{}", style("Initiative Order:").bold().yellow());
    for (index, entry) in state.initiative_order.iter().enumerate() {
        let marker = if state.active_creature() == Some(entry.creature_id) {
            style("▶").green().to_string()
        } else {
            " ".to_string()
        };
        let mut notes = Vec::new();
        if state.is_surprised(entry.creature_id) {
            notes.push("surprised");
        }
        if !state.can_react(entry.creature_id) {
            notes.push("reaction spent");
        }
        println!(
            "{} {:>2}. {} total {} (roll {}, mod {:+}) speed {} {}",
            marker,
            index + 1,
            entry.creature_id,
            entry.total,
            entry.base_roll,
            entry.modifier,
            state.speed_of(entry.creature_id),
            notes.join(", ")
        );
    }
    if !state.delayed.is_empty() {
        println!("{}", style("Delayed:").bold().yellow());
        for entry in state.delayed.values() {
            println!("  {} (initiative {})", entry.creature_id, entry.total);
        }
    }
    println!();

    println!("{}", style("Active Turn:").bold().yellow());
    match &state.current_turn {
        Some(turn) => {
            let phase = &turn.phase;
            println!("  Creature: {}", turn.active_creature_id);
            println!("  Movement Remaining: {} ft", phase.movement_remaining);
            println!("  Action: {}", available(phase.action_available));
            println!("  Bonus Action: {}", available(phase.bonus_action_available));
            println!("  Reaction: {}", available(phase.reaction_available));
        }
        None => println!("  none"),
    }
}

fn available(flag: bool) -> &'static str {
    if flag { "available" } else { "spent" }
}
