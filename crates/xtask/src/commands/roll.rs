//! Roll dice from a seeded stream
//!
//! The same notation and seed always print the same rolls.

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;

use combat_core::{DiceEngine, DiceExpression, Die, RollMode};
use combat_runtime::SessionConfig;

/// Roll dice from a seeded stream
#[derive(Parser)]
pub struct Roll {
    /// Dice notation (e.g., 2d6+3, d20, 4d8-2)
    #[arg(value_name = "NOTATION")]
    notation: String,

    /// Stream seed (defaults to the config seed, then 0)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of times to roll
    #[arg(short, long, default_value_t = 1)]
    times: u32,

    /// Roll a single d20 twice and keep the higher
    #[arg(long, conflicts_with = "disadvantage")]
    advantage: bool,

    /// Roll a single d20 twice and keep the lower
    #[arg(long)]
    disadvantage: bool,
}

impl Roll {
    pub fn execute(self, config: Option<&SessionConfig>) -> Result<()> {
        let expression = DiceExpression::parse(&self.notation)
            .with_context(|| format!("Invalid dice notation: {}", self.notation))?;
        let mode = self.mode();
        if mode != RollMode::Normal && (expression.count() != 1 || expression.die() != Die::D20) {
            bail!("--advantage/--disadvantage apply to a single d20, got {expression}");
        }

        let seed = self.seed.or(config.map(|c| c.seed)).unwrap_or(0);
        let mut engine = DiceEngine::new(seed);
        tracing::debug!(seed, %expression, times = self.times, "rolling");

        println!(
            "{} {}  {} {}  {} {}",
            style("Expression:").bold().cyan(),
            expression,
            style("Seed:").bold().cyan(),
            seed,
            style("Range:").bold().cyan(),
            format!("{}..={}", expression.min(), expression.max())
        );

        for index in 1..=self.times {
            if mode == RollMode::Normal {
                let roll = engine.roll_expression(&expression);
                println!("  #{index:<3} {}", style(roll.total()).bold());
            } else {
                let roll = engine.roll_d20(expression.modifier(), mode);
                println!(
                    "  #{index:<3} {}  (rolled {:?}, kept {})",
                    style(roll.total()).bold(),
                    roll.rolls(),
                    roll.natural()
                );
            }
        }

        println!("{} {}", style("Cursor:").bold().cyan(), engine.cursor());
        Ok(())
    }

    fn mode(&self) -> RollMode {
        if self.advantage {
            RollMode::Advantage
        } else if self.disadvantage {
            RollMode::Disadvantage
        } else {
            RollMode::Normal
        }
    }
}
