//! Check replay idempotence of an event log
//!
//! Every prefix of the log must fold without error, fold to the same state
//! twice, and extend the previous prefix's state by exactly its last event.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;

use combat_core::{CombatEvent, RoundState, apply_event, build_state};
use combat_runtime::SessionConfig;

use crate::utils;

/// Check that an event log replays identically at every prefix
#[derive(Parser)]
pub struct Verify {
    /// Event log (JSON array of events)
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

impl Verify {
    pub fn execute(self, config: Option<&SessionConfig>) -> Result<()> {
        let events = utils::read_events(&self.file)?;
        if let Some(config) = config {
            check_sessions(&events, config)?;
        }

        let state = verify_log(&events)
            .with_context(|| format!("Replay check failed for {}", self.file.display()))?;
        let root = hex::encode(state.state_root().context("Failed to hash state")?);
        tracing::info!(events = events.len(), %root, "log verified");

        println!(
            "{} {} event(s) replay identically",
            style("OK").bold().green(),
            events.len()
        );
        println!("{} {}", style("State Root:").bold().cyan(), root);
        Ok(())
    }
}

fn check_sessions(events: &[CombatEvent], config: &SessionConfig) -> Result<()> {
    let expected = config.session_id();
    if let Some((index, event)) = events
        .iter()
        .enumerate()
        .find(|(_, event)| event.session_id != expected)
    {
        bail!(
            "Event {} belongs to session {}, expected {}",
            index,
            event.session_id,
            expected
        );
    }
    Ok(())
}

/// Folds every prefix and returns the state of the full log.
pub fn verify_log(events: &[CombatEvent]) -> Result<RoundState> {
    let mut previous = RoundState::empty();
    for end in 1..=events.len() {
        let prefix = &events[..end];
        let first = build_state(prefix)?;
        let second = build_state(prefix)?;
        if first != second {
            bail!("Prefix of {} event(s) folded to two different states", end);
        }

        let stepped = apply_event(&previous, &events[end - 1])
            .with_context(|| format!("Event {} does not apply to its prefix", end - 1))?;
        if stepped != first {
            bail!("Event {} does not extend its prefix", end - 1);
        }
        previous = first;
    }
    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_events;

    const LOG: &str = r#"[
        {"session_id":"s","timestamp":1,"kind":{"type":"EncounterStarted",
            "participants":[
                {"creature_id":1,"initiative_modifier":2,"speed":30},
                {"creature_id":2,"initiative_modifier":0,"speed":25}],
            "initiative_order":[
                {"creature_id":1,"base_roll":15,"modifier":2,"total":17},
                {"creature_id":2,"base_roll":9,"modifier":0,"total":9}],
            "surprised":[]}},
        {"session_id":"s","timestamp":2,"kind":{"type":"TurnStarted","creature_id":1}},
        {"session_id":"s","timestamp":3,"kind":{"type":"MovementSpent","creature_id":1,"feet":10}},
        {"session_id":"s","timestamp":4,"kind":{"type":"TurnEnded","creature_id":1}},
        {"session_id":"s","timestamp":5,"kind":{"type":"TurnStarted","creature_id":2}}
    ]"#;

    #[test]
    fn accepts_a_consistent_log() {
        let events = parse_events(LOG).unwrap();
        let state = verify_log(&events).unwrap();
        assert_eq!(state.active_creature().map(|id| id.0), Some(2));
        assert_eq!(state.phase().unwrap().movement_remaining, 25);
    }

    #[test]
    fn reports_an_inapplicable_event() {
        let mut events = parse_events(LOG).unwrap();
        events.swap(3, 4);
        assert!(verify_log(&events).is_err());
    }

    #[test]
    fn rejects_foreign_sessions() {
        let events = parse_events(LOG).unwrap();
        let config = SessionConfig::new("other", 0);
        assert!(check_sessions(&events, &config).is_err());
        assert!(check_sessions(&events, &SessionConfig::new("s", 0)).is_ok());
    }
}
