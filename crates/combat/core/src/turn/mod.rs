//! Turn state machine.
//!
//! Pure transitions over [`RoundState`]: each takes the current state by
//! reference and returns either a replacement state or a [`TransitionError`]
//! naming the violated precondition. There is no machine object beyond the
//! value itself.
//!
//! - Initiative: [`roll_initiative_for_all`], [`initialize`]
//! - Turn flow: [`begin_first_turn`], [`start_turn`], [`end_turn`],
//!   [`advance_turn`], [`begin_round`]
//! - Roster: [`add_creature`], [`remove_creature`], [`delay_turn`],
//!   [`resume_delayed_turn`]
//! - Resources: [`consume_movement`], [`consume_action`],
//!   [`consume_bonus_action`], [`consume_reaction`]
mod errors;
mod initiative;
mod resources;
mod roster;
mod turns;

pub use errors::TransitionError;
pub use initiative::{initialize, roll_initiative_for_all};
pub use resources::{consume_action, consume_bonus_action, consume_movement, consume_reaction};
pub use roster::{add_creature, delay_turn, remove_creature, resume_delayed_turn};
pub use turns::{advance_turn, begin_first_turn, begin_round, end_turn, start_turn};

use std::collections::BTreeSet;

use crate::state::RoundState;

/// Success with the replacement state, or InvalidState with a reason.
pub type TransitionResult = Result<RoundState, TransitionError>;

/// Checks the structural invariants every transition must preserve.
pub fn check_invariants(state: &RoundState) -> Result<(), TransitionError> {
    let violation = |reason: String| Err(TransitionError::InvariantViolation { reason });

    if state.is_surprise_round && state.round_number != 0 {
        return violation(format!(
            "surprise round flagged in round {}",
            state.round_number
        ));
    }

    let mut seen = BTreeSet::new();
    for entry in &state.initiative_order {
        if !seen.insert(entry.creature_id) {
            return violation(format!("{} appears twice in the order", entry.creature_id));
        }
        if state.delayed.contains_key(&entry.creature_id) {
            return violation(format!("{} is both ordered and delayed", entry.creature_id));
        }
    }

    if let Some(turn) = state.current_turn {
        let len = state.initiative_order.len();
        let entry = state
            .initiative_order
            .get(turn.turn_index)
            .ok_or(TransitionError::IndexOutOfBounds {
                index: turn.turn_index,
                len,
            })?;
        if entry.creature_id != turn.active_creature_id {
            return violation(format!(
                "turn index {} holds {}, not active {}",
                turn.turn_index, entry.creature_id, turn.active_creature_id
            ));
        }
        if turn.phase.creature_id != turn.active_creature_id {
            return violation("turn phase belongs to another creature".into());
        }
    }

    Ok(())
}

/// Returns the state if it passes [`check_invariants`].
pub(crate) fn verified(state: RoundState) -> TransitionResult {
    check_invariants(&state)?;
    Ok(state)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeSet;

    use super::*;
    use crate::state::{CreatureId, InitiativeEntry};

    pub fn entry(id: u32, total: i32, modifier: i32) -> InitiativeEntry {
        InitiativeEntry::new(CreatureId(id), (total - modifier) as u32, modifier)
    }

    /// Three creatures acting in id order, no surprise.
    pub fn three() -> RoundState {
        let order = vec![entry(1, 18, 2), entry(2, 14, 1), entry(3, 9, 0)];
        let state = initialize(order, BTreeSet::new()).unwrap();
        begin_first_turn(&state).unwrap()
    }

    pub fn ids(state: &RoundState) -> Vec<u32> {
        state.order_ids().map(|id| id.0).collect()
    }
}
