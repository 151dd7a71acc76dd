//! Per-turn resource helpers.
//!
//! Consuming an already-spent resource is a no-op here; rejecting illegal
//! double consumption is the orchestrator's call.

use super::{TransitionError, TransitionResult, verified};
use crate::state::{CreatureId, RoundState, TurnPhase};

/// Applies `update` to the active creature's phase.
fn with_active_phase(
    state: &RoundState,
    creature_id: CreatureId,
    update: impl FnOnce(&mut TurnPhase) -> Result<(), TransitionError>,
) -> TransitionResult {
    let turn = state.current_turn.ok_or(TransitionError::NoActiveTurn)?;
    if turn.active_creature_id != creature_id {
        return Err(TransitionError::NotActive { creature_id });
    }

    let mut next = state.clone();
    if let Some(turn) = next.current_turn.as_mut() {
        update(&mut turn.phase)?;
    }
    verified(next)
}

/// Spends `feet` of the active creature's movement.
///
/// Fails when more movement is requested than remains; once movement is
/// exhausted further calls change nothing.
pub fn consume_movement(state: &RoundState, creature_id: CreatureId, feet: u32) -> TransitionResult {
    with_active_phase(state, creature_id, |phase| {
        if phase.movement_remaining == 0 {
            return Ok(());
        }
        if feet > phase.movement_remaining {
            return Err(TransitionError::InsufficientMovement {
                requested: feet,
                remaining: phase.movement_remaining,
            });
        }
        phase.movement_remaining -= feet;
        Ok(())
    })
}

pub fn consume_action(state: &RoundState, creature_id: CreatureId) -> TransitionResult {
    with_active_phase(state, creature_id, |phase| {
        phase.action_available = false;
        Ok(())
    })
}

pub fn consume_bonus_action(state: &RoundState, creature_id: CreatureId) -> TransitionResult {
    with_active_phase(state, creature_id, |phase| {
        phase.bonus_action_available = false;
        Ok(())
    })
}

/// Spends a creature's reaction, on its own turn or anyone else's.
///
/// The reaction stays spent until that creature's next turn starts.
pub fn consume_reaction(state: &RoundState, creature_id: CreatureId) -> TransitionResult {
    if !state.contains(creature_id) {
        return Err(TransitionError::CreatureNotFound { creature_id });
    }

    let mut next = state.clone();
    next.reactions_spent.insert(creature_id);
    if let Some(turn) = next.current_turn.as_mut() {
        if turn.active_creature_id == creature_id {
            turn.phase.reaction_available = false;
        }
    }
    verified(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::advance_turn;
    use crate::turn::fixtures::three;

    #[test]
    fn movement_is_spent_in_parts() {
        let state = three();
        let state = consume_movement(&state, CreatureId(1), 10).unwrap();
        let state = consume_movement(&state, CreatureId(1), 15).unwrap();
        assert_eq!(state.phase().unwrap().movement_remaining, 5);

        assert_eq!(
            consume_movement(&state, CreatureId(1), 10),
            Err(TransitionError::InsufficientMovement {
                requested: 10,
                remaining: 5
            })
        );

        let spent = consume_movement(&state, CreatureId(1), 5).unwrap();
        assert_eq!(consume_movement(&spent, CreatureId(1), 5), Ok(spent.clone()));
    }

    #[test]
    fn double_consumption_is_a_no_op() {
        let once = consume_action(&three(), CreatureId(1)).unwrap();
        assert!(!once.phase().unwrap().action_available);
        assert_eq!(consume_action(&once, CreatureId(1)), Ok(once.clone()));

        let bonus = consume_bonus_action(&once, CreatureId(1)).unwrap();
        assert_eq!(consume_bonus_action(&bonus, CreatureId(1)), Ok(bonus.clone()));
    }

    #[test]
    fn only_the_active_creature_spends_turn_resources() {
        assert_eq!(
            consume_action(&three(), CreatureId(2)),
            Err(TransitionError::NotActive {
                creature_id: CreatureId(2)
            })
        );
    }

    #[test]
    fn reaction_restored_only_at_own_next_turn() {
        // 3 reacts during 1's turn
        let state = consume_reaction(&three(), CreatureId(3)).unwrap();
        assert!(!state.can_react(CreatureId(3)));

        let state = advance_turn(&state).unwrap();
        assert!(!state.can_react(CreatureId(3)));

        let state = advance_turn(&state).unwrap();
        assert_eq!(state.active_creature(), Some(CreatureId(3)));
        assert!(state.can_react(CreatureId(3)));
        assert!(state.phase().unwrap().reaction_available);
    }

    #[test]
    fn own_reaction_clears_phase_flag() {
        let state = consume_reaction(&three(), CreatureId(1)).unwrap();
        assert!(!state.phase().unwrap().reaction_available);
        assert!(!state.can_react(CreatureId(1)));
        assert_eq!(consume_reaction(&state, CreatureId(1)), Ok(state.clone()));
    }

    #[test]
    fn reaction_requires_a_creature_in_combat() {
        assert_eq!(
            consume_reaction(&three(), CreatureId(42)),
            Err(TransitionError::CreatureNotFound {
                creature_id: CreatureId(42)
            })
        );
    }
}
