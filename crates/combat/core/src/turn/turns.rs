use super::{TransitionError, TransitionResult, verified};
use crate::state::{CreatureId, CurrentTurn, RoundState, TurnPhase};

/// First index at or after `start` whose creature may act this round.
fn next_eligible(state: &RoundState, start: usize) -> Option<usize> {
    state
        .initiative_order
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, entry)| !state.is_surprised(entry.creature_id))
        .map(|(index, _)| index)
}

fn require_started(state: &RoundState) -> Result<(), TransitionError> {
    if state.is_started() {
        Ok(())
    } else {
        Err(TransitionError::NotStarted)
    }
}

fn require_idle(state: &RoundState) -> Result<(), TransitionError> {
    match state.current_turn {
        Some(turn) => Err(TransitionError::TurnInProgress {
            active: turn.active_creature_id,
        }),
        None => Ok(()),
    }
}

/// Starts the turn of the creature at `index`, which must be valid.
fn start_at(mut state: RoundState, index: usize) -> TransitionResult {
    let entry = state
        .initiative_order
        .get(index)
        .ok_or(TransitionError::IndexOutOfBounds {
            index,
            len: state.initiative_order.len(),
        })?;
    let creature_id = entry.creature_id;
    let speed = state.speed_of(creature_id);

    state.reactions_spent.remove(&creature_id);
    state.current_turn = Some(CurrentTurn {
        active_creature_id: creature_id,
        turn_index: index,
        phase: TurnPhase::fresh(creature_id, speed),
        resumes_queued: 0,
    });
    verified(state)
}

/// Hands the turn to the first eligible creature at or after `start`,
/// opening the next round when the current one is exhausted.
///
/// Expects no active turn. If nobody is left in combat, the state is
/// returned with no active turn.
pub(crate) fn advance_from(state: RoundState, start: usize) -> TransitionResult {
    if let Some(index) = next_eligible(&state, start) {
        return start_at(state, index);
    }
    if state.initiative_order.is_empty() && state.delayed.is_empty() {
        return verified(state);
    }

    let next_round = state.round_number + 1;
    let state = begin_round(&state, next_round)?;
    match next_eligible(&state, 0) {
        Some(index) => start_at(state, index),
        None => verified(state),
    }
}

/// Opens round `round_number`, which must directly follow the current round.
///
/// Leaving the surprise round clears the surprised set. Creatures still
/// holding a delayed turn rejoin at the end of the order, ordered among
/// themselves by initiative.
pub fn begin_round(state: &RoundState, round_number: u32) -> TransitionResult {
    require_started(state)?;
    require_idle(state)?;
    if round_number != state.round_number + 1 {
        return Err(TransitionError::RoundOutOfSequence {
            current: state.round_number,
            got: round_number,
        });
    }

    let mut next = state.clone();
    if next.is_surprise_round {
        next.is_surprise_round = false;
        next.surprised.clear();
    }

    let mut returning: Vec<_> = std::mem::take(&mut next.delayed).into_values().collect();
    returning.sort();
    next.initiative_order.extend(returning);

    next.round_number = round_number;
    verified(next)
}

/// Starts the first turn of a freshly initialized encounter.
///
/// Surprised creatures are skipped; a surprise round in which nobody may
/// act rolls straight into round 1.
pub fn begin_first_turn(state: &RoundState) -> TransitionResult {
    require_started(state)?;
    require_idle(state)?;
    if state.initiative_order.is_empty() {
        return Err(TransitionError::EmptyOrder);
    }
    advance_from(state.clone(), 0)
}

/// Makes `creature_id` the active creature with fresh resources.
///
/// Restores the creature's reaction.
pub fn start_turn(state: &RoundState, creature_id: CreatureId) -> TransitionResult {
    require_started(state)?;
    require_idle(state)?;
    if state.is_delayed(creature_id) {
        return Err(TransitionError::CreatureDelayed { creature_id });
    }
    let index = state
        .position_of(creature_id)
        .ok_or(TransitionError::CreatureNotFound { creature_id })?;
    if state.is_surprised(creature_id) {
        return Err(TransitionError::CreatureSurprised { creature_id });
    }
    start_at(state.clone(), index)
}

/// Ends the active creature's turn, leaving no creature active.
pub fn end_turn(state: &RoundState, creature_id: CreatureId) -> TransitionResult {
    let turn = state.current_turn.ok_or(TransitionError::NoActiveTurn)?;
    if turn.active_creature_id != creature_id {
        return Err(TransitionError::NotActive { creature_id });
    }

    let mut next = state.clone();
    next.current_turn = None;
    verified(next)
}

/// Ends the active turn and starts the next eligible one.
///
/// Wrapping past the last entry opens the next round. Equivalent to
/// [`end_turn`], then [`begin_round`] when the round wraps, then
/// [`start_turn`] for the next creature.
pub fn advance_turn(state: &RoundState) -> TransitionResult {
    let turn = state.current_turn.ok_or(TransitionError::NoActiveTurn)?;
    let ended = end_turn(state, turn.active_creature_id)?;
    advance_from(ended, turn.turn_index + 1)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::turn::fixtures::{entry, ids, three};
    use crate::turn::initialize;

    fn active(state: &RoundState) -> Option<u32> {
        state.active_creature().map(|id| id.0)
    }

    #[test]
    fn first_turn_goes_to_top_of_order() {
        let state = three();
        assert_eq!(active(&state), Some(1));
        let turn = state.current_turn.unwrap();
        assert_eq!(turn.turn_index, 0);
        assert_eq!(turn.phase, TurnPhase::fresh(CreatureId(1), 30));
    }

    #[test]
    fn wraparound_starts_next_round() {
        let mut state = three();
        state = advance_turn(&state).unwrap();
        state = advance_turn(&state).unwrap();
        assert_eq!(state.current_turn.unwrap().turn_index, 2);
        assert_eq!(state.round_number, 1);

        let wrapped = advance_turn(&state).unwrap();
        assert_eq!(wrapped.current_turn.unwrap().turn_index, 0);
        assert_eq!(wrapped.round_number, 2);
        assert_eq!(active(&wrapped), Some(1));
    }

    #[test]
    fn advance_equals_end_then_start() {
        let state = three();
        let advanced = advance_turn(&state).unwrap();

        let ended = end_turn(&state, CreatureId(1)).unwrap();
        let started = start_turn(&ended, CreatureId(2)).unwrap();
        assert_eq!(advanced, started);
    }

    #[test]
    fn surprise_round_skips_surprised_creatures() {
        let order = vec![entry(1, 18, 0), entry(2, 14, 0), entry(3, 9, 0)];
        let state = initialize(order, BTreeSet::from([CreatureId(1), CreatureId(3)])).unwrap();

        let state = begin_first_turn(&state).unwrap();
        assert_eq!(state.round_number, 0);
        assert_eq!(active(&state), Some(2));

        // 3 is surprised: round 1 begins and 1 acts first
        let state = advance_turn(&state).unwrap();
        assert_eq!(state.round_number, 1);
        assert!(!state.is_surprise_round);
        assert!(state.surprised.is_empty());
        assert_eq!(active(&state), Some(1));

        let state = advance_turn(&advance_turn(&state).unwrap()).unwrap();
        assert_eq!(active(&state), Some(3));
    }

    #[test]
    fn fully_surprised_opening_rolls_into_round_one() {
        let order = vec![entry(1, 18, 0), entry(2, 14, 0)];
        let state = initialize(order, BTreeSet::from([CreatureId(1), CreatureId(2)])).unwrap();
        let state = begin_first_turn(&state).unwrap();
        assert_eq!(state.round_number, 1);
        assert_eq!(active(&state), Some(1));
    }

    #[test]
    fn surprised_creature_cannot_start_in_surprise_round() {
        let order = vec![entry(1, 18, 0), entry(2, 14, 0)];
        let state = initialize(order, BTreeSet::from([CreatureId(1)])).unwrap();
        assert_eq!(
            start_turn(&state, CreatureId(1)),
            Err(TransitionError::CreatureSurprised {
                creature_id: CreatureId(1)
            })
        );
    }

    #[test]
    fn begin_round_requires_sequence_and_idle() {
        let state = three();
        assert_eq!(
            begin_round(&state, 2),
            Err(TransitionError::TurnInProgress {
                active: CreatureId(1)
            })
        );

        let idle = end_turn(&state, CreatureId(1)).unwrap();
        assert_eq!(
            begin_round(&idle, 3),
            Err(TransitionError::RoundOutOfSequence { current: 1, got: 3 })
        );
        assert_eq!(begin_round(&idle, 2).unwrap().round_number, 2);
    }

    #[test]
    fn end_turn_checks_the_active_creature() {
        let state = three();
        assert_eq!(
            end_turn(&state, CreatureId(2)),
            Err(TransitionError::NotActive {
                creature_id: CreatureId(2)
            })
        );
        let idle = end_turn(&state, CreatureId(1)).unwrap();
        assert_eq!(idle.current_turn, None);
        assert_eq!(end_turn(&idle, CreatureId(1)), Err(TransitionError::NoActiveTurn));
        assert_eq!(advance_turn(&idle), Err(TransitionError::NoActiveTurn));
    }

    #[test]
    fn transitions_leave_the_input_untouched() {
        let state = three();
        let snapshot = state.clone();
        let _ = advance_turn(&state).unwrap();
        assert_eq!(state, snapshot);
        assert_eq!(ids(&state), vec![1, 2, 3]);
    }

    #[test]
    fn uninitialized_state_is_rejected() {
        let empty = RoundState::empty();
        assert_eq!(begin_first_turn(&empty), Err(TransitionError::NotStarted));
        assert_eq!(
            start_turn(&empty, CreatureId(1)),
            Err(TransitionError::NotStarted)
        );
    }
}
