use super::turns::advance_from;
use super::{TransitionError, TransitionResult, verified};
use crate::state::{CreatureId, InitiativeEntry, RoundState};

fn require_started(state: &RoundState) -> Result<(), TransitionError> {
    if state.is_started() {
        Ok(())
    } else {
        Err(TransitionError::NotStarted)
    }
}

fn forget(state: &mut RoundState, creature_id: CreatureId) {
    state.surprised.remove(&creature_id);
    state.speeds.remove(&creature_id);
    state.reactions_spent.remove(&creature_id);
}

/// Adds a creature mid-encounter at its sorted position.
///
/// Inserting at or before the active slot shifts the turn index so the
/// active creature keeps its turn. A sorted position inside the block of
/// creatures resumed this turn is pushed past that block.
pub fn add_creature(state: &RoundState, entry: InitiativeEntry, speed: u32) -> TransitionResult {
    require_started(state)?;
    let creature_id = entry.creature_id;
    if state.contains(creature_id) {
        return Err(TransitionError::DuplicateCreature { creature_id });
    }

    let mut next = state.clone();
    let mut position = next
        .initiative_order
        .iter()
        .position(|existing| entry < *existing)
        .unwrap_or(next.initiative_order.len());
    if let Some(turn) = next.current_turn {
        let queue_end = turn.turn_index + turn.resumes_queued;
        if position > turn.turn_index && position <= queue_end {
            position = queue_end + 1;
        }
    }
    next.initiative_order.insert(position, entry);
    next.speeds.insert(creature_id, speed);

    if let Some(turn) = next.current_turn.as_mut() {
        if position <= turn.turn_index {
            turn.turn_index += 1;
        }
    }
    verified(next)
}

/// Removes a creature from the order or from the delayed set.
///
/// Removing the active creature passes the turn on as [`advance_turn`]
/// would.
///
/// [`advance_turn`]: super::advance_turn
pub fn remove_creature(state: &RoundState, creature_id: CreatureId) -> TransitionResult {
    require_started(state)?;
    let mut next = state.clone();

    if next.delayed.remove(&creature_id).is_some() {
        forget(&mut next, creature_id);
        return verified(next);
    }

    let position = next
        .position_of(creature_id)
        .ok_or(TransitionError::CreatureNotFound { creature_id })?;
    next.initiative_order.remove(position);
    forget(&mut next, creature_id);

    let Some(turn) = next.current_turn.as_mut() else {
        return verified(next);
    };
    if position < turn.turn_index {
        turn.turn_index -= 1;
        return verified(next);
    }
    if position > turn.turn_index {
        if position <= turn.turn_index + turn.resumes_queued {
            turn.resumes_queued -= 1;
        }
        return verified(next);
    }

    next.current_turn = None;
    advance_from(next, position)
}

/// Moves the active creature out of the order to act later, then passes
/// the turn on.
pub fn delay_turn(state: &RoundState, creature_id: CreatureId) -> TransitionResult {
    let turn = state.current_turn.ok_or(TransitionError::NoActiveTurn)?;
    if turn.active_creature_id != creature_id {
        return Err(TransitionError::NotActive { creature_id });
    }

    let mut next = state.clone();
    let entry = next.initiative_order.remove(turn.turn_index);
    next.delayed.insert(creature_id, entry);
    next.current_turn = None;
    advance_from(next, turn.turn_index)
}

/// Brings a delayed creature back at `new_total`, acting right after the
/// active creature.
///
/// When several creatures resume during the same turn they act in the
/// order they resumed.
pub fn resume_delayed_turn(
    state: &RoundState,
    creature_id: CreatureId,
    new_total: i32,
) -> TransitionResult {
    let turn = state.current_turn.ok_or(TransitionError::NoActiveTurn)?;
    let mut next = state.clone();
    let entry = next
        .delayed
        .remove(&creature_id)
        .ok_or(TransitionError::NotDelayed { creature_id })?;

    let position = (turn.turn_index + 1 + turn.resumes_queued).min(next.initiative_order.len());
    next.initiative_order
        .insert(position, entry.with_total(new_total));
    if let Some(turn) = next.current_turn.as_mut() {
        turn.resumes_queued += 1;
    }
    verified(next)
}
