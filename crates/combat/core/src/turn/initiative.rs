use std::collections::BTreeSet;

use super::{TransitionError, TransitionResult, verified};
use crate::dice::{DiceEngine, RollMode};
use crate::state::{Combatant, CreatureId, InitiativeEntry, RoundState};

/// Rolls initiative for every combatant, in the order given, and sorts the
/// result.
///
/// Draws one d20 per combatant from `engine`, so the same seed and the same
/// combatant list always produce the same order.
pub fn roll_initiative_for_all(
    combatants: &[Combatant],
    engine: &mut DiceEngine,
) -> Vec<InitiativeEntry> {
    let mut order: Vec<InitiativeEntry> = combatants
        .iter()
        .map(|combatant| {
            let roll = engine.roll_d20(combatant.initiative_modifier, RollMode::Normal);
            InitiativeEntry::new(combatant.creature_id, roll.natural(), combatant.initiative_modifier)
        })
        .collect();
    order.sort();
    order
}

/// Builds the initial state for an encounter.
///
/// A non-empty `surprised` set opens with a surprise round (round 0);
/// otherwise combat opens in round 1. No turn is active until
/// [`begin_first_turn`](super::begin_first_turn) or a `TurnStarted` event.
pub fn initialize(
    order: Vec<InitiativeEntry>,
    surprised: BTreeSet<CreatureId>,
) -> TransitionResult {
    if order.is_empty() {
        return Err(TransitionError::EmptyOrder);
    }

    let mut seen = BTreeSet::new();
    for entry in &order {
        if !seen.insert(entry.creature_id) {
            return Err(TransitionError::DuplicateCreature {
                creature_id: entry.creature_id,
            });
        }
    }

    if let Some(index) = order.windows(2).position(|pair| pair[0] > pair[1]) {
        return Err(TransitionError::OrderNotSorted { index: index + 1 });
    }

    if let Some(&creature_id) = surprised.iter().find(|id| !seen.contains(id)) {
        return Err(TransitionError::SurprisedNotInOrder { creature_id });
    }

    let is_surprise_round = !surprised.is_empty();
    verified(RoundState {
        round_number: if is_surprise_round { 0 } else { 1 },
        is_surprise_round,
        initiative_order: order,
        surprised,
        ..RoundState::empty()
    })
}
