use super::{CombatEvent, CombatEventKind};
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{CreatureId, RoundState};
use crate::turn::{self, TransitionError, TransitionResult};

/// A log that cannot be folded: the event at `index` violated a transition
/// precondition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("event {index} ({event}) cannot be applied: {source}")]
pub struct ReplayError {
    pub index: usize,
    pub event: &'static str,
    #[source]
    pub source: TransitionError,
}

impl CombatError for ReplayError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "REPLAY_FAILED"
    }
}

fn mismatch(reason: String) -> TransitionError {
    TransitionError::InvariantViolation { reason }
}

/// Applies one event to `state`: the single step of [`build_state`].
pub fn apply_event(state: &RoundState, event: &CombatEvent) -> TransitionResult {
    match &event.kind {
        CombatEventKind::EncounterStarted {
            participants,
            initiative_order,
            surprised,
            default_speed,
        } => {
            if state.is_started() {
                return Err(TransitionError::AlreadyStarted);
            }
            let mut next = turn::initialize(initiative_order.clone(), surprised.clone())?;
            next.default_speed = *default_speed;
            for participant in participants {
                if !next.contains(participant.creature_id) {
                    return Err(TransitionError::CreatureNotFound {
                        creature_id: participant.creature_id,
                    });
                }
                next.speeds.insert(participant.creature_id, participant.speed);
            }
            Ok(next)
        }
        CombatEventKind::RoundStarted { round_number } => turn::begin_round(state, *round_number),
        CombatEventKind::TurnStarted { creature_id } => turn::start_turn(state, *creature_id),
        CombatEventKind::TurnEnded { creature_id } => turn::end_turn(state, *creature_id),
        CombatEventKind::ReactionUsed { creature_id, .. } => {
            turn::consume_reaction(state, *creature_id)
        }
        CombatEventKind::TurnDelayed {
            creature_id,
            original_initiative,
        } => {
            if let Some(entry) = state.entry(*creature_id) {
                if entry != original_initiative {
                    return Err(mismatch(format!(
                        "delayed initiative for {creature_id} does not match the order"
                    )));
                }
            }
            turn::delay_turn(state, *creature_id)
        }
        CombatEventKind::DelayedTurnResumed {
            creature_id,
            new_initiative,
        } => turn::resume_delayed_turn(state, *creature_id, *new_initiative),
        CombatEventKind::CreatureAddedToCombat {
            creature_id,
            entry,
            speed,
        } => {
            check_subject(*creature_id, entry.creature_id)?;
            turn::add_creature(state, *entry, *speed)
        }
        CombatEventKind::CreatureRemovedFromCombat { creature_id, .. } => {
            turn::remove_creature(state, *creature_id)
        }
        CombatEventKind::MovementSpent { creature_id, feet } => {
            turn::consume_movement(state, *creature_id, *feet)
        }
        CombatEventKind::ActionSpent { creature_id } => turn::consume_action(state, *creature_id),
        CombatEventKind::BonusActionSpent { creature_id } => {
            turn::consume_bonus_action(state, *creature_id)
        }
        CombatEventKind::Unrecognized => Ok(state.clone()),
    }
}

fn check_subject(creature_id: CreatureId, entry_id: CreatureId) -> Result<(), TransitionError> {
    if creature_id == entry_id {
        Ok(())
    } else {
        Err(mismatch(format!(
            "event names {creature_id} but its entry belongs to {entry_id}"
        )))
    }
}

/// Folds `events` onto an existing state, in log order.
pub fn replay_onto(state: &RoundState, events: &[CombatEvent]) -> Result<RoundState, ReplayError> {
    events
        .iter()
        .enumerate()
        .try_fold(state.clone(), |state, (index, event)| {
            apply_event(&state, event).map_err(|source| ReplayError {
                index,
                event: event.name(),
                source,
            })
        })
}

/// Rebuilds combat state from a complete log.
///
/// A pure left fold from [`RoundState::empty`]: the same log always yields
/// the same state.
pub fn build_state(events: &[CombatEvent]) -> Result<RoundState, ReplayError> {
    replay_onto(&RoundState::empty(), events)
}
