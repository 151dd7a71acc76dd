use crate::error::{CombatError, ErrorSeverity};
use crate::state::CreatureId;

/// Why a turn transition refused to run.
///
/// This is the InvalidState half of every transition result; the caller
/// keeps its previous state and surfaces the message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionError {
    #[error("initiative order is empty")]
    EmptyOrder,

    #[error("creature {creature_id} appears more than once")]
    DuplicateCreature { creature_id: CreatureId },

    #[error("initiative order is not sorted at index {index}")]
    OrderNotSorted { index: usize },

    #[error("surprised creature {creature_id} is not in the initiative order")]
    SurprisedNotInOrder { creature_id: CreatureId },

    #[error("encounter has already started")]
    AlreadyStarted,

    #[error("encounter has not started")]
    NotStarted,

    #[error("creature {creature_id} is not in combat")]
    CreatureNotFound { creature_id: CreatureId },

    #[error("creature {creature_id} is not holding a delayed turn")]
    NotDelayed { creature_id: CreatureId },

    #[error("creature {creature_id} is holding a delayed turn")]
    CreatureDelayed { creature_id: CreatureId },

    #[error("creature {creature_id} is surprised and cannot act this round")]
    CreatureSurprised { creature_id: CreatureId },

    #[error("no turn is in progress")]
    NoActiveTurn,

    #[error("creature {active}'s turn is still in progress")]
    TurnInProgress { active: CreatureId },

    #[error("creature {creature_id} is not the active creature")]
    NotActive { creature_id: CreatureId },

    #[error("round {got} cannot follow round {current}")]
    RoundOutOfSequence { current: u32, got: u32 },

    #[error("cannot move {requested} ft with {remaining} ft remaining")]
    InsufficientMovement { requested: u32, remaining: u32 },

    #[error("turn index {index} is out of bounds for {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("state invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

impl CombatError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IndexOutOfBounds { .. } | Self::InvariantViolation { .. } => {
                ErrorSeverity::Internal
            }
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyOrder => "TURN_EMPTY_ORDER",
            Self::DuplicateCreature { .. } => "TURN_DUPLICATE_CREATURE",
            Self::OrderNotSorted { .. } => "TURN_ORDER_NOT_SORTED",
            Self::SurprisedNotInOrder { .. } => "TURN_SURPRISED_NOT_IN_ORDER",
            Self::AlreadyStarted => "TURN_ALREADY_STARTED",
            Self::NotStarted => "TURN_NOT_STARTED",
            Self::CreatureNotFound { .. } => "TURN_CREATURE_NOT_FOUND",
            Self::NotDelayed { .. } => "TURN_NOT_DELAYED",
            Self::CreatureDelayed { .. } => "TURN_CREATURE_DELAYED",
            Self::CreatureSurprised { .. } => "TURN_CREATURE_SURPRISED",
            Self::NoActiveTurn => "TURN_NO_ACTIVE_TURN",
            Self::TurnInProgress { .. } => "TURN_IN_PROGRESS",
            Self::NotActive { .. } => "TURN_NOT_ACTIVE",
            Self::RoundOutOfSequence { .. } => "TURN_ROUND_OUT_OF_SEQUENCE",
            Self::InsufficientMovement { .. } => "TURN_INSUFFICIENT_MOVEMENT",
            Self::IndexOutOfBounds { .. } => "TURN_INDEX_OUT_OF_BOUNDS",
            Self::InvariantViolation { .. } => "TURN_INVARIANT_VIOLATION",
        }
    }
}
