//! Unified error type surfaced by the combat session.
//!
//! Wraps core transition and dice failures, replay failures, repository and
//! configuration errors so callers can bubble them up with one type.
use std::fmt;

use combat_core::{
    CombatError, CreatureId, DiceError, ErrorSeverity, ReplayError, TransitionError,
};
use thiserror::Error;

use crate::config::ConfigError;
use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("state fingerprint failed")]
    Fingerprint(#[from] bincode::Error),

    #[error("creature {creature_id} has already spent its {resource}")]
    ResourceSpent {
        creature_id: CreatureId,
        resource: Resource,
    },

    #[error("replaying {events} emitted event(s) gave state {actual}, expected {expected}")]
    ReplayDivergence {
        events: usize,
        expected: String,
        actual: String,
    },

    #[error("event log already holds {len} event(s); resume from a checkpoint instead")]
    LogNotEmpty { len: usize },

    #[error("checkpoint does not match the session: {reason}")]
    CheckpointMismatch { reason: String },

    #[error("cannot undo {requested} event(s) from a log of {len}")]
    UndoBeyondStart { requested: usize, len: usize },
}

impl CombatError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Transition(error) => error.severity(),
            Self::Dice(error) => error.severity(),
            Self::Replay(error) => error.severity(),
            Self::Repository(_) | Self::Fingerprint(_) | Self::ReplayDivergence { .. } => {
                ErrorSeverity::Internal
            }
            Self::Config(_)
            | Self::ResourceSpent { .. }
            | Self::LogNotEmpty { .. }
            | Self::CheckpointMismatch { .. }
            | Self::UndoBeyondStart { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Transition(error) => error.error_code(),
            Self::Dice(error) => error.error_code(),
            Self::Replay(error) => error.error_code(),
            Self::Repository(_) => "SESSION_REPOSITORY",
            Self::Config(_) => "SESSION_CONFIG",
            Self::Fingerprint(_) => "SESSION_FINGERPRINT",
            Self::ResourceSpent { .. } => "SESSION_RESOURCE_SPENT",
            Self::ReplayDivergence { .. } => "SESSION_REPLAY_DIVERGENCE",
            Self::LogNotEmpty { .. } => "SESSION_LOG_NOT_EMPTY",
            Self::CheckpointMismatch { .. } => "SESSION_CHECKPOINT_MISMATCH",
            Self::UndoBeyondStart { .. } => "SESSION_UNDO_BEYOND_START",
        }
    }
}

/// A per-turn resource the session guards against double spending.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resource {
    Movement,
    Action,
    BonusAction,
    Reaction,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Resource::Movement => "movement",
            Resource::Action => "action",
            Resource::BonusAction => "bonus action",
            Resource::Reaction => "reaction",
        };
        write!(f, "{}", label)
    }
}
