//! Error types raised by repository implementations.

use combat_core::SessionId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("event repository lock was poisoned")]
    LockPoisoned,

    #[error("event from session '{actual}' cannot be appended to session '{expected}'")]
    SessionMismatch {
        expected: SessionId,
        actual: SessionId,
    },

    #[error("cannot truncate a log of {len} events to {requested}")]
    TruncateBeyondEnd { len: usize, requested: usize },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
