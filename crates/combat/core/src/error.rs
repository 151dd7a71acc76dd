//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`DiceError`, `TransitionError`, `ReplayError`) live
//! next to the code that raises them. This module holds the shared
//! classification used by orchestrators to decide how to surface a failure.
//!
//! Nothing in the core is retried: every operation is pure, so a failure is
//! either caller misuse or a logic defect.

/// Severity level of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input or a precondition the caller violated.
    ///
    /// Examples: unsupported die size, removing a creature that is not in
    /// combat, ending the turn of a creature that is not active.
    Validation,

    /// Internal inconsistency: the state or the event log contradicts itself.
    ///
    /// Examples: replayed state diverges from incremental state, a round
    /// number going backwards in a log.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates a defect rather than misuse.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
///
/// - All error enums implement this trait
/// - `#[derive(thiserror::Error)]` provides Display/Error
/// - Severity is classified by who has to fix it, not by impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
