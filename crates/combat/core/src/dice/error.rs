use crate::error::{CombatError, ErrorSeverity};

/// Errors raised when a dice expression or roll record is malformed.
///
/// These are boundary errors: a bad expression is rejected, never clamped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("unsupported die size d{sides} (expected one of d4, d6, d8, d10, d12, d20, d100)")]
    UnsupportedSides { sides: u32 },

    #[error("dice count must be at least 1 (got {count})")]
    NonPositiveCount { count: i64 },

    #[error("dice count {count} exceeds the limit of {max}")]
    TooManyDice { count: u32, max: u32 },

    #[error("modifier {modifier} is outside [-{max}, {max}]")]
    ModifierOutOfRange { modifier: i64, max: i32 },

    #[error("malformed dice notation '{notation}': {reason}")]
    MalformedNotation {
        notation: String,
        reason: &'static str,
    },

    #[error("total {total} is outside [{min}, {max}] for {count}d{sides}{modifier:+}")]
    TotalOutOfRange {
        count: u32,
        sides: u32,
        modifier: i32,
        total: i32,
        min: i32,
        max: i32,
    },

    #[error("natural roll {value} is not a face of a d20")]
    InvalidNatural { value: u32 },

    #[error("{mode} roll requires {expected} d20 value(s), got {actual}")]
    WrongDiceForMode {
        mode: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl CombatError for DiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedSides { .. } => "DICE_UNSUPPORTED_SIDES",
            Self::NonPositiveCount { .. } => "DICE_NON_POSITIVE_COUNT",
            Self::TooManyDice { .. } => "DICE_TOO_MANY",
            Self::ModifierOutOfRange { .. } => "DICE_MODIFIER_OUT_OF_RANGE",
            Self::MalformedNotation { .. } => "DICE_MALFORMED_NOTATION",
            Self::TotalOutOfRange { .. } => "DICE_TOTAL_OUT_OF_RANGE",
            Self::InvalidNatural { .. } => "DICE_INVALID_NATURAL",
            Self::WrongDiceForMode { .. } => "DICE_WRONG_COUNT_FOR_MODE",
        }
    }
}
