//! Combat state types.
//!
//! [`RoundState`] is the single value the turn transitions operate on and
//! the event builder folds into.
mod common;
mod initiative;
mod phase;
mod round;

pub use common::{CreatureId, SessionId, Timestamp};
pub use initiative::{Combatant, InitiativeEntry};
pub use phase::TurnPhase;
pub use round::{CurrentTurn, RoundState};
