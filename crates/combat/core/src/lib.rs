//! Deterministic combat core.
//!
//! `combat-core` decides what a die roll yields, whether an attack lands, how
//! damage is shaped by target traits, and whose turn it is. Given the same
//! seed and the same event log it produces the same result on every run.
//!
//! Layers, bottom-up:
//! - [`dice`]: the seeded [`DiceEngine`], the only stateful primitive
//! - [`combat`]: attack, damage, saving throw and ability check resolvers
//! - [`turn`]: pure transitions over [`RoundState`]
//! - [`events`]: [`build_state`] folds an event log into a [`RoundState`]
//!
//! Nothing here performs I/O, reads a clock or logs.
pub mod combat;
pub mod config;
pub mod dice;
pub mod error;
pub mod events;
pub mod rules;
pub mod state;
pub mod turn;

pub use combat::{
    AbilityCheckContext, AppliedDamageModifier, AttackContext, AttackOutcome, DamageOutcome,
    DamageRequest, Outcome, RollOutcome, SavingThrowContext, resolve_ability_check,
    resolve_attack, resolve_damage, resolve_saving_throw,
};
pub use config::CombatConfig;
pub use dice::{D20Roll, DiceEngine, DiceError, DiceExpression, Die, DieRoll, RollMode};
pub use error::{CombatError, ErrorSeverity};
pub use events::{CombatEvent, CombatEventKind, ReplayError, apply_event, build_state};
pub use rules::{
    Ability, Condition, ConditionSet, DamageModifierKind, DamageTraits, DamageType,
    DamageTypeSet, ProficiencyTier,
};
pub use state::{
    Combatant, CreatureId, CurrentTurn, InitiativeEntry, RoundState, SessionId, Timestamp,
    TurnPhase,
};
pub use turn::{TransitionError, TransitionResult};
