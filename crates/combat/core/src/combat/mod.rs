//! Combat resolution.
//!
//! Four stateless resolvers turn a rules context and the session's
//! [`DiceEngine`](crate::dice::DiceEngine) into a structured outcome. Each
//! `resolve_*` function draws from the engine and hands the roll to a pure
//! `evaluate_*` counterpart, so scoring can be exercised with fixed rolls.
//!
//! - `resolve_attack`: d20 + attack bonus against AC
//! - `resolve_damage`: dice + modifier, then resistance/vulnerability/immunity
//! - `resolve_saving_throw`: d20 + ability modifier + proficiency against DC
//! - `resolve_ability_check`: d20 + ability modifier + tiered proficiency against DC
mod ability_check;
mod attack;
mod damage;
mod outcome;
mod saving_throw;

pub use ability_check::{AbilityCheckContext, evaluate_ability_check, resolve_ability_check};
pub use attack::{AttackContext, evaluate_attack, resolve_attack};
pub use damage::{DamageRequest, apply_damage_traits, evaluate_damage, resolve_damage};
pub use outcome::{AppliedDamageModifier, AttackOutcome, DamageOutcome, Outcome, RollOutcome};
pub use saving_throw::{SavingThrowContext, evaluate_saving_throw, resolve_saving_throw};
