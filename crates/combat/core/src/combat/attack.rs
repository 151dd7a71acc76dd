//! Attack rolls.

use crate::dice::{D20Roll, DiceEngine, RollMode, RollModeSources};
use crate::rules::{Condition, ConditionSet};

use super::outcome::{AttackOutcome, RollOutcome};

/// Attacker conditions that impose disadvantage on the attack.
const ATTACKER_DISADVANTAGE: [Condition; 4] = [
    Condition::Blinded,
    Condition::Poisoned,
    Condition::Prone,
    Condition::Restrained,
];

/// Target conditions that grant advantage to attackers.
const TARGET_GRANTS_ADVANTAGE: [Condition; 6] = [
    Condition::Blinded,
    Condition::Paralyzed,
    Condition::Petrified,
    Condition::Restrained,
    Condition::Stunned,
    Condition::Unconscious,
];

/// Inputs to an attack roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackContext {
    pub attack_bonus: i32,
    pub armor_class: i32,
    /// Mode requested by the caller (e.g. from a feature or spell).
    pub mode: RollMode,
    pub attacker_conditions: ConditionSet,
    pub target_conditions: ConditionSet,
}

impl AttackContext {
    pub fn new(attack_bonus: i32, armor_class: i32) -> Self {
        Self {
            attack_bonus,
            armor_class,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: RollMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_attacker_conditions(mut self, conditions: ConditionSet) -> Self {
        self.attacker_conditions = conditions;
        self
    }

    pub fn with_target_conditions(mut self, conditions: ConditionSet) -> Self {
        self.target_conditions = conditions;
        self
    }

    /// Net roll mode after conditions, plus the conditions that contributed.
    pub fn roll_mode(&self) -> (RollMode, ConditionSet) {
        let mut sources = RollModeSources::requested(self.mode);
        let mut applied = ConditionSet::empty();

        for condition in ATTACKER_DISADVANTAGE {
            if self.attacker_conditions.has(condition) {
                sources.add_disadvantage();
                applied = applied.with(condition);
            }
        }
        if self.attacker_conditions.has(Condition::Invisible) {
            sources.add_advantage();
            applied = applied.with(Condition::Invisible);
        }

        for condition in TARGET_GRANTS_ADVANTAGE {
            if self.target_conditions.has(condition) {
                sources.add_advantage();
                applied = applied.with(condition);
            }
        }
        if self.target_conditions.has(Condition::Invisible) {
            sources.add_disadvantage();
            applied = applied.with(Condition::Invisible);
        }

        (sources.resolve(), applied)
    }
}

/// Rolls an attack against the target's AC.
pub fn resolve_attack(context: &AttackContext, engine: &mut DiceEngine) -> AttackOutcome {
    let (mode, _) = context.roll_mode();
    let roll = engine.roll_d20(context.attack_bonus, mode);
    evaluate_attack(context, &roll)
}

/// Scores an already-rolled attack.
///
/// A natural 20 hits and is critical regardless of AC; a natural 1 misses
/// regardless of total.
pub fn evaluate_attack(context: &AttackContext, roll: &D20Roll) -> AttackOutcome {
    let (_, applied) = context.roll_mode();
    let mut outcome = RollOutcome::from_roll(roll, context.attack_bonus, 0, context.armor_class);
    outcome.applied_conditions = applied;

    let critical = roll.is_natural_max();
    if critical {
        outcome.is_auto_success = true;
        outcome.succeeded = true;
    } else if roll.is_natural_min() {
        outcome.is_auto_fail = true;
        outcome.succeeded = false;
    }

    AttackOutcome {
        roll: outcome,
        critical,
    }
}
