use crate::dice::{D20Roll, DiceEngine, RollMode, RollModeSources};
use crate::rules::{Ability, Condition, ConditionSet};

use super::outcome::RollOutcome;

/// Conditions that fail Strength and Dexterity saves outright.
const PHYSICAL_AUTO_FAIL: [Condition; 3] = [
    Condition::Paralyzed,
    Condition::Stunned,
    Condition::Unconscious,
];

/// Inputs to a saving throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavingThrowContext {
    pub ability: Ability,
    pub ability_modifier: i32,
    pub proficient: bool,
    pub proficiency_bonus: i32,
    pub dc: i32,
    pub mode: RollMode,
    pub conditions: ConditionSet,
}

impl SavingThrowContext {
    pub fn new(ability: Ability, ability_modifier: i32, dc: i32) -> Self {
        Self {
            ability,
            ability_modifier,
            proficient: false,
            proficiency_bonus: 0,
            dc,
            mode: RollMode::Normal,
            conditions: ConditionSet::empty(),
        }
    }

    pub fn with_proficiency(mut self, proficiency_bonus: i32) -> Self {
        self.proficient = true;
        self.proficiency_bonus = proficiency_bonus;
        self
    }

    pub fn with_mode(mut self, mode: RollMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_conditions(mut self, conditions: ConditionSet) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn roll_mode(&self) -> RollMode {
        let mut sources = RollModeSources::requested(self.mode);
        if self.ability == Ability::Dexterity && self.conditions.has(Condition::Restrained) {
            sources.add_disadvantage();
        }
        sources.resolve()
    }

    /// Conditions that make this save fail unless the die shows a natural 20.
    fn auto_fail_conditions(&self) -> ConditionSet {
        if !self.ability.is_physical() {
            return ConditionSet::empty();
        }
        PHYSICAL_AUTO_FAIL
            .into_iter()
            .filter(|c| self.conditions.has(*c))
            .collect()
    }

    fn applied_conditions(&self) -> ConditionSet {
        let mut applied = self.auto_fail_conditions();
        if self.ability == Ability::Dexterity && self.conditions.has(Condition::Restrained) {
            applied = applied.with(Condition::Restrained);
        }
        applied
    }
}

pub fn resolve_saving_throw(context: &SavingThrowContext, engine: &mut DiceEngine) -> RollOutcome {
    let roll = engine.roll_d20(context.ability_modifier, context.roll_mode());
    evaluate_saving_throw(context, &roll)
}

/// Scores an already-rolled saving throw.
///
/// A natural 20 succeeds even through an auto-fail condition. A natural 1
/// has no special meaning on a save.
pub fn evaluate_saving_throw(context: &SavingThrowContext, roll: &D20Roll) -> RollOutcome {
    let contribution = if context.proficient {
        context.proficiency_bonus
    } else {
        0
    };
    let mut outcome = RollOutcome::from_roll(roll, context.ability_modifier, contribution, context.dc);
    outcome.applied_conditions = context.applied_conditions();

    if roll.is_natural_max() {
        outcome.is_auto_success = true;
        outcome.succeeded = true;
    } else if !context.auto_fail_conditions().is_empty() {
        outcome.is_auto_fail = true;
        outcome.succeeded = false;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(face: u32) -> D20Roll {
        D20Roll::from_faces(&[face], 0, RollMode::Normal).unwrap()
    }

    #[test]
    fn proficiency_adds_to_total() {
        let context = SavingThrowContext::new(Ability::Wisdom, 2, 15).with_proficiency(3);
        let outcome = evaluate_saving_throw(&context, &normal(10));
        assert_eq!(outcome.total, 15);
        assert_eq!(outcome.proficiency_contribution, 3);
        assert!(outcome.succeeded);
    }

    #[test]
    fn stunned_fails_strength_saves_whatever_the_total() {
        let context = SavingThrowContext::new(Ability::Strength, 10, 5)
            .with_conditions(Condition::Stunned.into());
        for face in 1..20 {
            let outcome = evaluate_saving_throw(&context, &normal(face));
            assert!(!outcome.succeeded, "face {face}");
            assert!(outcome.is_auto_fail);
            assert!(outcome.applied_conditions.has(Condition::Stunned));
        }

        for seed in 0..200u64 {
            let mut engine = DiceEngine::new(seed);
            let outcome = resolve_saving_throw(&context, &mut engine);
            if outcome.primary_roll != 20 {
                assert!(!outcome.succeeded);
            }
        }
    }

    #[test]
    fn natural_twenty_overrides_auto_fail() {
        let context = SavingThrowContext::new(Ability::Dexterity, 0, 30)
            .with_conditions(ConditionSet::PARALYZED | ConditionSet::UNCONSCIOUS);
        let outcome = evaluate_saving_throw(&context, &normal(20));
        assert!(outcome.succeeded);
        assert!(outcome.is_auto_success);
        assert!(!outcome.is_auto_fail);
    }

    #[test]
    fn incapacitating_conditions_spare_mental_saves() {
        let context = SavingThrowContext::new(Ability::Wisdom, 0, 10)
            .with_conditions(Condition::Stunned.into());
        let outcome = evaluate_saving_throw(&context, &normal(12));
        assert!(outcome.succeeded);
        assert!(outcome.applied_conditions.is_empty());
    }

    #[test]
    fn natural_one_is_not_an_auto_fail() {
        let context = SavingThrowContext::new(Ability::Constitution, 12, 10);
        let outcome = evaluate_saving_throw(&context, &normal(1));
        assert!(outcome.succeeded);
        assert!(!outcome.is_auto_fail);
    }

    #[test]
    fn restrained_imposes_disadvantage_on_dexterity_only() {
        let dex = SavingThrowContext::new(Ability::Dexterity, 0, 10)
            .with_conditions(Condition::Restrained.into());
        assert_eq!(dex.roll_mode(), RollMode::Disadvantage);

        let strength = SavingThrowContext::new(Ability::Strength, 0, 10)
            .with_conditions(Condition::Restrained.into());
        assert_eq!(strength.roll_mode(), RollMode::Normal);

        let cancelled = dex.with_mode(RollMode::Advantage);
        assert_eq!(cancelled.roll_mode(), RollMode::Normal);
    }
}
