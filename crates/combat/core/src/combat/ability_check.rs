use crate::dice::{D20Roll, DiceEngine, RollMode, RollModeSources};
use crate::rules::{Ability, Condition, ConditionSet, ProficiencyTier};

use super::outcome::RollOutcome;

/// Inputs to an ability check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCheckContext {
    pub ability: Ability,
    pub ability_modifier: i32,
    pub proficiency: ProficiencyTier,
    pub proficiency_bonus: i32,
    pub dc: i32,
    pub mode: RollMode,
    pub conditions: ConditionSet,
}

impl AbilityCheckContext {
    pub fn new(ability: Ability, ability_modifier: i32, dc: i32) -> Self {
        Self {
            ability,
            ability_modifier,
            proficiency: ProficiencyTier::None,
            proficiency_bonus: 0,
            dc,
            mode: RollMode::Normal,
            conditions: ConditionSet::empty(),
        }
    }

    pub fn with_proficiency(mut self, tier: ProficiencyTier, proficiency_bonus: i32) -> Self {
        self.proficiency = tier;
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
        if self.conditions.has(Condition::Poisoned) {
            sources.add_disadvantage();
        }
        sources.resolve()
    }
}

pub fn resolve_ability_check(context: &AbilityCheckContext, engine: &mut DiceEngine) -> RollOutcome {
    let roll = engine.roll_d20(context.ability_modifier, context.roll_mode());
    evaluate_ability_check(context, &roll)
}

/// Scores an already-rolled ability check. Natural results carry no
/// special meaning on checks.
pub fn evaluate_ability_check(context: &AbilityCheckContext, roll: &D20Roll) -> RollOutcome {
    let contribution = context.proficiency.contribution(context.proficiency_bonus);
    let mut outcome = RollOutcome::from_roll(roll, context.ability_modifier, contribution, context.dc);
    if context.conditions.has(Condition::Poisoned) {
        outcome.applied_conditions = ConditionSet::POISONED;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expertise_doubles_the_bonus() {
        let roll = D20Roll::from_faces(&[8], 0, RollMode::Normal).unwrap();
        let base = AbilityCheckContext::new(Ability::Dexterity, 3, 15);

        let none = evaluate_ability_check(&base, &roll);
        assert_eq!((none.proficiency_contribution, none.total), (0, 11));
        assert!(!none.succeeded);

        let proficient =
            evaluate_ability_check(&base.with_proficiency(ProficiencyTier::Proficient, 2), &roll);
        assert_eq!((proficient.proficiency_contribution, proficient.total), (2, 13));

        let expert =
            evaluate_ability_check(&base.with_proficiency(ProficiencyTier::Expertise, 2), &roll);
        assert_eq!((expert.proficiency_contribution, expert.total), (4, 15));
        assert!(expert.succeeded);
    }

    #[test]
    fn poisoned_imposes_disadvantage() {
        let context = AbilityCheckContext::new(Ability::Intelligence, 0, 10)
            .with_conditions(Condition::Poisoned.into());
        assert_eq!(context.roll_mode(), RollMode::Disadvantage);

        for seed in 0..50u64 {
            let mut engine = DiceEngine::new(seed);
            let outcome = resolve_ability_check(&context, &mut engine);
            assert_eq!(outcome.roll_mode, RollMode::Disadvantage);
            assert_eq!(outcome.primary_roll, *outcome.rolls.iter().min().unwrap());
            assert_eq!(outcome.applied_conditions, ConditionSet::POISONED);
        }
    }

    #[test]
    fn natural_twenty_can_still_fail_a_check() {
        let roll = D20Roll::from_faces(&[20], 0, RollMode::Normal).unwrap();
        let context = AbilityCheckContext::new(Ability::Strength, 0, 25);
        let outcome = evaluate_ability_check(&context, &roll);
        assert!(!outcome.succeeded);
        assert!(!outcome.is_auto_success);
    }
}
