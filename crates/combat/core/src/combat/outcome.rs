//! Resolver outcome types.

use arrayvec::ArrayVec;

use crate::dice::{D20Roll, RollMode};
use crate::rules::{ConditionSet, DamageModifierKind, DamageType};

/// Result of a d20 test (attack, saving throw or ability check).
///
/// Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollOutcome {
    /// The kept d20 face.
    pub primary_roll: u32,
    /// Every d20 face rolled, including the discarded one.
    pub rolls: ArrayVec<u32, 2>,
    /// Flat bonus: attack bonus or ability modifier.
    pub bonus: i32,
    pub proficiency_contribution: i32,
    pub total: i32,
    /// AC for attacks, DC for saves and checks.
    pub target: i32,
    pub roll_mode: RollMode,
    pub is_auto_success: bool,
    pub is_auto_fail: bool,
    pub succeeded: bool,
    /// Conditions that changed the roll mode or forced a result.
    pub applied_conditions: ConditionSet,
}

impl RollOutcome {
    pub(crate) fn from_roll(
        roll: &D20Roll,
        bonus: i32,
        proficiency_contribution: i32,
        target: i32,
    ) -> Self {
        let total = (roll.natural() as i32)
            .saturating_add(bonus)
            .saturating_add(proficiency_contribution);
        Self {
            primary_roll: roll.natural(),
            rolls: roll.rolls().iter().copied().collect(),
            bonus,
            proficiency_contribution,
            total,
            target,
            roll_mode: roll.mode(),
            is_auto_success: false,
            is_auto_fail: false,
            succeeded: total >= target,
            applied_conditions: ConditionSet::empty(),
        }
    }

    /// How far the total landed from the target (negative on a shortfall).
    pub fn margin(&self) -> i32 {
        self.total - self.target
    }
}

/// Result of an attack roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub roll: RollOutcome,
    /// Natural 20.
    pub critical: bool,
}

impl AttackOutcome {
    pub fn hit(&self) -> bool {
        self.roll.succeeded
    }

    /// Natural 1: a miss whatever the total.
    pub fn is_auto_miss(&self) -> bool {
        self.roll.is_auto_fail
    }
}

/// One target trait that changed a damage roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedDamageModifier {
    pub kind: DamageModifierKind,
    pub damage_type: DamageType,
}

/// Result of a damage roll.
///
/// `base_damage = dice_total + modifier`; a critical doubles the dice rolled,
/// never the modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    /// Faces in roll order.
    pub rolled_dice: Vec<u32>,
    pub dice_total: i32,
    pub modifier: i32,
    pub base_damage: i32,
    pub final_damage: i32,
    pub damage_type: DamageType,
    pub is_critical: bool,
    pub applied_modifiers: Vec<AppliedDamageModifier>,
}

/// Any resolver outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Outcome {
    Attack(AttackOutcome),
    Damage(DamageOutcome),
    SavingThrow(RollOutcome),
    AbilityCheck(RollOutcome),
}

impl Outcome {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Outcome::Attack(_) => "attack",
            Outcome::Damage(_) => "damage",
            Outcome::SavingThrow(_) => "saving_throw",
            Outcome::AbilityCheck(_) => "ability_check",
        }
    }

    /// The d20 test behind this outcome, if any.
    pub fn roll(&self) -> Option<&RollOutcome> {
        match self {
            Outcome::Attack(attack) => Some(&attack.roll),
            Outcome::SavingThrow(roll) | Outcome::AbilityCheck(roll) => Some(roll),
            Outcome::Damage(_) => None,
        }
    }
}

impl From<AttackOutcome> for Outcome {
    fn from(outcome: AttackOutcome) -> Self {
        Outcome::Attack(outcome)
    }
}

impl From<DamageOutcome> for Outcome {
    fn from(outcome: DamageOutcome) -> Self {
        Outcome::Damage(outcome)
    }
}
