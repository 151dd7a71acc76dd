//! Damage rolls and target-trait composition.

use crate::dice::{DiceEngine, DiceError, DiceExpression, check_modifier};
use crate::config::CombatConfig;
use crate::rules::{DamageModifierKind, DamageTraits, DamageType};

use super::outcome::{AppliedDamageModifier, DamageOutcome};

/// Inputs to a damage roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRequest {
    pub dice: DiceExpression,
    /// Flat bonus added on top of any modifier in `dice`.
    pub modifier: i32,
    pub damage_type: DamageType,
    pub critical: bool,
    pub traits: DamageTraits,
}

impl DamageRequest {
    pub fn new(dice: DiceExpression, damage_type: DamageType) -> Self {
        Self {
            dice,
            modifier: 0,
            damage_type,
            critical: false,
            traits: DamageTraits::default(),
        }
    }

    /// Builds a request from dice notation such as `"2d6"`.
    pub fn parse(notation: &str, damage_type: DamageType) -> Result<Self, DiceError> {
        Ok(Self::new(DiceExpression::parse(notation)?, damage_type))
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn against(mut self, traits: DamageTraits) -> Self {
        self.traits = traits;
        self
    }

    /// Number of dice actually rolled: doubled on a critical.
    ///
    /// The per-expression dice limit applies to `dice` before doubling.
    pub fn rolled_count(&self) -> u32 {
        if self.critical {
            self.dice.count() * 2
        } else {
            self.dice.count()
        }
    }

    /// Expression modifier plus the flat bonus, bounded by `MAX_MODIFIER`.
    pub fn total_modifier(&self) -> Result<i32, DiceError> {
        check_modifier(i64::from(self.dice.modifier()) + i64::from(self.modifier))
    }
}

/// Rolls damage and applies the target's traits.
///
/// An out-of-range modifier is rejected before anything is drawn.
pub fn resolve_damage(
    request: &DamageRequest,
    engine: &mut DiceEngine,
) -> Result<DamageOutcome, DiceError> {
    request.total_modifier()?;
    let rolled_dice = engine.roll_faces(request.rolled_count(), request.dice.die());
    evaluate_damage(request, rolled_dice)
}

/// Scores already-rolled damage faces.
pub fn evaluate_damage(
    request: &DamageRequest,
    rolled_dice: Vec<u32>,
) -> Result<DamageOutcome, DiceError> {
    let modifier = request.total_modifier()?;
    let dice_total = rolled_dice.iter().map(|&face| i64::from(face)).sum::<i64>();
    let dice_total = i32::try_from(dice_total).map_err(|_| DiceError::TooManyDice {
        count: rolled_dice.len().try_into().unwrap_or(u32::MAX),
        max: CombatConfig::MAX_DICE_PER_EXPRESSION,
    })?;
    let base_damage = dice_total.saturating_add(modifier);
    let (final_damage, applied_modifiers) =
        apply_damage_traits(base_damage, request.damage_type, &request.traits);

    Ok(DamageOutcome {
        rolled_dice,
        dice_total,
        modifier,
        base_damage,
        final_damage,
        damage_type: request.damage_type,
        is_critical: request.critical,
        applied_modifiers,
    })
}

/// Applies immunity, resistance and vulnerability to a base amount.
///
/// # Formula
///
/// ```text
/// immune     => 0            (nothing else applies)
/// resistant  => base div 2   (floor)
/// vulnerable => × 2          (after halving when both apply)
/// final      = max(result, 0)
/// ```
pub fn apply_damage_traits(
    base_damage: i32,
    damage_type: DamageType,
    traits: &DamageTraits,
) -> (i32, Vec<AppliedDamageModifier>) {
    let applied = |kind| AppliedDamageModifier { kind, damage_type };

    if traits.is_immune(damage_type) {
        return (0, vec![applied(DamageModifierKind::Immunity)]);
    }

    let mut damage = base_damage;
    let mut modifiers = Vec::new();
    if traits.is_resistant(damage_type) {
        damage = damage.div_euclid(2);
        modifiers.push(applied(DamageModifierKind::Resistance));
    }
    if traits.is_vulnerable(damage_type) {
        damage = damage.saturating_mul(2);
        modifiers.push(applied(DamageModifierKind::Vulnerability));
    }

    (damage.max(0), modifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Die;

    #[test]
    fn critical_doubles_dice_not_modifier() {
        for seed in 0..100u64 {
            let mut engine = DiceEngine::new(seed);
            let request = DamageRequest::parse("2d6", DamageType::Slashing)
                .unwrap()
                .with_modifier(3)
                .critical(true);
            let outcome = resolve_damage(&request, &mut engine).unwrap();

            assert_eq!(outcome.rolled_dice.len(), 4);
            assert_eq!(outcome.modifier, 3);
            assert_eq!(outcome.base_damage, outcome.dice_total + 3);
            assert!(outcome.is_critical);
            assert!((7..=27).contains(&outcome.final_damage));
        }
    }

    #[test]
    fn resistance_halves_rounding_down() {
        let traits = DamageTraits::new().with_resistance(DamageType::Fire);
        for seed in 0..200u64 {
            let mut engine = DiceEngine::new(seed);
            let request = DamageRequest::parse("3d8+1", DamageType::Fire)
                .unwrap()
                .against(traits);
            let outcome = resolve_damage(&request, &mut engine).unwrap();
            assert_eq!(outcome.final_damage, outcome.base_damage / 2);
        }
    }

    #[test]
    fn vulnerability_doubles() {
        let traits = DamageTraits::new().with_vulnerability(DamageType::Fire);
        for seed in 0..200u64 {
            let mut engine = DiceEngine::new(seed);
            let request = DamageRequest::parse("2d10", DamageType::Fire)
                .unwrap()
                .against(traits);
            let outcome = resolve_damage(&request, &mut engine).unwrap();
            assert_eq!(outcome.final_damage, outcome.base_damage * 2);
        }
    }

    #[test]
    fn immunity_overrides_everything() {
        let traits = DamageTraits::new()
            .with_immunity(DamageType::Poison)
            .with_resistance(DamageType::Poison)
            .with_vulnerability(DamageType::Poison);
        for seed in 0..100u64 {
            let mut engine = DiceEngine::new(seed);
            let request = DamageRequest::parse("4d12+10", DamageType::Poison)
                .unwrap()
                .against(traits)
                .critical(seed % 2 == 0);
            let outcome = resolve_damage(&request, &mut engine).unwrap();
            assert_eq!(outcome.final_damage, 0);
            assert_eq!(
                outcome.applied_modifiers,
                vec![AppliedDamageModifier {
                    kind: DamageModifierKind::Immunity,
                    damage_type: DamageType::Poison,
                }]
            );
        }
    }

    #[test]
    fn resistance_and_vulnerability_compose_halve_then_double() {
        let traits = DamageTraits::new()
            .with_resistance(DamageType::Cold)
            .with_vulnerability(DamageType::Cold);
        let (damage, applied) = apply_damage_traits(7, DamageType::Cold, &traits);
        assert_eq!(damage, 6);
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].kind, DamageModifierKind::Resistance);
        assert_eq!(applied[1].kind, DamageModifierKind::Vulnerability);
    }

    #[test]
    fn traits_for_other_types_do_nothing() {
        let traits = DamageTraits::new().with_resistance(DamageType::Fire);
        let (damage, applied) = apply_damage_traits(9, DamageType::Cold, &traits);
        assert_eq!(damage, 9);
        assert!(applied.is_empty());
    }

    #[test]
    fn final_damage_never_negative() {
        let request = DamageRequest::new(
            DiceExpression::new(1, Die::D4, -5).unwrap(),
            DamageType::Bludgeoning,
        );
        let outcome = evaluate_damage(&request, vec![1]).unwrap();
        assert_eq!(outcome.base_damage, -4);
        assert_eq!(outcome.final_damage, 0);
    }

    #[test]
    fn critical_doubles_past_the_per_expression_limit() {
        let mut engine = DiceEngine::new(1);
        let request = DamageRequest::parse("60d6", DamageType::Force)
            .unwrap()
            .critical(true);
        let outcome = resolve_damage(&request, &mut engine).unwrap();
        assert_eq!(outcome.rolled_dice.len(), 120);
        assert_eq!(engine.cursor(), 120);
        assert!((120..=720).contains(&outcome.base_damage));
    }

    #[test]
    fn flat_bonus_past_modifier_limit_is_rejected() {
        let mut engine = DiceEngine::new(1);
        let request = DamageRequest::parse("1d6+1000", DamageType::Force)
            .unwrap()
            .with_modifier(i32::MAX);
        assert!(matches!(
            resolve_damage(&request, &mut engine),
            Err(DiceError::ModifierOutOfRange { .. })
        ));
        assert_eq!(engine.cursor(), 0);
    }
}
