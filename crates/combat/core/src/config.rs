/// Rule constants and tunable parameters for the combat core.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Movement (in feet) granted at turn start to creatures without an
    /// explicit speed.
    pub default_speed: u32,
}

impl CombatConfig {
    // ===== compile-time rule constants =====
    /// Die sizes accepted anywhere in the core.
    pub const VALID_SIDES: [u32; 7] = [4, 6, 8, 10, 12, 20, 100];
    /// Sides of the die used for attacks, saves, checks and initiative.
    pub const D20_SIDES: u32 = 20;
    /// Natural roll that always hits (attacks) or succeeds (saves).
    pub const NATURAL_MAX: u32 = 20;
    /// Natural roll that always misses (attacks).
    pub const NATURAL_MIN: u32 = 1;
    /// Upper bound on the dice count of a single expression.
    pub const MAX_DICE_PER_EXPRESSION: u32 = 100;
    /// Largest flat modifier magnitude accepted in a dice expression or
    /// damage bonus.
    pub const MAX_MODIFIER: i32 = 1_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SPEED: u32 = 30;

    pub fn new() -> Self {
        Self {
            default_speed: Self::DEFAULT_SPEED,
        }
    }

    pub fn with_default_speed(default_speed: u32) -> Self {
        Self { default_speed }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Die;

    #[test]
    fn valid_sides_match_the_die_set() {
        let sides: Vec<u32> = Die::ALL.iter().map(|die| die.sides()).collect();
        assert_eq!(sides, CombatConfig::VALID_SIDES);
        assert_eq!(Die::D20.sides(), CombatConfig::D20_SIDES);
    }

    #[test]
    fn default_speed_is_tunable() {
        assert_eq!(CombatConfig::default().default_speed, CombatConfig::DEFAULT_SPEED);
        assert_eq!(CombatConfig::with_default_speed(25).default_speed, 25);
    }
}
