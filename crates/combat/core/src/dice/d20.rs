//! d20 tests: roll modes and the two-dice advantage/disadvantage record.

use arrayvec::ArrayVec;

use super::DiceError;
use crate::config::CombatConfig;

/// How a d20 test is rolled.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RollMode {
    /// One d20.
    #[default]
    Normal,
    /// Two d20s, keep the higher.
    Advantage,
    /// Two d20s, keep the lower.
    Disadvantage,
}

impl RollMode {
    /// Number of d20s rolled in this mode.
    pub const fn dice_count(self) -> usize {
        match self {
            RollMode::Normal => 1,
            RollMode::Advantage | RollMode::Disadvantage => 2,
        }
    }
}

/// Accumulates independent advantage and disadvantage sources.
///
/// Each advantage source counts +1 and each disadvantage source -1; the sign
/// of the net decides the mode. A condition-imposed disadvantage therefore
/// cancels a requested advantage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RollModeSources {
    advantage: u32,
    disadvantage: u32,
}

impl RollModeSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the tally with the mode the caller asked for.
    pub fn requested(mode: RollMode) -> Self {
        let mut sources = Self::new();
        sources.add(mode);
        sources
    }

    /// Adds one source of the given mode. `Normal` adds nothing.
    pub fn add(&mut self, mode: RollMode) {
        match mode {
            RollMode::Normal => {}
            RollMode::Advantage => self.advantage += 1,
            RollMode::Disadvantage => self.disadvantage += 1,
        }
    }

    pub fn add_advantage(&mut self) {
        self.advantage += 1;
    }

    pub fn add_disadvantage(&mut self) {
        self.disadvantage += 1;
    }

    /// Net advantage minus disadvantage.
    pub fn net(&self) -> i64 {
        i64::from(self.advantage) - i64::from(self.disadvantage)
    }

    pub fn resolve(&self) -> RollMode {
        match self.net() {
            n if n > 0 => RollMode::Advantage,
            n if n < 0 => RollMode::Disadvantage,
            _ => RollMode::Normal,
        }
    }
}

/// A completed d20 test roll.
///
/// Both dice are retained under advantage/disadvantage; `natural` is the
/// kept face (higher or lower).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct D20Roll {
    rolls: ArrayVec<u32, 2>,
    natural: u32,
    modifier: i32,
    total: i32,
    mode: RollMode,
}

impl D20Roll {
    /// Builds a roll from already-rolled faces.
    ///
    /// `faces` must hold one value for `Normal` and two otherwise, each in
    /// `1..=20`.
    pub fn from_faces(faces: &[u32], modifier: i32, mode: RollMode) -> Result<Self, DiceError> {
        if faces.len() != mode.dice_count() {
            return Err(DiceError::WrongDiceForMode {
                mode: mode.into(),
                expected: mode.dice_count(),
                actual: faces.len(),
            });
        }
        if let Some(&value) = faces
            .iter()
            .find(|&&v| v < CombatConfig::NATURAL_MIN || v > CombatConfig::D20_SIDES)
        {
            return Err(DiceError::InvalidNatural { value });
        }

        Ok(Self::from_rolled(faces.iter().copied().collect(), modifier, mode))
    }

    /// Builds a roll from faces the engine just drew.
    pub(super) fn from_rolled(rolls: ArrayVec<u32, 2>, modifier: i32, mode: RollMode) -> Self {
        debug_assert_eq!(rolls.len(), mode.dice_count());
        let natural = match mode {
            RollMode::Normal => rolls[0],
            RollMode::Advantage => rolls[0].max(rolls[1]),
            RollMode::Disadvantage => rolls[0].min(rolls[1]),
        };

        Self {
            rolls,
            natural,
            modifier,
            total: (natural as i32).saturating_add(modifier),
            mode,
        }
    }

    /// Every d20 face rolled, in roll order.
    pub fn rolls(&self) -> &[u32] {
        &self.rolls
    }

    /// The kept face.
    pub fn natural(&self) -> u32 {
        self.natural
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn mode(&self) -> RollMode {
        self.mode
    }

    pub fn is_natural_max(&self) -> bool {
        self.natural == CombatConfig::NATURAL_MAX
    }

    pub fn is_natural_min(&self) -> bool {
        self.natural == CombatConfig::NATURAL_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_cancel_by_count() {
        let mut sources = RollModeSources::requested(RollMode::Advantage);
        assert_eq!(sources.resolve(), RollMode::Advantage);

        sources.add_disadvantage();
        assert_eq!(sources.resolve(), RollMode::Normal);

        sources.add_disadvantage();
        assert_eq!(sources.resolve(), RollMode::Disadvantage);

        sources.add(RollMode::Normal);
        assert_eq!(sources.net(), -1);
    }

    #[test]
    fn advantage_keeps_higher_disadvantage_keeps_lower() {
        let adv = D20Roll::from_faces(&[4, 17], 3, RollMode::Advantage).unwrap();
        assert_eq!(adv.rolls(), &[4, 17]);
        assert_eq!(adv.natural(), 17);
        assert_eq!(adv.total(), 20);

        let dis = D20Roll::from_faces(&[4, 17], 3, RollMode::Disadvantage).unwrap();
        assert_eq!(dis.natural(), 4);
        assert_eq!(dis.total(), 7);
    }

    #[test]
    fn rejects_wrong_face_count_or_value() {
        assert!(matches!(
            D20Roll::from_faces(&[10], 0, RollMode::Advantage),
            Err(DiceError::WrongDiceForMode { expected: 2, actual: 1, .. })
        ));
        assert_eq!(
            D20Roll::from_faces(&[21], 0, RollMode::Normal),
            Err(DiceError::InvalidNatural { value: 21 })
        );
        assert_eq!(
            D20Roll::from_faces(&[0], 0, RollMode::Normal),
            Err(DiceError::InvalidNatural { value: 0 })
        );
    }

    #[test]
    fn mode_parses_from_snake_case() {
        assert_eq!("advantage".parse::<RollMode>(), Ok(RollMode::Advantage));
        assert_eq!("NORMAL".parse::<RollMode>(), Ok(RollMode::Normal));
        assert_eq!(RollMode::Disadvantage.to_string(), "disadvantage");
    }
}
