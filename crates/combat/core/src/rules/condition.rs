//! Conditions and condition sets.
//!
//! A creature's active conditions travel into the resolvers as a
//! [`ConditionSet`]; the resolvers report the subset that changed a roll.

use bitflags::bitflags;
use strum::IntoEnumIterator;

/// A named condition that can affect rolls.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Condition {
    Blinded,
    Charmed,
    Deafened,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
}

impl Condition {
    /// The single-bit set for this condition.
    pub const fn flag(self) -> ConditionSet {
        match self {
            Condition::Blinded => ConditionSet::BLINDED,
            Condition::Charmed => ConditionSet::CHARMED,
            Condition::Deafened => ConditionSet::DEAFENED,
            Condition::Frightened => ConditionSet::FRIGHTENED,
            Condition::Grappled => ConditionSet::GRAPPLED,
            Condition::Incapacitated => ConditionSet::INCAPACITATED,
            Condition::Invisible => ConditionSet::INVISIBLE,
            Condition::Paralyzed => ConditionSet::PARALYZED,
            Condition::Petrified => ConditionSet::PETRIFIED,
            Condition::Poisoned => ConditionSet::POISONED,
            Condition::Prone => ConditionSet::PRONE,
            Condition::Restrained => ConditionSet::RESTRAINED,
            Condition::Stunned => ConditionSet::STUNNED,
            Condition::Unconscious => ConditionSet::UNCONSCIOUS,
        }
    }
}

bitflags! {
    /// A set of [`Condition`]s.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ConditionSet: u16 {
        const BLINDED       = 1 << 0;
        const CHARMED       = 1 << 1;
        const DEAFENED      = 1 << 2;
        const FRIGHTENED    = 1 << 3;
        const GRAPPLED      = 1 << 4;
        const INCAPACITATED = 1 << 5;
        const INVISIBLE     = 1 << 6;
        const PARALYZED     = 1 << 7;
        const PETRIFIED     = 1 << 8;
        const POISONED      = 1 << 9;
        const PRONE         = 1 << 10;
        const RESTRAINED    = 1 << 11;
        const STUNNED       = 1 << 12;
        const UNCONSCIOUS   = 1 << 13;
    }
}

impl ConditionSet {
    pub fn has(&self, condition: Condition) -> bool {
        self.contains(condition.flag())
    }

    pub fn with(self, condition: Condition) -> Self {
        self | condition.flag()
    }

    /// Conditions in the set, in declaration order.
    pub fn conditions(&self) -> impl Iterator<Item = Condition> + '_ {
        Condition::iter().filter(|c| self.has(*c))
    }
}

impl From<Condition> for ConditionSet {
    fn from(condition: Condition) -> Self {
        condition.flag()
    }
}

impl FromIterator<Condition> for ConditionSet {
    fn from_iter<T: IntoIterator<Item = Condition>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ConditionSet::empty(), |set, c| set.with(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_condition_has_a_distinct_flag() {
        let all: ConditionSet = Condition::iter().collect();
        assert_eq!(all.bits().count_ones() as usize, Condition::iter().count());
    }

    #[test]
    fn set_membership() {
        let set: ConditionSet = [Condition::Stunned, Condition::Prone].into_iter().collect();
        assert!(set.has(Condition::Stunned));
        assert!(set.has(Condition::Prone));
        assert!(!set.has(Condition::Poisoned));
        assert_eq!(
            set.conditions().collect::<Vec<_>>(),
            vec![Condition::Prone, Condition::Stunned]
        );
    }

    #[test]
    fn parses_names() {
        assert_eq!("POISONED".parse::<Condition>(), Ok(Condition::Poisoned));
        assert_eq!(Condition::Unconscious.to_string(), "unconscious");
    }
}
