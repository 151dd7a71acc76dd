use bitflags::bitflags;
use strum::IntoEnumIterator;

/// Kind of damage dealt by an effect.
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
pub enum DamageType {
    Acid,
    Bludgeoning,
    Cold,
    Fire,
    Force,
    Lightning,
    Necrotic,
    Piercing,
    Poison,
    Psychic,
    Radiant,
    Slashing,
    Thunder,
}

impl DamageType {
    pub const fn flag(self) -> DamageTypeSet {
        match self {
            DamageType::Acid => DamageTypeSet::ACID,
            DamageType::Bludgeoning => DamageTypeSet::BLUDGEONING,
            DamageType::Cold => DamageTypeSet::COLD,
            DamageType::Fire => DamageTypeSet::FIRE,
            DamageType::Force => DamageTypeSet::FORCE,
            DamageType::Lightning => DamageTypeSet::LIGHTNING,
            DamageType::Necrotic => DamageTypeSet::NECROTIC,
            DamageType::Piercing => DamageTypeSet::PIERCING,
            DamageType::Poison => DamageTypeSet::POISON,
            DamageType::Psychic => DamageTypeSet::PSYCHIC,
            DamageType::Radiant => DamageTypeSet::RADIANT,
            DamageType::Slashing => DamageTypeSet::SLASHING,
            DamageType::Thunder => DamageTypeSet::THUNDER,
        }
    }
}

bitflags! {
    /// A set of [`DamageType`]s.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DamageTypeSet: u16 {
        const ACID        = 1 << 0;
        const BLUDGEONING = 1 << 1;
        const COLD        = 1 << 2;
        const FIRE        = 1 << 3;
        const FORCE       = 1 << 4;
        const LIGHTNING   = 1 << 5;
        const NECROTIC    = 1 << 6;
        const PIERCING    = 1 << 7;
        const POISON      = 1 << 8;
        const PSYCHIC     = 1 << 9;
        const RADIANT     = 1 << 10;
        const SLASHING    = 1 << 11;
        const THUNDER     = 1 << 12;
    }
}

impl DamageTypeSet {
    pub fn has(&self, damage_type: DamageType) -> bool {
        self.contains(damage_type.flag())
    }

    pub fn with(self, damage_type: DamageType) -> Self {
        self | damage_type.flag()
    }

    pub fn types(&self) -> impl Iterator<Item = DamageType> + '_ {
        DamageType::iter().filter(|t| self.has(*t))
    }
}

impl From<DamageType> for DamageTypeSet {
    fn from(damage_type: DamageType) -> Self {
        damage_type.flag()
    }
}

impl FromIterator<DamageType> for DamageTypeSet {
    fn from_iter<T: IntoIterator<Item = DamageType>>(iter: T) -> Self {
        iter.into_iter()
            .fold(DamageTypeSet::empty(), |set, t| set.with(t))
    }
}

/// How a target trait changes incoming damage.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageModifierKind {
    /// Halved, rounded down.
    Resistance,
    /// Doubled.
    Vulnerability,
    /// Reduced to zero.
    Immunity,
}

/// A target's damage resistances, vulnerabilities and immunities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTraits {
    pub resistances: DamageTypeSet,
    pub vulnerabilities: DamageTypeSet,
    pub immunities: DamageTypeSet,
}

impl DamageTraits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resistance(mut self, damage_type: DamageType) -> Self {
        self.resistances = self.resistances.with(damage_type);
        self
    }

    pub fn with_vulnerability(mut self, damage_type: DamageType) -> Self {
        self.vulnerabilities = self.vulnerabilities.with(damage_type);
        self
    }

    pub fn with_immunity(mut self, damage_type: DamageType) -> Self {
        self.immunities = self.immunities.with(damage_type);
        self
    }

    pub fn is_resistant(&self, damage_type: DamageType) -> bool {
        self.resistances.has(damage_type)
    }

    pub fn is_vulnerable(&self, damage_type: DamageType) -> bool {
        self.vulnerabilities.has(damage_type)
    }

    pub fn is_immune(&self, damage_type: DamageType) -> bool {
        self.immunities.has(damage_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_damage_type_has_a_distinct_flag() {
        let all: DamageTypeSet = DamageType::iter().collect();
        assert_eq!(all.bits().count_ones() as usize, DamageType::iter().count());
    }

    #[test]
    fn traits_builder() {
        let traits = DamageTraits::new()
            .with_resistance(DamageType::Fire)
            .with_immunity(DamageType::Poison);
        assert!(traits.is_resistant(DamageType::Fire));
        assert!(!traits.is_resistant(DamageType::Cold));
        assert!(traits.is_immune(DamageType::Poison));
        assert!(!traits.is_vulnerable(DamageType::Fire));
    }

    #[test]
    fn parses_names() {
        assert_eq!("Fire".parse::<DamageType>(), Ok(DamageType::Fire));
        assert_eq!(DamageModifierKind::Vulnerability.to_string(), "vulnerability");
    }
}
