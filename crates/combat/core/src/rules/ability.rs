/// The six ability scores.
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
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// Strength and Dexterity: the saves that incapacitating conditions fail.
    pub const fn is_physical(self) -> bool {
        matches!(self, Ability::Strength | Ability::Dexterity)
    }
}

/// Training tier applied to a check.
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
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProficiencyTier {
    #[default]
    None,
    Proficient,
    Expertise,
}

impl ProficiencyTier {
    /// Multiplier applied to the proficiency bonus (0×, 1×, 2×).
    pub const fn multiplier(self) -> i32 {
        match self {
            ProficiencyTier::None => 0,
            ProficiencyTier::Proficient => 1,
            ProficiencyTier::Expertise => 2,
        }
    }

    /// Bonus contributed by this tier for a given proficiency bonus.
    pub const fn contribution(self, proficiency_bonus: i32) -> i32 {
        self.multiplier() * proficiency_bonus
    }
}
