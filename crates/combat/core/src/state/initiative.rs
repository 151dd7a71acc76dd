use core::cmp::Ordering;

use super::CreatureId;

/// One creature's place in the initiative order.
///
/// Entries sort by total (descending), then modifier (descending), then id
/// (ascending). Ids are unique within an encounter so no two entries ever
/// compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeEntry {
    pub creature_id: CreatureId,
    /// The natural d20 face.
    pub base_roll: u32,
    pub modifier: i32,
    pub total: i32,
}

impl InitiativeEntry {
    pub fn new(creature_id: CreatureId, base_roll: u32, modifier: i32) -> Self {
        Self {
            creature_id,
            base_roll,
            modifier,
            total: base_roll as i32 + modifier,
        }
    }

    /// Same creature and roll, placed at a different total.
    pub fn with_total(self, total: i32) -> Self {
        Self { total, ..self }
    }
}

impl Ord for InitiativeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .total
            .cmp(&self.total)
            .then_with(|| other.modifier.cmp(&self.modifier))
            .then_with(|| self.creature_id.cmp(&other.creature_id))
            .then_with(|| self.base_roll.cmp(&other.base_roll))
    }
}

impl PartialOrd for InitiativeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A participant joining an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub creature_id: CreatureId,
    pub initiative_modifier: i32,
    /// Movement per turn, in feet.
    pub speed: u32,
}

impl Combatant {
    pub fn new(creature_id: CreatureId, initiative_modifier: i32, speed: u32) -> Self {
        Self {
            creature_id,
            initiative_modifier,
            speed,
        }
    }
}
