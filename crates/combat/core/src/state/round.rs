use std::collections::{BTreeMap, BTreeSet};

use super::{CreatureId, InitiativeEntry, TurnPhase};
use crate::config::CombatConfig;

/// The creature currently acting and its remaining resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentTurn {
    pub active_creature_id: CreatureId,
    /// Position of the active creature in `initiative_order`.
    pub turn_index: usize,
    pub phase: TurnPhase,
    /// Delayed creatures resumed during this turn; each later resume lands
    /// behind the earlier ones.
    pub resumes_queued: usize,
}

/// Canonical combat state: rounds, initiative and the active turn.
///
/// Never mutated in place by callers; every transition returns a new value.
/// Ordered collections keep the value (and its encoding) deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    /// 0 only during the surprise round.
    pub round_number: u32,
    pub is_surprise_round: bool,
    pub initiative_order: Vec<InitiativeEntry>,
    pub surprised: BTreeSet<CreatureId>,
    /// Creatures holding a delayed turn, keyed by id.
    pub delayed: BTreeMap<CreatureId, InitiativeEntry>,
    /// Movement speed per creature.
    pub speeds: BTreeMap<CreatureId, u32>,
    /// Speed for creatures missing from `speeds`.
    pub default_speed: u32,
    /// Creatures whose reaction is spent until their next turn starts.
    pub reactions_spent: BTreeSet<CreatureId>,
    pub current_turn: Option<CurrentTurn>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            round_number: 0,
            is_surprise_round: false,
            initiative_order: Vec::new(),
            surprised: BTreeSet::new(),
            delayed: BTreeMap::new(),
            speeds: BTreeMap::new(),
            default_speed: CombatConfig::DEFAULT_SPEED,
            reactions_spent: BTreeSet::new(),
            current_turn: None,
        }
    }
}

impl RoundState {
    /// The state before any encounter has started.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True once an encounter has been initialized.
    pub fn is_started(&self) -> bool {
        self.round_number > 0 || self.is_surprise_round
    }

    pub fn active_creature(&self) -> Option<CreatureId> {
        self.current_turn.map(|turn| turn.active_creature_id)
    }

    pub fn phase(&self) -> Option<&TurnPhase> {
        self.current_turn.as_ref().map(|turn| &turn.phase)
    }

    pub fn position_of(&self, creature_id: CreatureId) -> Option<usize> {
        self.initiative_order
            .iter()
            .position(|entry| entry.creature_id == creature_id)
    }

    pub fn entry(&self, creature_id: CreatureId) -> Option<&InitiativeEntry> {
        self.initiative_order
            .iter()
            .find(|entry| entry.creature_id == creature_id)
            .or_else(|| self.delayed.get(&creature_id))
    }

    /// True if the creature is in the order or holding a delayed turn.
    pub fn contains(&self, creature_id: CreatureId) -> bool {
        self.position_of(creature_id).is_some() || self.delayed.contains_key(&creature_id)
    }

    pub fn is_delayed(&self, creature_id: CreatureId) -> bool {
        self.delayed.contains_key(&creature_id)
    }

    /// True if the creature cannot act because of the surprise round.
    pub fn is_surprised(&self, creature_id: CreatureId) -> bool {
        self.is_surprise_round && self.surprised.contains(&creature_id)
    }

    pub fn speed_of(&self, creature_id: CreatureId) -> u32 {
        self.speeds
            .get(&creature_id)
            .copied()
            .unwrap_or(self.default_speed)
    }

    /// Whether the creature still has its reaction this round.
    pub fn can_react(&self, creature_id: CreatureId) -> bool {
        if self.reactions_spent.contains(&creature_id) {
            return false;
        }
        match self.current_turn {
            Some(turn) if turn.active_creature_id == creature_id => turn.phase.reaction_available,
            _ => self.contains(creature_id),
        }
    }

    /// Ids in acting order.
    pub fn order_ids(&self) -> impl Iterator<Item = CreatureId> + '_ {
        self.initiative_order.iter().map(|entry| entry.creature_id)
    }

    /// SHA-256 of the bincode encoding: a byte-exact fingerprint of the state.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }
}
