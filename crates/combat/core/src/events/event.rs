use std::collections::BTreeSet;

use crate::state::{Combatant, CreatureId, InitiativeEntry, SessionId, Timestamp};

/// An immutable fact in a session's combat log.
///
/// `session_id` and `timestamp` are bookkeeping for the orchestrator and
/// storage; folding only reads `kind`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEvent {
    pub session_id: SessionId,
    pub timestamp: Timestamp,
    pub kind: CombatEventKind,
}

impl CombatEvent {
    pub fn new(session_id: SessionId, timestamp: Timestamp, kind: CombatEventKind) -> Self {
        Self {
            session_id,
            timestamp,
            kind,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// The closed event vocabulary.
///
/// Adding a variant is a compile error at every consumer until handled.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum CombatEventKind {
    EncounterStarted {
        participants: Vec<Combatant>,
        initiative_order: Vec<InitiativeEntry>,
        surprised: BTreeSet<CreatureId>,
        /// Speed for creatures added later without one of their own.
        #[cfg_attr(feature = "serde", serde(default = "default_speed"))]
        default_speed: u32,
    },
    RoundStarted {
        round_number: u32,
    },
    TurnStarted {
        creature_id: CreatureId,
    },
    TurnEnded {
        creature_id: CreatureId,
    },
    ReactionUsed {
        creature_id: CreatureId,
        trigger: String,
    },
    TurnDelayed {
        creature_id: CreatureId,
        original_initiative: InitiativeEntry,
    },
    DelayedTurnResumed {
        creature_id: CreatureId,
        new_initiative: i32,
    },
    CreatureAddedToCombat {
        creature_id: CreatureId,
        entry: InitiativeEntry,
        speed: u32,
    },
    CreatureRemovedFromCombat {
        creature_id: CreatureId,
        reason: String,
    },
    MovementSpent {
        creature_id: CreatureId,
        feet: u32,
    },
    ActionSpent {
        creature_id: CreatureId,
    },
    BonusActionSpent {
        creature_id: CreatureId,
    },
    /// A tag this build does not know, e.g. written by a newer version.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

impl CombatEventKind {
    /// Variant name, as written in the `type` tag.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// The creature this event is about, if any.
    pub fn creature_id(&self) -> Option<CreatureId> {
        match self {
            Self::TurnStarted { creature_id }
            | Self::TurnEnded { creature_id }
            | Self::ReactionUsed { creature_id, .. }
            | Self::TurnDelayed { creature_id, .. }
            | Self::DelayedTurnResumed { creature_id, .. }
            | Self::CreatureAddedToCombat { creature_id, .. }
            | Self::CreatureRemovedFromCombat { creature_id, .. }
            | Self::MovementSpent { creature_id, .. }
            | Self::ActionSpent { creature_id }
            | Self::BonusActionSpent { creature_id } => Some(*creature_id),
            Self::EncounterStarted { .. } | Self::RoundStarted { .. } | Self::Unrecognized => None,
        }
    }
}

#[cfg(feature = "serde")]
fn default_speed() -> u32 {
    crate::config::CombatConfig::DEFAULT_SPEED
}
