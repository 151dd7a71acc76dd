use super::CreatureId;

/// Resources of the active creature for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPhase {
    pub creature_id: CreatureId,
    pub movement_remaining: u32,
    pub action_available: bool,
    pub bonus_action_available: bool,
    pub reaction_available: bool,
}

impl TurnPhase {
    /// Fresh resources at turn start.
    pub fn fresh(creature_id: CreatureId, speed: u32) -> Self {
        Self {
            creature_id,
            movement_remaining: speed,
            action_available: true,
            bonus_action_available: true,
            reaction_available: true,
        }
    }

    /// True once every resource of the turn is spent.
    pub fn is_exhausted(&self) -> bool {
        self.movement_remaining == 0
            && !self.action_available
            && !self.bonus_action_available
            && !self.reaction_available
    }
}
