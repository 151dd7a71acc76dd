//! The combat session: one encounter, one dice stream, one event log.
//!
//! Every command runs the matching core transition against the current
//! [`RoundState`], turns the step into events, optionally re-folds those
//! events to check they reproduce the same state, and appends them to the
//! repository. The log is the source of truth: [`CombatSession::undo`],
//! [`CombatSession::rebuild`] and [`CombatSession::resume`] all derive state
//! from it by replay.

use std::collections::BTreeSet;

use combat_core::events::replay_onto;
use combat_core::turn;
use combat_core::{
    AttackContext, AttackOutcome, AbilityCheckContext, CombatError, CombatEvent, CombatEventKind,
    Combatant, CreatureId, DamageOutcome, DamageRequest, DiceEngine, DiceExpression, DieRoll,
    InitiativeEntry, RollMode, RollOutcome, RoundState, SavingThrowContext, SessionId,
    TransitionError, TurnPhase, build_state, resolve_ability_check, resolve_attack,
    resolve_damage, resolve_saving_throw,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::{Resource, Result, SessionError};
use crate::repository::{EventRepository, InMemoryEventRepository, RepositoryError};
use crate::utils::hash::{short_root, state_root_hex};

/// Everything needed to pick a session back up in another process.
///
/// Pair it with the session's event log: [`CombatSession::resume`] replays
/// the log, checks it against `event_count` and `state_root`, and continues
/// the dice stream at `dice_cursor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub session_id: SessionId,
    pub seed: u64,
    pub dice_cursor: u64,
    pub event_count: usize,
    /// Hex-encoded SHA-256 of the state after `event_count` events.
    pub state_root: String,
}

impl Checkpoint {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

pub struct CombatSession<R = InMemoryEventRepository, C = SystemClock> {
    config: SessionConfig,
    session_id: SessionId,
    repository: R,
    clock: C,
    engine: DiceEngine,
    state: RoundState,
}

impl CombatSession {
    /// Session backed by an in-memory log and the system clock.
    pub fn in_memory(config: SessionConfig) -> Result<Self> {
        let repository = InMemoryEventRepository::new(config.session_id());
        Self::new(config, repository, SystemClock)
    }
}

impl<R: EventRepository, C: Clock> CombatSession<R, C> {
    /// Opens a new session over an empty log.
    ///
    /// A log that already holds events belongs to an earlier run of the
    /// session; open it with [`CombatSession::resume`] instead.
    pub fn new(config: SessionConfig, repository: R, clock: C) -> Result<Self> {
        config.validate()?;
        let session_id = config.session_id();
        check_repository_session(&session_id, &repository)?;

        let len = repository.len()?;
        if len > 0 {
            return Err(SessionError::LogNotEmpty { len });
        }

        info!(
            target: "runtime::session",
            session = %session_id,
            seed = config.seed,
            "session opened"
        );

        Ok(Self {
            engine: DiceEngine::new(config.seed),
            state: RoundState::empty(),
            session_id,
            config,
            repository,
            clock,
        })
    }

    /// Reopens a session from its log and a checkpoint taken earlier.
    pub fn resume(config: SessionConfig, repository: R, clock: C, checkpoint: &Checkpoint) -> Result<Self> {
        config.validate()?;
        let session_id = config.session_id();
        check_repository_session(&session_id, &repository)?;

        if checkpoint.session_id != session_id {
            return Err(checkpoint_mismatch(format!(
                "checkpoint belongs to session {}",
                checkpoint.session_id
            )));
        }
        if checkpoint.seed != config.seed {
            return Err(checkpoint_mismatch(format!(
                "checkpoint seed {} differs from configured seed {}",
                checkpoint.seed, config.seed
            )));
        }

        let events = repository.read_all()?;
        if events.len() != checkpoint.event_count {
            return Err(checkpoint_mismatch(format!(
                "log holds {} event(s), checkpoint expects {}",
                events.len(),
                checkpoint.event_count
            )));
        }

        let state = build_state(&events)?;
        let root = state_root_hex(&state)?;
        if root != checkpoint.state_root {
            return Err(checkpoint_mismatch(format!(
                "replayed state root {root} differs from {}",
                checkpoint.state_root
            )));
        }

        info!(
            target: "runtime::session",
            session = %session_id,
            events = events.len(),
            dice_cursor = checkpoint.dice_cursor,
            round = state.round_number,
            "session resumed"
        );

        Ok(Self {
            engine: DiceEngine::resume(checkpoint.seed, checkpoint.dice_cursor),
            state,
            session_id,
            config,
            repository,
            clock,
        })
    }

    // ===== accessors =====

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Raw draws taken from the session's dice stream so far.
    pub fn dice_cursor(&self) -> u64 {
        self.engine.cursor()
    }

    pub fn events(&self) -> Result<Vec<CombatEvent>> {
        Ok(self.repository.read_all()?)
    }

    /// A combatant moving at the configured default speed.
    pub fn combatant(&self, creature_id: CreatureId, initiative_modifier: i32) -> Combatant {
        Combatant::new(creature_id, initiative_modifier, self.config.default_speed)
    }

    pub fn checkpoint(&self) -> Result<Checkpoint> {
        Ok(Checkpoint {
            session_id: self.session_id.clone(),
            seed: self.engine.seed(),
            dice_cursor: self.engine.cursor(),
            event_count: self.repository.len()?,
            state_root: state_root_hex(&self.state)?,
        })
    }

    // ===== encounter flow =====

    /// Rolls initiative for every combatant and starts the first turn.
    ///
    /// Emits `EncounterStarted`, then `RoundStarted` when nobody may act in
    /// the surprise round, then `TurnStarted`.
    pub fn start_encounter(
        &mut self,
        combatants: &[Combatant],
        surprised: BTreeSet<CreatureId>,
    ) -> Result<&RoundState> {
        let result = self.try_start_encounter(combatants, surprised);
        self.report("start_encounter", result)?;
        Ok(&self.state)
    }

    fn try_start_encounter(
        &mut self,
        combatants: &[Combatant],
        surprised: BTreeSet<CreatureId>,
    ) -> Result<()> {
        if self.state.is_started() {
            return Err(TransitionError::AlreadyStarted.into());
        }
        // reject before drawing so a refused command leaves the stream alone
        validate_roster(combatants, &surprised)?;

        let order = turn::roll_initiative_for_all(combatants, &mut self.engine);
        let default_speed = self.config.combat_config().default_speed;
        let mut initialized = turn::initialize(order.clone(), surprised.clone())?;
        initialized.default_speed = default_speed;
        for combatant in combatants {
            initialized.speeds.insert(combatant.creature_id, combatant.speed);
        }
        let started = turn::begin_first_turn(&initialized)?;

        let mut kinds = vec![CombatEventKind::EncounterStarted {
            participants: combatants.to_vec(),
            initiative_order: order,
            surprised,
            default_speed,
        }];
        if started.round_number != initialized.round_number {
            kinds.push(CombatEventKind::RoundStarted {
                round_number: started.round_number,
            });
        }
        if let Some(creature_id) = started.active_creature() {
            kinds.push(CombatEventKind::TurnStarted { creature_id });
        }

        info!(
            target: "runtime::session",
            session = %self.session_id,
            combatants = combatants.len(),
            surprise_round = initialized.is_surprise_round,
            first = ?started.active_creature(),
            "encounter started"
        );
        self.commit(kinds, started)
    }

    /// Ends the active turn and hands the turn to the next creature,
    /// opening a new round on wraparound.
    pub fn end_turn(&mut self) -> Result<&RoundState> {
        let result = self.try_end_turn();
        self.report("end_turn", result)?;
        Ok(&self.state)
    }

    fn try_end_turn(&mut self) -> Result<()> {
        let active = self
            .state
            .active_creature()
            .ok_or(TransitionError::NoActiveTurn)?;
        let next = turn::advance_turn(&self.state)?;

        let mut kinds = vec![CombatEventKind::TurnEnded { creature_id: active }];
        if next.round_number != self.state.round_number {
            kinds.push(CombatEventKind::RoundStarted {
                round_number: next.round_number,
            });
        }
        if let Some(creature_id) = next.active_creature() {
            kinds.push(CombatEventKind::TurnStarted { creature_id });
        }
        self.commit(kinds, next)
    }

    /// Moves the active creature out of the order; the turn passes on.
    pub fn delay_turn(&mut self, creature_id: CreatureId) -> Result<&RoundState> {
        let result = self.try_delay_turn(creature_id);
        self.report("delay_turn", result)?;
        Ok(&self.state)
    }

    fn try_delay_turn(&mut self, creature_id: CreatureId) -> Result<()> {
        let next = turn::delay_turn(&self.state, creature_id)?;
        let original_initiative = self
            .state
            .entry(creature_id)
            .copied()
            .ok_or(TransitionError::CreatureNotFound { creature_id })?;
        self.commit(
            vec![CombatEventKind::TurnDelayed {
                creature_id,
                original_initiative,
            }],
            next,
        )
    }

    /// Brings a delayed creature back at `new_initiative`; it acts right
    /// after the active creature.
    pub fn resume_delayed(&mut self, creature_id: CreatureId, new_initiative: i32) -> Result<&RoundState> {
        let result = turn::resume_delayed_turn(&self.state, creature_id, new_initiative)
            .map_err(SessionError::from)
            .and_then(|next| {
                self.commit(
                    vec![CombatEventKind::DelayedTurnResumed {
                        creature_id,
                        new_initiative,
                    }],
                    next,
                )
            });
        self.report("resume_delayed", result)?;
        Ok(&self.state)
    }

    /// Rolls initiative for a newcomer and slots it into the order.
    pub fn add_creature(&mut self, combatant: Combatant) -> Result<&RoundState> {
        let result = self.try_add_creature(combatant);
        self.report("add_creature", result)?;
        Ok(&self.state)
    }

    fn try_add_creature(&mut self, combatant: Combatant) -> Result<()> {
        let creature_id = combatant.creature_id;
        if !self.state.is_started() {
            return Err(TransitionError::NotStarted.into());
        }
        if self.state.contains(creature_id) {
            return Err(TransitionError::DuplicateCreature { creature_id }.into());
        }

        let roll = self
            .engine
            .roll_d20(combatant.initiative_modifier, RollMode::Normal);
        let entry = InitiativeEntry::new(creature_id, roll.natural(), combatant.initiative_modifier);
        let next = turn::add_creature(&self.state, entry, combatant.speed)?;
        self.commit(
            vec![CombatEventKind::CreatureAddedToCombat {
                creature_id,
                entry,
                speed: combatant.speed,
            }],
            next,
        )
    }

    /// Takes a creature out of combat; removing the active creature passes
    /// the turn on.
    pub fn remove_creature(&mut self, creature_id: CreatureId, reason: impl Into<String>) -> Result<&RoundState> {
        let reason = reason.into();
        let result = turn::remove_creature(&self.state, creature_id)
            .map_err(SessionError::from)
            .and_then(|next| {
                self.commit(
                    vec![CombatEventKind::CreatureRemovedFromCombat {
                        creature_id,
                        reason,
                    }],
                    next,
                )
            });
        self.report("remove_creature", result)?;
        Ok(&self.state)
    }

    // ===== per-turn resources =====

    pub fn spend_movement(&mut self, creature_id: CreatureId, feet: u32) -> Result<&RoundState> {
        let result = self
            .ensure_unspent(creature_id, Resource::Movement, |phase| phase.movement_remaining > 0)
            .and_then(|()| Ok(turn::consume_movement(&self.state, creature_id, feet)?))
            .and_then(|next| {
                self.commit(vec![CombatEventKind::MovementSpent { creature_id, feet }], next)
            });
        self.report("spend_movement", result)?;
        Ok(&self.state)
    }

    pub fn spend_action(&mut self, creature_id: CreatureId) -> Result<&RoundState> {
        let result = self
            .ensure_unspent(creature_id, Resource::Action, |phase| phase.action_available)
            .and_then(|()| Ok(turn::consume_action(&self.state, creature_id)?))
            .and_then(|next| self.commit(vec![CombatEventKind::ActionSpent { creature_id }], next));
        self.report("spend_action", result)?;
        Ok(&self.state)
    }

    pub fn spend_bonus_action(&mut self, creature_id: CreatureId) -> Result<&RoundState> {
        let result = self
            .ensure_unspent(creature_id, Resource::BonusAction, |phase| {
                phase.bonus_action_available
            })
            .and_then(|()| Ok(turn::consume_bonus_action(&self.state, creature_id)?))
            .and_then(|next| {
                self.commit(vec![CombatEventKind::BonusActionSpent { creature_id }], next)
            });
        self.report("spend_bonus_action", result)?;
        Ok(&self.state)
    }

    /// Spends a reaction, on the creature's own turn or anyone else's.
    pub fn spend_reaction(&mut self, creature_id: CreatureId, trigger: impl Into<String>) -> Result<&RoundState> {
        let trigger = trigger.into();
        let result = if self.state.contains(creature_id) && !self.state.can_react(creature_id) {
            Err(SessionError::ResourceSpent {
                creature_id,
                resource: Resource::Reaction,
            })
        } else {
            turn::consume_reaction(&self.state, creature_id)
                .map_err(SessionError::from)
                .and_then(|next| {
                    self.commit(
                        vec![CombatEventKind::ReactionUsed {
                            creature_id,
                            trigger,
                        }],
                        next,
                    )
                })
        };
        self.report("spend_reaction", result)?;
        Ok(&self.state)
    }

    /// Fails with [`SessionError::ResourceSpent`] when `creature_id` is the
    /// active creature and `available` says the resource is gone. Anything
    /// else is left for the core transition to judge.
    fn ensure_unspent(
        &self,
        creature_id: CreatureId,
        resource: Resource,
        available: impl FnOnce(&TurnPhase) -> bool,
    ) -> Result<()> {
        match self.state.current_turn {
            Some(turn) if turn.active_creature_id == creature_id && !available(&turn.phase) => {
                Err(SessionError::ResourceSpent {
                    creature_id,
                    resource,
                })
            }
            _ => Ok(()),
        }
    }

    // ===== resolvers =====

    /// Rolls an arbitrary expression from the session's stream.
    pub fn roll(&mut self, expression: &DiceExpression) -> DieRoll {
        let roll = self.engine.roll_expression(expression);
        debug!(
            target: "runtime::session",
            expression = %expression,
            total = roll.total(),
            "dice rolled"
        );
        roll
    }

    pub fn attack(&mut self, context: &AttackContext) -> AttackOutcome {
        let outcome = resolve_attack(context, &mut self.engine);
        debug!(
            target: "runtime::session",
            natural = outcome.roll.primary_roll,
            total = outcome.roll.total,
            armor_class = context.armor_class,
            hit = outcome.hit(),
            critical = outcome.critical,
            "attack resolved"
        );
        outcome
    }

    pub fn damage(&mut self, request: &DamageRequest) -> Result<DamageOutcome> {
        let outcome = resolve_damage(request, &mut self.engine)?;
        debug!(
            target: "runtime::session",
            damage_type = ?outcome.damage_type,
            base = outcome.base_damage,
            final_damage = outcome.final_damage,
            critical = outcome.is_critical,
            "damage resolved"
        );
        Ok(outcome)
    }

    pub fn saving_throw(&mut self, context: &SavingThrowContext) -> RollOutcome {
        let outcome = resolve_saving_throw(context, &mut self.engine);
        debug!(
            target: "runtime::session",
            ability = ?context.ability,
            total = outcome.total,
            dc = outcome.target,
            succeeded = outcome.succeeded,
            "saving throw resolved"
        );
        outcome
    }

    pub fn ability_check(&mut self, context: &AbilityCheckContext) -> RollOutcome {
        let outcome = resolve_ability_check(context, &mut self.engine);
        debug!(
            target: "runtime::session",
            ability = ?context.ability,
            total = outcome.total,
            dc = outcome.target,
            succeeded = outcome.succeeded,
            "ability check resolved"
        );
        outcome
    }

    // ===== replay =====

    /// Drops the last `count` events and rebuilds state from what remains.
    ///
    /// The dice stream is not rewound; rolls made after an undo are fresh.
    pub fn undo(&mut self, count: usize) -> Result<&RoundState> {
        let len = self.repository.len()?;
        if count > len {
            return Err(SessionError::UndoBeyondStart {
                requested: count,
                len,
            });
        }

        self.repository.truncate(len - count)?;
        self.rebuild()?;
        info!(
            target: "runtime::session",
            session = %self.session_id,
            undone = count,
            remaining = len - count,
            root = %short_root(&self.state),
            "events undone"
        );
        Ok(&self.state)
    }

    /// Replaces the in-memory state with a full replay of the log.
    pub fn rebuild(&mut self) -> Result<&RoundState> {
        let events = self.repository.read_all()?;
        self.state = build_state(&events)?;
        Ok(&self.state)
    }

    /// Stamps `kinds`, checks they fold to `expected`, and appends them.
    fn commit(&mut self, kinds: Vec<CombatEventKind>, expected: RoundState) -> Result<()> {
        let events: Vec<CombatEvent> = kinds
            .into_iter()
            .map(|kind| CombatEvent::new(self.session_id.clone(), self.clock.now(), kind))
            .collect();

        if self.config.verify_replay {
            let replayed = replay_onto(&self.state, &events)?;
            if replayed != expected {
                return Err(SessionError::ReplayDivergence {
                    events: events.len(),
                    expected: state_root_hex(&expected)?,
                    actual: state_root_hex(&replayed)?,
                });
            }
        }

        let len = self.repository.append_all(&events)?;
        for event in &events {
            debug!(
                target: "runtime::session",
                event = event.name(),
                creature = ?event.kind.creature_id(),
                log_len = len,
                "event appended"
            );
            if let CombatEventKind::RoundStarted { round_number } = &event.kind {
                info!(
                    target: "runtime::session",
                    session = %self.session_id,
                    round = *round_number,
                    "round started"
                );
            }
        }

        self.state = expected;
        Ok(())
    }

    fn report(&self, command: &'static str, result: Result<()>) -> Result<()> {
        if let Err(error) = &result {
            warn!(
                target: "runtime::session",
                command,
                code = error.error_code(),
                %error,
                "command rejected"
            );
        }
        result
    }
}

fn check_repository_session(session_id: &SessionId, repository: &impl EventRepository) -> Result<()> {
    if repository.session_id() != session_id {
        return Err(RepositoryError::SessionMismatch {
            expected: session_id.clone(),
            actual: repository.session_id().clone(),
        }
        .into());
    }
    Ok(())
}

fn checkpoint_mismatch(reason: String) -> SessionError {
    SessionError::CheckpointMismatch { reason }
}

/// The encounter-start preconditions, checked before any initiative roll.
fn validate_roster(combatants: &[Combatant], surprised: &BTreeSet<CreatureId>) -> Result<()> {
    if combatants.is_empty() {
        return Err(TransitionError::EmptyOrder.into());
    }
    let mut seen = BTreeSet::new();
    for combatant in combatants {
        if !seen.insert(combatant.creature_id) {
            return Err(TransitionError::DuplicateCreature {
                creature_id: combatant.creature_id,
            }
            .into());
        }
    }
    if let Some(&creature_id) = surprised.iter().find(|id| !seen.contains(id)) {
        return Err(TransitionError::SurprisedNotInOrder { creature_id }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use combat_core::Timestamp;

    fn session(seed: u64) -> CombatSession<InMemoryEventRepository, ManualClock> {
        let config = SessionConfig::new("unit", seed);
        let repository = InMemoryEventRepository::new("unit");
        CombatSession::new(config, repository, ManualClock::new(Timestamp(100))).unwrap()
    }

    #[test]
    fn refused_start_does_not_draw_dice() {
        let mut session = session(3);
        let c = session.combatant(CreatureId(1), 0);
        let err = session
            .start_encounter(&[c, c], BTreeSet::new())
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transition(TransitionError::DuplicateCreature { .. })
        ));
        assert_eq!(session.dice_cursor(), 0);
        assert!(session.events().unwrap().is_empty());
    }

    #[test]
    fn events_are_stamped_by_the_clock() {
        let mut session = session(3);
        let party = [
            session.combatant(CreatureId(1), 2),
            session.combatant(CreatureId(2), 0),
        ];
        session.start_encounter(&party, BTreeSet::new()).unwrap();

        let events = session.events().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.timestamp == Timestamp(100)));
        assert!(events.iter().all(|e| e.session_id.as_str() == "unit"));
    }

    /// Delegates to an in-memory log but fails the `fail_at`-th append.
    struct FailingRepository {
        inner: InMemoryEventRepository,
        appends: usize,
        fail_at: usize,
    }

    impl EventRepository for FailingRepository {
        fn append(&mut self, event: &CombatEvent) -> crate::repository::Result<usize> {
            self.appends += 1;
            if self.appends == self.fail_at {
                return Err(RepositoryError::LockPoisoned);
            }
            self.inner.append(event)
        }

        fn read_all(&self) -> crate::repository::Result<Vec<CombatEvent>> {
            self.inner.read_all()
        }

        fn truncate(&mut self, len: usize) -> crate::repository::Result<()> {
            self.inner.truncate(len)
        }

        fn len(&self) -> crate::repository::Result<usize> {
            self.inner.len()
        }

        fn session_id(&self) -> &SessionId {
            self.inner.session_id()
        }
    }

    #[test]
    fn failed_append_keeps_log_and_state_in_step() {
        let repository = FailingRepository {
            inner: InMemoryEventRepository::new("unit"),
            appends: 0,
            // start emits two events; end_turn's second event fails
            fail_at: 4,
        };
        let config = SessionConfig::new("unit", 3);
        let mut session =
            CombatSession::new(config, repository, ManualClock::new(Timestamp(100))).unwrap();
        let party = [
            session.combatant(CreatureId(1), 2),
            session.combatant(CreatureId(2), 0),
        ];
        session.start_encounter(&party, BTreeSet::new()).unwrap();
        let before = session.state().clone();

        let err = session.end_turn().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Repository(RepositoryError::LockPoisoned)
        ));
        assert_eq!(session.events().unwrap().len(), 2);
        assert_eq!(session.state(), &before);
        assert_eq!(session.rebuild().unwrap(), &before);

        session.end_turn().unwrap();
        assert_eq!(session.events().unwrap().len(), 4);
    }

    #[test]
    fn encounter_carries_configured_default_speed() {
        let config = SessionConfig {
            default_speed: 25,
            ..SessionConfig::new("unit", 3)
        };
        let repository = InMemoryEventRepository::new("unit");
        let mut session =
            CombatSession::new(config, repository, ManualClock::new(Timestamp(100))).unwrap();
        let party = [Combatant::new(CreatureId(1), 0, 40)];
        session.start_encounter(&party, BTreeSet::new()).unwrap();

        assert_eq!(session.state().default_speed, 25);
        assert_eq!(session.state().speed_of(CreatureId(1)), 40);
        assert_eq!(session.state().speed_of(CreatureId(9)), 25);
        assert!(matches!(
            session.events().unwrap()[0].kind,
            CombatEventKind::EncounterStarted { default_speed: 25, .. }
        ));
    }

    #[test]
    fn undo_past_start_is_rejected() {
        let mut session = session(3);
        assert!(matches!(
            session.undo(1),
            Err(SessionError::UndoBeyondStart { requested: 1, len: 0 })
        ));
    }

    #[test]
    fn validate_roster_names_missing_surprised() {
        let combatants = [Combatant::new(CreatureId(1), 0, 30)];
        let err = validate_roster(&combatants, &BTreeSet::from([CreatureId(5)])).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transition(TransitionError::SurprisedNotInOrder { .. })
        ));
    }
}
