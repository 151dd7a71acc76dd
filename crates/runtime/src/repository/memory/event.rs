//! In-memory event log implementation.

use std::sync::RwLock;

use combat_core::{CombatEvent, SessionId};

use crate::repository::{EventRepository, RepositoryError, Result};

/// In-memory event log for testing and development.
///
/// Thread-safe but not persistent across process restarts.
pub struct InMemoryEventRepository {
    session_id: SessionId,
    events: RwLock<Vec<CombatEvent>>,
}

impl InMemoryEventRepository {
    /// Create a new empty in-memory event log.
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            events: RwLock::new(Vec::new()),
        }
    }

    /// Create a log pre-filled with `events`, all of which must belong to
    /// `session_id`.
    pub fn with_events(session_id: impl Into<SessionId>, events: Vec<CombatEvent>) -> Result<Self> {
        let mut repository = Self::new(session_id);
        repository.append_all(&events)?;
        Ok(repository)
    }
}

impl EventRepository for InMemoryEventRepository {
    fn append(&mut self, event: &CombatEvent) -> Result<usize> {
        if event.session_id != self.session_id {
            return Err(RepositoryError::SessionMismatch {
                expected: self.session_id.clone(),
                actual: event.session_id.clone(),
            });
        }

        let mut events = self
            .events
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        events.push(event.clone());
        Ok(events.len())
    }

    fn read_all(&self) -> Result<Vec<CombatEvent>> {
        let events = self
            .events
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(events.clone())
    }

    fn truncate(&mut self, len: usize) -> Result<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        if len > events.len() {
            return Err(RepositoryError::TruncateBeyondEnd {
                len: events.len(),
                requested: len,
            });
        }
        events.truncate(len);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let events = self
            .events
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(events.len())
    }

    fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}
