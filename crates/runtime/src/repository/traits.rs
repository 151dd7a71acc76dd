//! Repository contracts for the combat event log.

use combat_core::{CombatEvent, SessionId};

use super::Result;

/// Append-only event log for one session.
///
/// The log is the only persisted form of combat state: the runtime rebuilds
/// [`RoundState`](combat_core::RoundState) from it on undo, rebuild and
/// resume. Implementations must reject events stamped with another session.
pub trait EventRepository: Send + Sync {
    /// Append an event to the log.
    ///
    /// Returns the log length after the append.
    fn append(&mut self, event: &CombatEvent) -> Result<usize>;

    /// Append events in order as one batch.
    ///
    /// On the first failure the log is truncated back to its length before
    /// the call and that failure is returned.
    fn append_all(&mut self, events: &[CombatEvent]) -> Result<usize> {
        let start = self.len()?;
        let mut len = start;
        for event in events {
            match self.append(event) {
                Ok(after) => len = after,
                Err(error) => {
                    self.truncate(start)?;
                    return Err(error);
                }
            }
        }
        Ok(len)
    }

    /// Every event in log order.
    fn read_all(&self) -> Result<Vec<CombatEvent>>;

    /// Drop every event from index `len` onwards.
    fn truncate(&mut self, len: usize) -> Result<()>;

    /// Number of events in the log.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Get the session ID associated with this log
    fn session_id(&self) -> &SessionId;
}
