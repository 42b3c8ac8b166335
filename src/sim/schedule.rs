//! Deferred events keyed by simulation tick
//!
//! At most one pending entry exists per [`TimerKind`]: scheduling a kind again
//! replaces the earlier entry, so a renewed buff restarts its timer and a stale expiry
//! can never fire after a restart.

use serde::{Deserialize, Serialize};

/// Kinds of deferred events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    GrowExpiry,
    InvincibilityExpiry,
    FlightExpiry,
    /// One-off shark shortly after a run starts
    FirstShark,
    /// End of the falling animation
    FallingDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    kind: TimerKind,
    due: u64,
}

/// Pending deferred events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    entries: Vec<Entry>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` at tick `due`, replacing any pending entry of the same kind
    pub fn schedule(&mut self, kind: TimerKind, due: u64) {
        self.cancel(kind);
        self.entries.push(Entry { kind, due });
    }

    /// Drop a pending entry; returns whether one existed
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != kind);
        self.entries.len() != before
    }

    pub fn due_at(&self, kind: TimerKind) -> Option<u64> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| e.due)
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.due_at(kind).is_some()
    }

    /// Remove and return the earliest entry due at or before `now`
    ///
    /// Ties resolve in scheduling order.
    pub fn pop_due(&mut self, now: u64) -> Option<TimerKind> {
        let (idx, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(i, e)| (e.due, *i))?;
        Some(self.entries.remove(idx).kind)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reschedule_replaces() {
        let mut s = Schedule::new();
        s.schedule(TimerKind::GrowExpiry, 300);
        s.schedule(TimerKind::GrowExpiry, 500);
        assert_eq!(s.len(), 1);
        assert_eq!(s.due_at(TimerKind::GrowExpiry), Some(500));
        assert_eq!(s.pop_due(300), None);
        assert_eq!(s.pop_due(500), Some(TimerKind::GrowExpiry));
        assert!(s.is_empty());
    }

    #[test]
    fn test_pop_due_in_order() {
        let mut s = Schedule::new();
        s.schedule(TimerKind::FlightExpiry, 120);
        s.schedule(TimerKind::GrowExpiry, 100);
        s.schedule(TimerKind::InvincibilityExpiry, 120);
        assert_eq!(s.pop_due(200), Some(TimerKind::GrowExpiry));
        assert_eq!(s.pop_due(200), Some(TimerKind::FlightExpiry));
        assert_eq!(s.pop_due(200), Some(TimerKind::InvincibilityExpiry));
        assert_eq!(s.pop_due(200), None);
    }

    #[test]
    fn test_cancel() {
        let mut s = Schedule::new();
        s.schedule(TimerKind::FirstShark, 60);
        assert!(s.cancel(TimerKind::FirstShark));
        assert!(!s.cancel(TimerKind::FirstShark));
        assert_eq!(s.pop_due(1_000), None);
    }
}
