//! Single-queue timer table keyed by timer kind.
//!
//! Scheduling a kind replaces whatever was pending for that kind, so a timer
//! can never stack. Handlers re-check their own precondition at fire time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every delayed transition the console knows about.
///
/// Declaration order breaks ties between timers due at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerKind {
    /// Next accelerating temperature step.
    TempStep,
    /// Sustained danger ends in core loss.
    Explosion,
    /// Sustained threshold hold advances the phase.
    StabilityAdvance,
    /// Sustained over-power at the overload phase resets the reactor.
    OverloadReset,
    /// Environmental gate hold advances the gated phase.
    EnvGateAdvance,
    /// Oxygen stepper.
    OxygenStep,
    /// Hull stress stepper.
    HullStep,
    /// Shield random walk.
    ShieldStep,
}

/// Pending timers, at most one per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: BTreeMap<TimerKind, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` at `due_ms`, replacing any pending entry of that kind.
    pub fn schedule(&mut self, kind: TimerKind, due_ms: u64) {
        if let Some(previous) = self.pending.insert(kind, due_ms) {
            log::trace!("timer {kind:?} rescheduled {previous} -> {due_ms}");
        } else {
            log::trace!("timer {kind:?} scheduled at {due_ms}");
        }
    }

    /// Cancel `kind`. Returns whether anything was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let removed = self.pending.remove(&kind).is_some();
        if removed {
            log::trace!("timer {kind:?} cancelled");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.contains_key(&kind)
    }

    pub fn due_at(&self, kind: TimerKind) -> Option<u64> {
        self.pending.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending timer, if any.
    pub fn next_due(&self) -> Option<(TimerKind, u64)> {
        self.pending
            .iter()
            .map(|(kind, due)| (*kind, *due))
            .min_by_key(|(kind, due)| (*due, *kind))
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerKind, u64)> {
        let (kind, due) = self.next_due()?;
        if due > now_ms {
            return None;
        }
        self.pending.remove(&kind);
        Some((kind, due))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_replaces_same_kind() {
        let mut s = Scheduler::new();
        s.schedule(TimerKind::Explosion, 1_000);
        s.schedule(TimerKind::Explosion, 5_000);
        assert_eq!(s.len(), 1);
        assert_eq!(s.due_at(TimerKind::Explosion), Some(5_000));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut s = Scheduler::new();
        s.schedule(TimerKind::HullStep, 10);
        assert!(s.cancel(TimerKind::HullStep));
        assert!(!s.cancel(TimerKind::HullStep));
        assert!(s.is_empty());
    }

    #[test]
    fn test_pop_due_in_time_order() {
        let mut s = Scheduler::new();
        s.schedule(TimerKind::ShieldStep, 300);
        s.schedule(TimerKind::OxygenStep, 100);
        s.schedule(TimerKind::HullStep, 200);

        assert_eq!(s.pop_due(250), Some((TimerKind::OxygenStep, 100)));
        assert_eq!(s.pop_due(250), Some((TimerKind::HullStep, 200)));
        assert_eq!(s.pop_due(250), None);
        assert!(s.is_pending(TimerKind::ShieldStep));
    }

    #[test]
    fn test_ties_break_by_kind_order() {
        let mut s = Scheduler::new();
        s.schedule(TimerKind::OverloadReset, 500);
        s.schedule(TimerKind::TempStep, 500);
        assert_eq!(s.pop_due(500), Some((TimerKind::TempStep, 500)));
        assert_eq!(s.pop_due(500), Some((TimerKind::OverloadReset, 500)));
    }
}
