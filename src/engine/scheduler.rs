use std::collections::BTreeMap;

use log::debug;

use crate::lesson::SlideIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// correct quiz answer: hide feedback, then settle
    AutoAdvance,
    /// feedback hidden: move to the next slide
    Settle,
    HideFeedback,
    ResetAnswer,
}

impl TimerKind {
    /// `AutoAdvance` and `Settle` are the two steps of one auto-progression.
    pub fn is_transition(self) -> bool {
        matches!(self, TimerKind::AutoAdvance | TimerKind::Settle)
    }
}

/// Engine-owned table of delayed callbacks.
///
/// One deadline per `(identity, kind)`: scheduling over an existing entry
/// replaces it, and a slide never holds more than one auto-progression step.
/// Nothing fires on its own; the owner polls [`Scheduler::pop_due`] from its
/// tick, so clearing the table is all it takes to drop every callback.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: BTreeMap<(SlideIdentity, TimerKind), u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when an earlier deadline for the same key was replaced.
    pub fn schedule(
        &mut self,
        identity: &SlideIdentity,
        kind: TimerKind,
        deadline_ms: u64,
    ) -> bool {
        if kind.is_transition() {
            let other = match kind {
                TimerKind::AutoAdvance => TimerKind::Settle,
                _ => TimerKind::AutoAdvance,
            };
            self.pending.remove(&(identity.clone(), other));
        }

        let replaced = self
            .pending
            .insert((identity.clone(), kind), deadline_ms)
            .is_some();
        debug!(
            "timer: schedule identity={} kind={:?} deadline_ms={} replaced={}",
            identity, kind, deadline_ms, replaced
        );
        replaced
    }

    pub fn cancel(&mut self, identity: &SlideIdentity, kind: TimerKind) -> bool {
        let canceled = self.pending.remove(&(identity.clone(), kind)).is_some();
        if canceled {
            debug!("timer: cancel identity={} kind={:?}", identity, kind);
        }
        canceled
    }

    /// Cancels the pending auto-progression of `identity`, whichever step it is in.
    pub fn cancel_transition(&mut self, identity: &SlideIdentity) -> bool {
        let advance = self.cancel(identity, TimerKind::AutoAdvance);
        let settle = self.cancel(identity, TimerKind::Settle);
        advance || settle
    }

    pub fn cancel_slide(&mut self, identity: &SlideIdentity) {
        self.pending.retain(|(id, _), _| id != identity);
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        if count > 0 {
            debug!("timer: cancel all count={}", count);
        }
        count
    }

    pub fn pending_transitions(&self, identity: &SlideIdentity) -> usize {
        self.pending
            .keys()
            .filter(|(id, kind)| id == identity && kind.is_transition())
            .count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.values().copied().min()
    }

    /// Removes and returns the earliest timer due at `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(SlideIdentity, TimerKind, u64)> {
        let (key, deadline) = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now_ms)
            .min_by_key(|(_, deadline)| **deadline)
            .map(|(key, deadline)| (key.clone(), *deadline))?;

        self.pending.remove(&key);
        let (identity, kind) = key;
        debug!(
            "timer: fire identity={} kind={:?} deadline_ms={} now_ms={}",
            identity, kind, deadline, now_ms
        );
        Some((identity, kind, deadline))
    }
}
