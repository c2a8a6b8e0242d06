use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Identifier of one armed one-shot callback.
///
/// Ids are never reused within a queue, so a stale id can always be told apart
/// from a freshly armed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickId(u64);

impl TickId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One-shot timer service provided by the host event loop.
pub trait TimerService {
    /// Arms a callback that fires once after `after` has elapsed.
    fn arm(&mut self, after: Duration) -> TickId;
    /// Removes an armed callback. Returns false when it already fired or was
    /// never armed. A cancelled callback never fires.
    fn cancel(&mut self, id: TickId) -> bool;
    fn is_armed(&self, id: TickId) -> bool;
}

/// Deadline-ordered one-shot timers driven by an external loop.
///
/// The loop asks for [`TimerQueue::next_deadline`] to decide how long to sleep and
/// collects expired ids with [`TimerQueue::take_due`].
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: BTreeMap<TickId, Instant>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a timer relative to an explicit `now`.
    pub fn arm_at(&mut self, now: Instant, after: Duration) -> TickId {
        self.next_id += 1;
        let id = TickId(self.next_id);
        self.pending.insert(id, now + after);
        tracing::trace!(tick = id.0, after_ms = after.as_millis() as u64, "timer armed");
        id
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Removes and returns every timer whose deadline is at or before `now`,
    /// earliest deadline first (ties broken by arm order).
    pub fn take_due(&mut self, now: Instant) -> Vec<TickId> {
        let mut due: Vec<(Instant, TickId)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort_unstable();
        for (_, id) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl TimerService for TimerQueue {
    fn arm(&mut self, after: Duration) -> TickId {
        self.arm_at(Instant::now(), after)
    }

    fn cancel(&mut self, id: TickId) -> bool {
        let removed = self.pending.remove(&id).is_some();
        if removed {
            tracing::trace!(tick = id.0, "timer cancelled");
        }
        removed
    }

    fn is_armed(&self, id: TickId) -> bool {
        self.pending.contains_key(&id)
    }
}
