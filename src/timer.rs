//! Cancellable one-shot timers driven by an explicit millisecond clock.
//!
//! Nothing here reads wall time: the owner passes `now` in (a simulated clock
//! in tests, `performance.now()` in the browser). Every timer carries a scope
//! value naming the state that started it so leaving that state can cancel
//! exactly its timers.

/// Handle returned by [`TimerQueue::schedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<S> {
    id: TimerId,
    due_ms: f64,
    scope: S,
}

/// A fired timer: its scope and the instant it was due (not the instant it
/// was observed), so follow-up timers can be chained without drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fired<S> {
    pub id: TimerId,
    pub due_ms: f64,
    pub scope: S,
}

#[derive(Debug)]
pub struct TimerQueue<S> {
    next_id: u64,
    pending: Vec<Pending<S>>,
}

impl<S> Default for TimerQueue<S> {
    fn default() -> Self {
        Self { next_id: 0, pending: Vec::new() }
    }
}

impl<S: Copy + PartialEq> TimerQueue<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer firing `delay_ms` after `now`.
    pub fn schedule(&mut self, now: f64, delay_ms: f64, scope: S) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due_ms: now + delay_ms.max(0.0), scope });
        id
    }

    /// Returns true when the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    /// Drop every pending timer started in `scope`.
    pub fn cancel_scope(&mut self, scope: S) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.scope != scope);
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn has_scope(&self, scope: S) -> bool {
        self.pending.iter().any(|p| p.scope == scope)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the earliest timer due at or before `now`. Ties fire
    /// in scheduling order.
    pub fn pop_due(&mut self, now: f64) -> Option<Fired<S>> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= now)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then(a.id.0.cmp(&b.id.0))
            })
            .map(|(i, _)| i)?;
        let p = self.pending.remove(idx);
        Some(Fired { id: p.id, due_ms: p.due_ms, scope: p.scope })
    }
}
