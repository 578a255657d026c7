//! Cooperative timer queue.
//!
//! Nothing here sleeps. The owner pumps `pop_due` with the current time and
//! runs each fired timer to completion before asking for the next one, so a
//! callback that cancels or schedules timers is seen by the rest of the pump.

use crate::progress_config::DeferredTransition;

pub type TimerId = u64;

/// Which lifetime a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerScope {
    /// Lives until the session is torn down
    Session,
    /// Lives while the period activation with this epoch is current
    Period(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    EngineTick,
    Deferred(DeferredTransition),
    Activate,
    Decay,
    IdleCheck,
    LayoutClear,
    /// Index into the console script
    ConsoleCue(usize),
    ClosingArt,
    CoffeeBrewed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    pub scope: TimerScope,
    pub deadline_ms: u64,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    scope: TimerScope,
    deadline_ms: u64,
    interval_ms: Option<u64>,
}

#[derive(Debug, Default)]
pub struct Timers {
    next_id: TimerId,
    pending: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        kind: TimerKind,
        scope: TimerScope,
        deadline_ms: u64,
        interval_ms: Option<u64>,
    ) -> TimerId {
        self.next_id += 1;
        let id = self.next_id;
        self.pending.push(Timer {
            id,
            kind,
            scope,
            deadline_ms,
            interval_ms,
        });
        id
    }

    /// Fires once, `delay_ms` after `now_ms`.
    pub fn once(
        &mut self,
        kind: TimerKind,
        scope: TimerScope,
        now_ms: u64,
        delay_ms: u64,
    ) -> TimerId {
        self.push(kind, scope, now_ms + delay_ms, None)
    }

    /// Fires every `interval_ms`, first at `now_ms + interval_ms`.
    pub fn every(
        &mut self,
        kind: TimerKind,
        scope: TimerScope,
        now_ms: u64,
        interval_ms: u64,
    ) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.push(kind, scope, now_ms + interval_ms, Some(interval_ms))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancels every period-scoped timer, returning how many were dropped.
    pub fn cancel_period_timers(&mut self) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|t| !matches!(t.scope, TimerScope::Period(_)));
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn count_kind(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|t| t.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|t| t.deadline_ms).min()
    }

    /// Takes the earliest timer due at `now_ms`, ties going to the one
    /// scheduled first. Periodic timers are re-armed; if they fell behind
    /// by more than one interval the missed firings are coalesced.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline_ms <= now_ms)
            .min_by_key(|(_, t)| (t.deadline_ms, t.id))
            .map(|(idx, _)| idx)?;

        let fired = {
            let t = &self.pending[idx];
            Fired {
                id: t.id,
                kind: t.kind,
                scope: t.scope,
                deadline_ms: t.deadline_ms,
            }
        };

        match self.pending[idx].interval_ms {
            Some(interval) => {
                let timer = &mut self.pending[idx];
                let next = timer.deadline_ms + interval;
                timer.deadline_ms = if next <= now_ms { now_ms + interval } else { next };
            }
            None => {
                self.pending.swap_remove(idx);
            }
        }

        Some(fired)
    }
}
