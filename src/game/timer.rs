use bevy::prelude::*;

use super::events::TimerEvent;

/// Handle to a scheduled fire-once callback.
///
/// Carries the scheduler epoch it was issued in; once the scheduler is
/// invalidated, the handle can neither fire nor cancel anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
    epoch: u32,
}

#[derive(Debug)]
struct Pending<T> {
    handle: TimerHandle,
    due_ms: f64,
    payload: T,
}

/// Fire-once millisecond timers, advanced by the fixed simulation step.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: f64,
    epoch: u32,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            epoch: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn schedule(&mut self, delay_ms: f32, payload: T) -> TimerHandle {
        let handle = TimerHandle {
            id: self.next_id,
            epoch: self.epoch,
        };
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            due_ms: self.now_ms + f64::from(delay_ms.max(0.0)),
            payload,
        });
        handle
    }

    /// Returns false if the timer already fired, was cancelled, or is stale.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn remaining_ms(&self, handle: TimerHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|p| p.handle == handle)
            .map(|p| (p.due_ms - self.now_ms).max(0.0) as f32)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Drop every pending timer and retire all handles issued so far.
    pub fn invalidate_all(&mut self) {
        self.pending.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Advance the clock and return the payloads that came due,
    /// earliest first (ties in scheduling order).
    pub fn advance(&mut self, dt_ms: f32) -> Vec<T> {
        self.now_ms += f64::from(dt_ms.max(0.0));
        let now = self.now_ms;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| {
            a.due_ms
                .total_cmp(&b.due_ms)
                .then(a.handle.id.cmp(&b.handle.id))
        });
        due.into_iter().map(|p| p.payload).collect()
    }
}

/// Timers owned by the battle: round end, projectile expiry, planning countdown.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct BattleTimers(pub Scheduler<TimerEvent>);
