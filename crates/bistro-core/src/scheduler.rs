//! Timer tasks on a virtual millisecond clock.
//!
//! Tasks are kept in a min-heap ordered by fire time, then by insertion
//! order, so two tasks due at the same instant fire in the order they were
//! scheduled. Each task carries a [`Guard`] that the engine evaluates when
//! the task fires; a failed guard drops the task silently.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use bistro_logic::orders::Dish;
use serde::{Deserialize, Serialize};

/// Work the engine performs when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// First arrival of a table's customer.
    SpawnCustomer { table: usize },
    /// Bring a customer back after leaving.
    RespawnCustomer { table: usize },
    /// The oven finished.
    CookComplete { dish: Dish },
    /// Recurring order-generation pass.
    OrderTick,
    /// Recurring save.
    Autosave,
}

/// Condition checked at fire time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guard {
    Always,
    /// The table's customer is hidden and not yet spawned.
    CustomerHidden { table: usize },
    /// The customer is still not waiting and `token` is still its pending
    /// respawn.
    RespawnPending { table: usize, token: u64 },
}

/// A scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub fire_at: u64,
    pub seq: u64,
    pub task: Task,
    pub guard: Guard,
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fire_at, self.seq).cmp(&(other.fire_at, other.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Virtual clock plus pending timers.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Timer>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Schedule `task` to fire `delay_ms` after now.
    pub fn schedule(&mut self, delay_ms: u64, task: Task, guard: Guard) {
        self.schedule_at(self.now_ms.saturating_add(delay_ms), task, guard);
    }

    /// Schedule `task` at an absolute time (clamped to now).
    pub fn schedule_at(&mut self, fire_at: u64, task: Task, guard: Guard) {
        let timer = Timer {
            fire_at: fire_at.max(self.now_ms),
            seq: self.next_seq,
            task,
            guard,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(timer));
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its fire time.
    pub fn pop_due(&mut self, until: u64) -> Option<Timer> {
        let due = matches!(self.queue.peek(), Some(Reverse(t)) if t.fire_at <= until);
        if !due {
            return None;
        }
        let Reverse(timer) = self.queue.pop()?;
        self.now_ms = self.now_ms.max(timer.fire_at);
        Some(timer)
    }

    /// Move the clock forward. Never moves backwards.
    pub fn advance_to(&mut self, time_ms: u64) {
        self.now_ms = self.now_ms.max(time_ms);
    }

    /// Pending timers in firing order.
    pub fn pending(&self) -> Vec<Timer> {
        let mut timers: Vec<Timer> = self.queue.iter().map(|Reverse(t)| *t).collect();
        timers.sort();
        timers
    }

    /// Number of pending timers matching `pred`.
    pub fn count(&self, pred: impl Fn(&Timer) -> bool) -> usize {
        self.queue.iter().filter(|Reverse(t)| pred(t)).count()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Rebuild from a saved clock and timer list.
    pub fn restore(now_ms: u64, timers: Vec<Timer>) -> Self {
        let next_seq = timers.iter().map(|t| t.seq + 1).max().unwrap_or(0);
        Self {
            now_ms,
            next_seq,
            queue: timers.into_iter().map(Reverse).collect(),
        }
    }
}
