//! Explicit scheduling primitives for timed simulation work.
//!
//! The engine never holds closures over ambient state. Periodic work is an
//! [`Interval`] that reports how many whole periods elapsed during a step, and
//! delayed one-shot work is a payload in a [`DeferredQueue`]. Each queue carries
//! a generation token: [`DeferredQueue::invalidate`] bumps it and drops every
//! pending task, so a task scheduled in an earlier generation can never fire.

/// Slack for float accumulation so that ten 0.1 s steps count as one second.
const TIME_EPSILON: f64 = 1e-6;

fn sanitize_dt(dt: f32) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt as f64
    } else {
        0.0
    }
}

// =============================================================================
// Interval
// =============================================================================

/// Fires once per `period` of accumulated time.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period: f64,
    accumulated: f64,
}

impl Interval {
    pub fn new(period: f32) -> Self {
        Self {
            period: (period as f64).max(TIME_EPSILON),
            accumulated: 0.0,
        }
    }

    pub fn period(&self) -> f32 {
        self.period as f32
    }

    /// Time accumulated towards the next firing.
    pub fn accumulated(&self) -> f32 {
        self.accumulated as f32
    }

    /// Time left until the next firing. Always greater than zero.
    pub fn remaining(&self) -> f32 {
        (self.period - self.accumulated).max(TIME_EPSILON) as f32
    }

    /// Change the period, keeping the time already accumulated. If that time
    /// already covers the new period, the next `advance` fires.
    pub fn set_period(&mut self, period: f32) {
        self.period = (period as f64).max(TIME_EPSILON);
    }

    /// Advance by `dt` and return how many periods completed.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulated += sanitize_dt(dt);
        let mut fired = 0;
        while self.accumulated + TIME_EPSILON >= self.period {
            self.accumulated = (self.accumulated - self.period).max(0.0);
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

// =============================================================================
// DeferredQueue
// =============================================================================

/// Identifies one scheduled task. Handles from an older generation are inert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskHandle {
    pub id: u64,
    pub generation: u64,
    /// Queue time at which the task becomes due.
    pub deadline: f32,
}

#[derive(Debug)]
struct Deferred<T> {
    handle: TaskHandle,
    deadline: f64,
    payload: T,
}

/// One-shot delayed payloads, released in deadline order by [`advance`](Self::advance).
#[derive(Debug)]
pub struct DeferredQueue<T> {
    now: f64,
    generation: u64,
    next_id: u64,
    pending: Vec<Deferred<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            generation: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f32 {
        self.now as f32
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate pending payloads with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskHandle, &T)> {
        self.pending.iter().map(|d| (&d.handle, &d.payload))
    }

    /// Schedule `payload` to be released `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, payload: T) -> TaskHandle {
        let deadline = self.now + sanitize_dt(delay);
        let handle = TaskHandle {
            id: self.next_id,
            generation: self.generation,
            deadline: deadline as f32,
        };
        self.next_id += 1;
        self.pending.push(Deferred {
            handle,
            deadline,
            payload,
        });
        handle
    }

    /// Cancel a pending task. Returns `false` if it already fired, was
    /// cancelled, or belongs to an earlier generation.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if handle.generation != self.generation {
            return false;
        }
        let before = self.pending.len();
        self.pending.retain(|d| d.handle.id != handle.id);
        self.pending.len() != before
    }

    /// Start a new generation, dropping every pending task. Returns the number
    /// of tasks dropped.
    pub fn invalidate(&mut self) -> usize {
        self.generation += 1;
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Advance queue time by `dt` and release every task that became due,
    /// ordered by deadline (ties by scheduling order).
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += sanitize_dt(dt);
        let now = self.now;
        let generation = self.generation;

        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|d| d.deadline <= now + TIME_EPSILON);
        self.pending = rest;

        due.retain(|d| d.handle.generation == generation);
        due.sort_by(|a, b| {
            a.deadline
                .total_cmp(&b.deadline)
                .then(a.handle.id.cmp(&b.handle.id))
        });
        due.into_iter().map(|d| d.payload).collect()
    }
}
