use std::time::{Duration, Instant};

/// A payload that becomes due after a fixed delay.
///
/// Nothing runs on its own: the owner polls [`Deferred::is_due`] from the event
/// loop and calls [`Deferred::fire`]. Dropping the value cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred<T> {
    deadline: Instant,
    payload: T,
}

impl<T> Deferred<T> {
    pub fn schedule(delay: Duration, payload: T, now: Instant) -> Self {
        Self {
            deadline: now + delay,
            payload,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Time left until the deadline; zero once due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn fire(self) -> T {
        self.payload
    }
}
