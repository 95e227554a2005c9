//! Deadline timers polled against the [`roster_states::Time`] state.
//!
//! Nothing here owns an OS timer. A timer is a deadline; the frame loop polls
//! it with the current time, and dropping or cancelling it is all the cleanup
//! there is.

use chrono::{DateTime, TimeDelta, Utc};

/// Quiet period before typed search text is applied.
pub const SEARCH_DEBOUNCE: TimeDelta = TimeDelta::milliseconds(300);

/// Holds back a value until no newer value arrived for `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    delay: TimeDelta,
    pending: Option<(T, DateTime<Utc>)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: TimeDelta) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and push the deadline to `now + delay`.
    pub fn schedule(&mut self, value: T, now: DateTime<Utc>) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value once its deadline passed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
