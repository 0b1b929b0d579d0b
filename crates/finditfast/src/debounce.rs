//! Debounce timer
//!
//! Single-slot timeout driven by caller-supplied instants. Scheduling
//! replaces whatever was pending, so only the last payload of a burst fires.

use std::time::{Duration, Instant};

/// Pending payload and its deadline
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `payload` to fire `delay` after `now`.
    ///
    /// Returns true if an earlier payload was superseded.
    pub fn schedule(&mut self, payload: T, now: Instant) -> bool {
        self.pending.replace((payload, now + self.delay)).is_some()
    }

    /// Drop the pending payload, if any
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(payload, _)| payload)
    }

    /// Take the payload once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.cancel(),
            _ => None,
        }
    }

    /// When the pending payload fires
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
