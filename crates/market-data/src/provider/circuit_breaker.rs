//! Cooldown circuit breaker for abuse-rate blocking.
//!
//! A single blocked-until deadline per breaker instance. Once tripped, all
//! guarded calls short-circuit until the deadline elapses; the state then
//! self-clears on the next check. The breaker is in-memory and resets on
//! process restart.
//!
//! Concurrent trips are last-writer-wins: the worst case is a slightly
//! longer cooldown, which is harmless for this use.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::warn;

/// Single-deadline circuit breaker.
pub struct CircuitBreaker {
    blocked_until: Mutex<Option<Instant>>,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self {
            blocked_until: Mutex::new(None),
        }
    }

    /// Lock the deadline, recovering from poison if necessary. Worst case
    /// after recovery is slightly stale breaker state, which beats
    /// panicking.
    fn lock(&self) -> MutexGuard<'_, Option<Instant>> {
        self.blocked_until.lock().unwrap_or_else(|poisoned| {
            warn!("Circuit breaker mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Check whether calls are currently blocked.
    ///
    /// An expired deadline is cleared as a side effect.
    pub fn is_open(&self) -> bool {
        let mut guard = self.lock();
        match *guard {
            Some(deadline) if Instant::now() < deadline => true,
            Some(_) => {
                *guard = None;
                false
            }
            None => false,
        }
    }

    /// Open the circuit for `cooldown` from now.
    pub fn trip(&self, cooldown: Duration) {
        *self.lock() = Some(Instant::now() + cooldown);
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}
