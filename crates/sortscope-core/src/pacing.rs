//! Access pacing - throttles the worker thread to a watchable rate
//!
//! `PacingGate` keeps a deadline that advances by a fixed delay on every
//! call; the caller sleeps until the wall clock reaches it. Because the
//! deadline accumulates instead of restarting from "now", a caller that
//! was held up elsewhere gets its next waits back immediately until it is
//! on schedule again. Drift never compounds.
//!
//! Only the worker thread is meant to wait on a gate. The deadline sits
//! behind a mutex so the gate can live inside `Send + Sync` hooks, not to
//! make concurrent waiters meaningful.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Deadline accumulator for per-access delays
#[derive(Debug)]
pub struct PacingGate {
    deadline: Mutex<Instant>,
}

impl PacingGate {
    /// Create a gate whose schedule starts now
    pub fn new() -> Self {
        Self {
            deadline: Mutex::new(Instant::now()),
        }
    }

    /// Restart the schedule from the current time
    ///
    /// Call before handing the gate to a worker that should not inherit
    /// backlog (e.g. right before spawning it).
    pub fn reset(&self) {
        *self.lock() = Instant::now();
    }

    /// Advance the deadline by `delay_ms` and sleep until it is reached
    ///
    /// Negative and non-finite delays count as zero.
    pub fn wait(&self, delay_ms: f64) {
        let target = {
            let mut deadline = self.lock();
            *deadline += millis(delay_ms);
            *deadline
        };

        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
    }

    /// Current deadline
    pub fn deadline(&self) -> Instant {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Instant> {
        self.deadline.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PacingGate {
    fn default() -> Self {
        Self::new()
    }
}

fn millis(delay_ms: f64) -> Duration {
    if delay_ms.is_finite() && delay_ms > 0.0 {
        Duration::from_nanos((delay_ms * 1_000_000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_accumulates() {
        let gate = PacingGate::new();
        let start = gate.deadline();
        gate.wait(2.0);
        gate.wait(3.0);
        assert_eq!(gate.deadline() - start, Duration::from_millis(5));
    }

    #[test]
    fn test_wait_blocks_until_deadline() {
        let gate = PacingGate::new();
        let started = Instant::now();
        for _ in 0..5 {
            gate.wait(4.0);
        }
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_late_caller_catches_up_without_extra_delay() {
        let gate = PacingGate::new();
        // Fall 30ms behind schedule
        thread::sleep(Duration::from_millis(30));

        let started = Instant::now();
        for _ in 0..5 {
            gate.wait(5.0);
        }
        // 25ms of delay was already "paid" by the 30ms stall
        assert!(started.elapsed() < Duration::from_millis(20));
    }

    #[test]
    fn test_invalid_delays_are_zero() {
        let gate = PacingGate::new();
        let start = gate.deadline();
        gate.wait(-10.0);
        gate.wait(f64::NAN);
        gate.wait(f64::INFINITY);
        gate.wait(0.0);
        assert_eq!(gate.deadline(), start);
    }

    #[test]
    fn test_reset_drops_backlog() {
        let gate = PacingGate::new();
        thread::sleep(Duration::from_millis(20));
        gate.reset();

        let started = Instant::now();
        gate.wait(10.0);
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
