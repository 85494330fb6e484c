//! Deadline clock
//!
//! The engine only asks "how long since the run started"; tests drive it with
//! `ManualClock` so timeouts are reproducible.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic elapsed-time source
pub trait Clock {
    /// Milliseconds since the clock was created
    fn elapsed_ms(&self) -> u64;
}

/// Wall clock started at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Test clock: fixed time, optionally advancing on every read
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
    step_ms: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that advances `step_ms` after each read
    pub fn ticking(step_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(0),
            step_ms,
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn elapsed_ms(&self) -> u64 {
        let now = self.now_ms.get();
        self.now_ms.set(now.saturating_add(self.step_ms));
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed_ms(&self) -> u64 {
        (**self).elapsed_ms()
    }
}
