// Shared test fixtures

#![allow(dead_code)]

use core::sync::atomic::{AtomicU32, Ordering};

use pulp_coop::Monotonic;

/// Deterministic clock: each sample returns the current value, then
/// advances it by `step` (wrapping).
pub struct SimClock {
    now: AtomicU32,
    step: u32,
}

impl SimClock {
    pub const fn new(start: u32, step: u32) -> Self {
        Self {
            now: AtomicU32::new(start),
            step,
        }
    }

    /// Read without advancing.
    pub fn peek(&self) -> u32 {
        self.now.load(Ordering::Relaxed)
    }
}

impl Monotonic for SimClock {
    fn now(&self) -> u32 {
        self.now.fetch_add(self.step, Ordering::Relaxed)
    }
}

/// Counter for observations from inside pump callbacks.
pub struct Hits(AtomicU32);

impl Hits {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn max(&self, v: u32) {
        self.0.fetch_max(v, Ordering::Relaxed);
    }
}
