//! Pump registry.
//!
//! Holds at most one callback, invoked over and over by every wait loop
//! so the application keeps making progress while something "blocks".
//! Registration is last-write-wins; invoking an empty slot is a no-op.
//!
//! # Interrupt context
//!
//! Never call [`pump`] (or any wait) from an ISR. Nothing checks this.
//! ISRs should set a [`crate::kernel::wake::IsrFlag`] and let the pump
//! callback consume it from the main loop.

use core::cell::Cell;

use critical_section::Mutex;
use log::debug;

use crate::time::Tick;

/// Pump callback: `(now_ms, light)`.
///
/// `light` is advisory: the caller is in a tight wait loop and the
/// callback should skip expensive, non-essential work.
pub type PumpFn = fn(Tick, bool);

/// The process-wide pump slot.
pub static PUMP: PumpRegistry = PumpRegistry::new();

pub struct PumpRegistry {
    slot: Mutex<Cell<Option<PumpFn>>>,
}

impl PumpRegistry {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Replace the registered callback.
    pub fn set(&self, f: PumpFn) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Some(f)));
        debug!("pump registered");
    }

    /// Clear the registered callback.
    pub fn reset(&self) {
        critical_section::with(|cs| self.slot.borrow(cs).set(None));
        debug!("pump cleared");
    }

    pub fn is_set(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_some())
    }

    /// Run the callback, if any, on the caller's stack.
    #[inline]
    pub fn pump(&self, now: Tick, light: bool) {
        // copy the pointer out; the callback runs with interrupts enabled
        let f = critical_section::with(|cs| self.slot.borrow(cs).get());
        if let Some(f) = f {
            f(now, light);
        }
    }
}

impl Default for PumpRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn set_pump(f: PumpFn) {
    PUMP.set(f);
}

pub fn reset_pump() {
    PUMP.reset();
}

pub fn is_pump_set() -> bool {
    PUMP.is_set()
}

#[inline]
pub fn pump(now: Tick, light: bool) {
    PUMP.pump(now, light);
}
