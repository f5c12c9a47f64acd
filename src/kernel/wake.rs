// ISR -> main loop signaling
//
// ISRs must not pump or wait. They set flags and advance the uptime
// counter; the pump callback (main-loop context) consumes the flags.
// Independent flags prevent concurrent sources from swallowing each
// other. Critical section guards riscv32imc (no atomic RMW).
// Uptime is counted in base ticks; the tick weight compensates when
// the timer interrupt is slowed during idle.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::time::Monotonic;

/// One-shot flag set from an ISR, taken from the main loop.
pub struct IsrFlag {
    raised: AtomicBool,
}

impl IsrFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// ISR side.
    #[inline]
    pub fn signal(&self) {
        self.raised.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Main-loop side: test-and-clear.
    pub fn take(&self) -> bool {
        critical_section::with(|_| {
            let raised = self.raised.load(Ordering::Relaxed);
            if raised {
                self.raised.store(false, Ordering::Relaxed);
            }
            raised
        })
    }
}

impl Default for IsrFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Uptime counter advanced from a periodic timer ISR.
///
/// Usable directly as the tick source for [`CoopDelay`]: with a 1 ms
/// timer and weight 1, `now()` is milliseconds since boot.
///
/// [`CoopDelay`]: crate::kernel::delay::CoopDelay
pub struct TickCounter {
    // base ticks per interrupt
    weight: AtomicU32,
    // cs: riscv32imc has no atomic add
    ticks: critical_section::Mutex<Cell<u32>>,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            weight: AtomicU32::new(1),
            ticks: critical_section::Mutex::new(Cell::new(0)),
        }
    }

    /// ISR side: one timer interrupt elapsed.
    #[inline]
    pub fn on_interrupt(&self) {
        let weight = self.weight.load(Ordering::Relaxed);
        critical_section::with(|cs| {
            let ticks = self.ticks.borrow(cs);
            ticks.set(ticks.get().wrapping_add(weight));
        });
    }

    /// Call alongside reprogramming the timer period, e.g. 10 when the
    /// interrupt slows from 10ms to 100ms on a 10ms base tick.
    pub fn set_weight(&self, weight: u32) {
        self.weight.store(weight, Ordering::Release);
    }

    pub fn weight(&self) -> u32 {
        self.weight.load(Ordering::Acquire)
    }

    pub fn ticks(&self) -> u32 {
        critical_section::with(|cs| self.ticks.borrow(cs).get())
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Monotonic for TickCounter {
    #[inline]
    fn now(&self) -> u32 {
        self.ticks()
    }
}
