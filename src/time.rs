//! Time-source seam.
//!
//! The cooperative core never owns a clock. It samples whatever
//! monotonic counter the board provides: a SysTick-driven millisecond
//! counter, a cycle counter, or the esp-hal systimer on the X4.
//!
//! Counters are free-running `u32`s and are expected to wrap. Every
//! consumer compares samples with `wrapping_sub`, never with `<`.

/// Millisecond tick sample.
pub type Tick = u32;

/// Cycle (or other high-resolution) counter sample.
pub type Cycles = u32;

/// A monotonic, wrapping counter.
///
/// Units are fixed per implementation (ms for tick sources, CPU cycles
/// or µs for cycle sources). Implementations must not block.
pub trait Monotonic {
    fn now(&self) -> u32;
}

impl<M: Monotonic + ?Sized> Monotonic for &M {
    #[inline]
    fn now(&self) -> u32 {
        (**self).now()
    }
}

/// Adapter for a bare `fn() -> u32`, e.g. an ISR-maintained `millis()`.
#[derive(Debug, Clone, Copy)]
pub struct FnClock(pub fn() -> u32);

impl Monotonic for FnClock {
    #[inline]
    fn now(&self) -> u32 {
        (self.0)()
    }
}

#[cfg(feature = "esp32c3")]
pub mod esp {
    // esp-hal systimer backed sources. The systimer is 52-bit; we hand
    // out the low 32 bits and let the wrapping arithmetic do the rest.

    use esp_hal::time::Instant;

    use super::Monotonic;

    /// Milliseconds since boot, truncated to 32 bits (wraps after ~49 days).
    #[derive(Debug, Clone, Copy, Default)]
    pub struct EspMillis;

    impl Monotonic for EspMillis {
        #[inline]
        fn now(&self) -> u32 {
            Instant::now().duration_since_epoch().as_millis() as u32
        }
    }

    /// Microseconds since boot, truncated to 32 bits (wraps after ~71 min).
    /// Use as the cycle source with `CoopConfig::with_cycle_hz(1_000_000)`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct EspMicros;

    impl Monotonic for EspMicros {
        #[inline]
        fn now(&self) -> u32 {
            Instant::now().duration_since_epoch().as_micros() as u32
        }
    }
}
