//! Cooperative delay / wait-until engine.
//!
//! Every loop here does the same three things: enter a [`WaitScope`],
//! start an [`IntervalTimer`], and pump until the exit condition holds.
//! The pump always receives the millisecond tick and `light = true`.
//!
//! Conditional loops check in this order: condition, then timeout,
//! then pump. A condition that is already true succeeds even with a
//! timeout of 0, and never pumps.
//!
//! The engine does not stop a wait from being re-entered through the
//! pump. Waits started from inside the pump are legal and nest; callers
//! that must not re-run themselves wrap their body in a
//! [`ReentryGuard`](crate::kernel::reentry::ReentryGuard).
//!
//! ```ignore
//! let delay = CoopDelay::new(FnClock(systick::millis), FnClock(dwt::cycles));
//! delay.delay_ms(20);
//! if !delay.wait_until(|| BUSY.is_low(), 500) {
//!     // timed out; recovery is up to the caller
//! }
//! ```

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::config::{ConfigError, CoopConfig};
use crate::kernel::pump::{PUMP, PumpRegistry};
use crate::kernel::timer::IntervalTimer;
use crate::kernel::wait::{WAIT_DEPTH, WaitDepth};
use crate::time::{Cycles, Monotonic, Tick};

// longest single cycle interval we hand to a timer; anything longer is
// split so a slow pump can't let the counter lap the start sample
const MAX_CYCLE_CHUNK: u64 = (u32::MAX / 2) as u64;

/// A wait that ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout;

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wait timed out")
    }
}

/// Outcome of [`CoopDelay::block_nb`] when it doesn't produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError<E> {
    Timeout,
    Other(E),
}

impl<E: fmt::Display> fmt::Display for WaitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitError::Timeout => write!(f, "wait timed out"),
            WaitError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl<E> From<Timeout> for WaitError<E> {
    fn from(_: Timeout) -> Self {
        WaitError::Timeout
    }
}

pub struct CoopDelay<'r, T: Monotonic, C: Monotonic> {
    ticks: T,
    cycles: C,
    pump: &'r PumpRegistry,
    waits: &'r WaitDepth,
    config: CoopConfig,
}

impl<T: Monotonic, C: Monotonic> CoopDelay<'static, T, C> {
    /// Engine bound to the process-wide pump and wait depth.
    pub fn new(ticks: T, cycles: C) -> Self {
        Self::with_context(ticks, cycles, &PUMP, &WAIT_DEPTH)
    }
}

impl<'r, T: Monotonic, C: Monotonic> CoopDelay<'r, T, C> {
    /// Engine bound to an explicit registry and depth counter.
    pub fn with_context(
        ticks: T,
        cycles: C,
        pump: &'r PumpRegistry,
        waits: &'r WaitDepth,
    ) -> Self {
        Self {
            ticks,
            cycles,
            pump,
            waits,
            config: CoopConfig::new(),
        }
    }

    pub fn with_config(mut self, config: CoopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &CoopConfig {
        &self.config
    }

    /// Sample the tick source and pump once (for hand-rolled wait loops).
    #[inline]
    pub fn pump(&self, light: bool) {
        self.pump.pump(self.ticks.now(), light);
    }

    /// Is any wait on this engine's depth counter live?
    pub fn in_wait(&self) -> bool {
        self.waits.in_wait()
    }

    /// Pump for at least `ms` milliseconds. `0` returns without pumping.
    pub fn delay_ms(&self, ms: Tick) {
        let timer = IntervalTimer::start(&self.ticks, ms);
        self.spin(&timer);
    }

    /// Compile-time duration; `MS == 0` is rejected at build time.
    ///
    /// ```compile_fail
    /// use pulp_coop::{CoopDelay, FnClock};
    ///
    /// fn millis() -> u32 {
    ///     0
    /// }
    ///
    /// let delay = CoopDelay::new(FnClock(millis), FnClock(millis));
    /// delay.delay_ms_fixed::<0>();
    /// ```
    pub fn delay_ms_fixed<const MS: Tick>(&self) {
        let timer = IntervalTimer::fixed::<MS>(&self.ticks);
        self.spin(&timer);
    }

    /// Pump for at least `n` cycles of the cycle source.
    pub fn delay_cycles(&self, n: Cycles) {
        let timer = IntervalTimer::start(&self.cycles, n);
        self.spin(&timer);
    }

    pub fn delay_cycles_fixed<const N: Cycles>(&self) {
        let timer = IntervalTimer::fixed::<N>(&self.cycles);
        self.spin(&timer);
    }

    /// Pump until `ready()` holds or `timeout_ms` passes.
    /// Returns `false` on timeout.
    pub fn wait_until<P: FnMut() -> bool>(&self, mut ready: P, timeout_ms: Tick) -> bool {
        let timer = IntervalTimer::start(&self.ticks, timeout_ms);
        self.poll(&timer, || ready().then_some(())).is_some()
    }

    pub fn wait_until_fixed<const MS: Tick, P: FnMut() -> bool>(&self, mut ready: P) -> bool {
        let timer = IntervalTimer::fixed::<MS>(&self.ticks);
        self.poll(&timer, || ready().then_some(())).is_some()
    }

    /// [`wait_until`](Self::wait_until) for `?` call sites.
    pub fn try_wait_until<P: FnMut() -> bool>(
        &self,
        ready: P,
        timeout_ms: Tick,
    ) -> Result<(), Timeout> {
        if self.wait_until(ready, timeout_ms) {
            Ok(())
        } else {
            Err(Timeout)
        }
    }

    /// Cooperative `nb::block!`: retry `op` while it reports
    /// `WouldBlock`, pumping between attempts.
    pub fn block_nb<R, E, F>(&self, timeout_ms: Tick, mut op: F) -> Result<R, WaitError<E>>
    where
        F: FnMut() -> nb::Result<R, E>,
    {
        let timer = IntervalTimer::start(&self.ticks, timeout_ms);
        let done = self.poll(&timer, || match op() {
            Ok(v) => Some(Ok(v)),
            Err(nb::Error::Other(e)) => Some(Err(WaitError::Other(e))),
            Err(nb::Error::WouldBlock) => None,
        });
        done.unwrap_or(Err(WaitError::Timeout))
    }

    fn spin<S: Monotonic>(&self, timer: &IntervalTimer<S>) {
        let _wait = self.waits.enter();
        while !timer.is_expired() {
            self.pump.pump(self.ticks.now(), true);
        }
    }

    fn poll<S: Monotonic, R>(
        &self,
        timer: &IntervalTimer<S>,
        mut step: impl FnMut() -> Option<R>,
    ) -> Option<R> {
        let _wait = self.waits.enter();
        loop {
            if let Some(r) = step() {
                return Some(r);
            }
            if timer.is_expired() {
                return None;
            }
            self.pump.pump(self.ticks.now(), true);
        }
    }

    fn delay_cycles_wide(&self, mut n: u64) {
        while n > 0 {
            let chunk = n.min(MAX_CYCLE_CHUNK);
            self.delay_cycles(chunk as Cycles);
            n -= chunk;
        }
    }
}

// HAL drivers taking `impl DelayNs` get a pumping delay for free.
impl<T: Monotonic, C: Monotonic> DelayNs for CoopDelay<'_, T, C> {
    fn delay_ns(&mut self, ns: u32) {
        let n = self.config.ns_to_cycles(ns);
        self.delay_cycles_wide(n);
    }

    fn delay_us(&mut self, us: u32) {
        let n = self.config.us_to_cycles(us);
        self.delay_cycles_wide(n);
    }

    fn delay_ms(&mut self, ms: u32) {
        CoopDelay::delay_ms(self, ms);
    }
}
