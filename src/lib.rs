// Cooperative "pseudo-blocking" waits for single-core firmware (no RTOS)
//
// A wait looks blocking to its caller, but spins a registered pump
// callback so the rest of the main loop keeps running. Re-entry guards
// stop the pump from re-running a section that is itself waiting.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod kernel;
pub mod time;

pub use config::{ConfigError, CoopConfig};
pub use kernel::delay::{CoopDelay, Timeout, WaitError};
pub use kernel::pump::{PumpFn, PumpRegistry, is_pump_set, pump, reset_pump, set_pump};
pub use kernel::reentry::{ReentryGuard, ReentryScope};
pub use kernel::timer::IntervalTimer;
pub use kernel::wait::{WaitDepth, WaitScope, in_wait};
pub use time::{Cycles, FnClock, Monotonic, Tick};
