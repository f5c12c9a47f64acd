// Cooperative wait core
// Single core, no preemption. A "blocking" wait is a busy loop that
// keeps handing control to the registered pump so the main loop's work
// still gets done. ISRs only set flags (wake); they never pump or wait.
//
// pump:    the process-wide callback slot
// wait:    depth counter answering "are we inside any wait loop?"
// timer:   wrap-safe interval timer over a Monotonic source
// delay:   delay / wait-until loops built from the three above
// reentry: per-call-site / per-instance recursion guards

pub mod delay;
pub mod pump;
pub mod reentry;
pub mod timer;
pub mod wait;
pub mod wake;

pub use delay::CoopDelay;
pub use pump::{PUMP, PumpRegistry};
pub use reentry::{ReentryGuard, ReentryScope};
pub use timer::IntervalTimer;
pub use wait::{WAIT_DEPTH, WaitDepth};
