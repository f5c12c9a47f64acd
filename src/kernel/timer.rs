//! Interval timer over a wrapping [`Monotonic`] counter.
//!
//! Expiry is `now.wrapping_sub(start) >= duration`, which stays correct
//! across a counter wrap as long as a single interval is shorter than
//! the counter's range (~49 days for a ms counter).

use crate::time::Monotonic;

pub struct IntervalTimer<S: Monotonic> {
    source: S,
    start: u32,
    duration: u32,
}

impl<S: Monotonic> IntervalTimer<S> {
    /// Start a timer for a runtime duration. A duration of 0 is already
    /// expired on the first check.
    pub fn start(source: S, duration: u32) -> Self {
        let start = source.now();
        Self {
            source,
            start,
            duration,
        }
    }

    /// Start a timer for a compile-time duration. `D == 0` fails to build:
    ///
    /// ```compile_fail
    /// use pulp_coop::{FnClock, IntervalTimer};
    ///
    /// fn millis() -> u32 {
    ///     0
    /// }
    ///
    /// let _t = IntervalTimer::fixed::<0>(FnClock(millis));
    /// ```
    pub fn fixed<const D: u32>(source: S) -> Self {
        const { assert!(D > 0, "interval duration must be > 0") };
        Self::start(source, D)
    }

    pub fn elapsed(&self) -> u32 {
        self.source.now().wrapping_sub(self.start)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.duration
    }

    /// Time left, 0 once expired.
    pub fn remaining(&self) -> u32 {
        self.duration.saturating_sub(self.elapsed())
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Re-sample the start point, keeping the duration.
    pub fn restart(&mut self) {
        self.start = self.source.now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    // manual clock: only moves when told to
    struct Manual(Cell<u32>);

    impl Manual {
        fn at(t: u32) -> Self {
            Self(Cell::new(t))
        }

        fn advance(&self, d: u32) {
            self.0.set(self.0.get().wrapping_add(d));
        }
    }

    impl Monotonic for Manual {
        fn now(&self) -> u32 {
            self.0.get()
        }
    }

    #[test]
    fn expires_at_duration() {
        let clock = Manual::at(1000);
        let t = IntervalTimer::start(&clock, 10);
        assert!(!t.is_expired());
        clock.advance(9);
        assert!(!t.is_expired());
        assert_eq!(t.remaining(), 1);
        clock.advance(1);
        assert!(t.is_expired());
        assert_eq!(t.remaining(), 0);
        clock.advance(500);
        assert!(t.is_expired());
    }

    #[test]
    fn zero_duration_expires_immediately() {
        let clock = Manual::at(7);
        let t = IntervalTimer::start(&clock, 0);
        assert!(t.is_expired());
    }

    #[test]
    fn survives_counter_wrap() {
        let clock = Manual::at(u32::MAX - 2);
        let t = IntervalTimer::start(&clock, 5);
        clock.advance(2); // u32::MAX
        assert!(!t.is_expired());
        clock.advance(1); // wrapped to 0
        assert_eq!(clock.now(), 0);
        assert!(!t.is_expired());
        assert_eq!(t.elapsed(), 3);
        clock.advance(2);
        assert!(t.is_expired());
    }

    #[test]
    fn started_at_max_value() {
        let clock = Manual::at(u32::MAX);
        let t = IntervalTimer::fixed::<1>(&clock);
        assert!(!t.is_expired());
        clock.advance(1);
        assert!(t.is_expired());
    }

    #[test]
    fn restart_resamples_start() {
        let clock = Manual::at(0);
        let mut t = IntervalTimer::fixed::<4>(&clock);
        clock.advance(4);
        assert!(t.is_expired());
        t.restart();
        assert!(!t.is_expired());
        assert_eq!(t.duration(), 4);
        clock.advance(4);
        assert!(t.is_expired());
    }
}
