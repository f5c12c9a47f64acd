// Delay / wait-until behavior against a simulated clock

mod common;

use common::{Hits, SimClock};
use pulp_coop::kernel::wake::{IsrFlag, TickCounter};
use pulp_coop::{CoopDelay, IntervalTimer, PumpRegistry, Tick, WaitDepth};

#[test]
fn delay_spans_counter_wrap() {
    static CLOCK: SimClock = SimClock::new(u32::MAX - 3, 1);
    static PUMP: PumpRegistry = PumpRegistry::new();
    static WAITS: WaitDepth = WaitDepth::new();
    static PUMPS: Hits = Hits::new();

    fn app(_: Tick, _: bool) {
        PUMPS.hit();
    }

    PUMP.set(app);
    let start = CLOCK.peek();
    CoopDelay::with_context(&CLOCK, &CLOCK, &PUMP, &WAITS).delay_ms(16);

    // the counter wrapped mid-wait and the delay still ended
    assert!(CLOCK.peek() < start);
    assert!(CLOCK.peek().wrapping_sub(start) >= 16);
    assert!(PUMPS.get() >= 1);
}

#[test]
fn timer_at_max_value_expires_after_wrap() {
    static CLOCK: SimClock = SimClock::new(u32::MAX, 0);
    let t = IntervalTimer::start(&CLOCK, 1);
    assert!(!t.is_expired());

    static WRAPPED: SimClock = SimClock::new(u32::MAX, 1);
    let t = IntervalTimer::start(&WRAPPED, 1);
    // first check samples 0 after the wrap
    assert!(t.is_expired());
}

#[test]
fn pump_sees_current_tick_and_light_hint() {
    static CLOCK: SimClock = SimClock::new(1000, 1);
    static PUMP: PumpRegistry = PumpRegistry::new();
    static WAITS: WaitDepth = WaitDepth::new();
    static HEAVY: Hits = Hits::new();
    static LAST: Hits = Hits::new();

    fn app(now: Tick, light: bool) {
        if !light {
            HEAVY.hit();
        }
        LAST.max(now);
    }

    PUMP.set(app);
    let delay = CoopDelay::with_context(&CLOCK, &CLOCK, &PUMP, &WAITS);
    delay.delay_ms(5);
    assert!(!delay.wait_until(|| false, 5));
    assert_eq!(HEAVY.get(), 0);
    assert!(LAST.get() > 1000);

    // a hand-rolled loop may ask for the full pump
    delay.pump(false);
    assert_eq!(HEAVY.get(), 1);
}

#[test]
fn wait_until_is_bounded_by_timeout() {
    static CLOCK: SimClock = SimClock::new(0, 1);
    static PUMP: PumpRegistry = PumpRegistry::new();
    static WAITS: WaitDepth = WaitDepth::new();
    static PUMPS: Hits = Hits::new();

    fn app(_: Tick, _: bool) {
        PUMPS.hit();
    }

    PUMP.set(app);
    let delay = CoopDelay::with_context(&CLOCK, &CLOCK, &PUMP, &WAITS);
    assert!(!delay.wait_until(|| false, 50));
    // two samples per iteration: at most one pump per 2 ms of timeout
    assert!(PUMPS.get() <= 25);
    assert!(!WAITS.in_wait());
}

#[test]
fn isr_flag_is_consumed_by_pump_while_waiting() {
    // The "ISR" is simulated from inside the pump: every pump is one
    // timer interrupt, and the fifth one raises the data-ready flag.
    static UPTIME: TickCounter = TickCounter::new();
    static PUMP: PumpRegistry = PumpRegistry::new();
    static WAITS: WaitDepth = WaitDepth::new();
    static DATA_READY: IsrFlag = IsrFlag::new();
    static HANDLED: Hits = Hits::new();

    fn timer_isr() {
        UPTIME.on_interrupt();
        if UPTIME.ticks() == 5 {
            DATA_READY.signal();
        }
    }

    fn app(_: Tick, _: bool) {
        timer_isr();
        if DATA_READY.take() {
            HANDLED.hit();
        }
    }

    PUMP.set(app);
    let delay = CoopDelay::with_context(&UPTIME, &UPTIME, &PUMP, &WAITS);
    assert!(delay.wait_until(|| HANDLED.get() > 0, 100));
    assert_eq!(UPTIME.ticks(), 5);
    assert!(!DATA_READY.is_set());
}

#[test]
fn uptime_counter_drives_delay() {
    static UPTIME: TickCounter = TickCounter::new();
    static PUMP: PumpRegistry = PumpRegistry::new();
    static WAITS: WaitDepth = WaitDepth::new();

    fn app(_: Tick, _: bool) {
        UPTIME.on_interrupt();
    }

    PUMP.set(app);
    UPTIME.set_weight(10);
    let delay = CoopDelay::with_context(&UPTIME, &UPTIME, &PUMP, &WAITS);
    delay.delay_ms(95);
    assert_eq!(UPTIME.ticks(), 100);
}
