//! # Time - Tick Counter and Delay Service
//!
//! The device's only time base is a free-running tick counter advanced by a
//! periodic timer interrupt (10 Hz in the reference configuration). Delays are
//! expressed in milliseconds and rounded up to whole ticks, so their precision
//! is bounded by the timer period.
//!
//! ## Key Components
//!
//! - **TimeSource**: "now in ticks" plus "wait until tick". The state machine
//!   only talks to this trait.
//! - **TickCounter**: interrupt-driven implementation. `record_tick` is the
//!   whole timer handler; `sleep_until` spins on the counter, yielding to the
//!   executor between polls.
//! - **SimulatedClock** (std): jumps straight to the target tick, letting
//!   tests run thousands of one-second backoffs instantly.
//! - **tick_task**: emulates the timer interrupt with an embassy `Ticker` on
//!   targets where ticks come from the embassy time driver.
//!
//! Wraparound of the 32-bit counter is not handled; at 10 Hz it takes more
//! than 13 years of uptime.

use core::sync::atomic::{AtomicU32, Ordering};
use embassy_futures::yield_now;
use embassy_time::{Duration, Ticker};
use log::{Level, log};

/// Monotonic tick source with a fixed rate
pub trait TimeSource {
    /// Current tick count
    fn now(&self) -> u32;

    /// Ticks per second of this source
    fn ticks_per_second(&self) -> u32;

    /// Returns once `now() >= target`
    async fn sleep_until(&self, target: u32);
}

/// Number of ticks covering `duration_ms`, rounded up
pub const fn ticks_for_millis(duration_ms: u32, ticks_per_second: u32) -> u32 {
    let ticks = (duration_ms as u64 * ticks_per_second as u64).div_ceil(1000);
    if ticks > u32::MAX as u64 { u32::MAX } else { ticks as u32 }
}

/// Waits at least `duration_ms` milliseconds, at tick granularity
///
/// The target is computed once at call time; the wait cannot be cancelled.
pub async fn delay_ms<T: TimeSource>(clock: &T, duration_ms: u32) {
    let target = clock
        .now()
        .wrapping_add(ticks_for_millis(duration_ms, clock.ticks_per_second()));
    clock.sleep_until(target).await;
}

/// Free-running counter advanced by the periodic timer interrupt
///
/// Single writer (the interrupt), single reader (the main flow). A word-sized
/// atomic is enough; no lock is taken.
pub struct TickCounter {
    ticks: AtomicU32,
    ticks_per_second: u32,
}

impl TickCounter {
    /// Creates a counter at zero for a timer firing `ticks_per_second` times a second
    pub const fn new(ticks_per_second: u32) -> Self {
        TickCounter {
            ticks: AtomicU32::new(0),
            ticks_per_second,
        }
    }

    /// Timer interrupt body: advances the counter by exactly one tick
    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Release);
    }
}

impl TimeSource for TickCounter {
    fn now(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    async fn sleep_until(&self, target: u32) {
        while self.now() < target {
            yield_now().await;
        }
    }
}

/// Emulated timer interrupt for targets without a dedicated tick ISR
///
/// Calls [`TickCounter::record_tick`] once per tick period using the embassy
/// time driver.
#[embassy_executor::task]
pub async fn tick_task(ticks: &'static TickCounter) -> ! {
    drive_ticks(ticks).await
}

/// Body of [`tick_task`], usable from any executor
pub async fn drive_ticks(ticks: &TickCounter) -> ! {
    let period_us = 1_000_000 / ticks.ticks_per_second().max(1) as u64;
    log!(Level::Debug, "Tick task started, period: {} us", period_us);
    let mut ticker = Ticker::every(Duration::from_micros(period_us));
    loop {
        ticker.next().await;
        ticks.record_tick();
    }
}

/// Clock for hosts and tests: sleeping jumps straight to the target tick
#[cfg(feature = "std")]
pub struct SimulatedClock {
    ticks: AtomicU32,
    ticks_per_second: u32,
    sleeps: AtomicU32,
}

#[cfg(feature = "std")]
impl SimulatedClock {
    pub const fn new(ticks_per_second: u32) -> Self {
        SimulatedClock {
            ticks: AtomicU32::new(0),
            ticks_per_second,
            sleeps: AtomicU32::new(0),
        }
    }

    /// Moves the clock forward as if `ticks` timer interrupts had fired
    pub fn advance(&self, ticks: u32) {
        self.ticks.fetch_add(ticks, Ordering::AcqRel);
    }

    /// Number of `sleep_until` calls that had to wait
    pub fn sleep_count(&self) -> u32 {
        self.sleeps.load(Ordering::Acquire)
    }
}

#[cfg(feature = "std")]
impl TimeSource for SimulatedClock {
    fn now(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    async fn sleep_until(&self, target: u32) {
        if self.now() < target {
            self.sleeps.fetch_add(1, Ordering::AcqRel);
            self.ticks.fetch_max(target, Ordering::AcqRel);
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use embassy_futures::select::select;
    use embassy_time::Timer;
    use futures::executor::block_on;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use std::thread;

    #[test]
    fn ticks_for_millis_rounds_up_to_whole_ticks() {
        assert_eq!(ticks_for_millis(0, 10), 0);
        assert_eq!(ticks_for_millis(1, 10), 1);
        assert_eq!(ticks_for_millis(100, 10), 1);
        assert_eq!(ticks_for_millis(150, 10), 2);
        assert_eq!(ticks_for_millis(250, 10), 3);
        assert_eq!(ticks_for_millis(1000, 10), 10);
        assert_eq!(ticks_for_millis(u32::MAX, 1_000_000), u32::MAX);
    }

    #[test]
    fn delay_advances_at_least_the_rounded_up_tick_count() {
        for duration in [0u32, 1, 99, 100, 101, 250, 999, 1000, 12_345] {
            let clock = SimulatedClock::new(10);
            clock.advance(7);
            let start = clock.now();
            block_on(delay_ms(&clock, duration));
            let expected = (duration as u64 * 10).div_ceil(1000) as u32;
            assert!(clock.now() - start >= expected, "duration {duration}");
        }
    }

    #[test]
    fn zero_delay_does_not_sleep() {
        let clock = SimulatedClock::new(10);
        block_on(delay_ms(&clock, 0));
        assert_eq!(clock.sleep_count(), 0);
        assert_eq!(clock.now(), 0);
    }

    #[test]
    fn record_tick_increments_by_one() {
        let counter = TickCounter::new(10);
        assert_eq!(counter.now(), 0);
        counter.record_tick();
        counter.record_tick();
        assert_eq!(counter.now(), 2);
        assert_eq!(counter.ticks_per_second(), 10);
    }

    #[test]
    fn tick_counter_delay_waits_for_interrupt_ticks() {
        static COUNTER: TickCounter = TickCounter::new(1000);
        let running = Arc::new(AtomicBool::new(true));
        let timer = {
            let running = running.clone();
            thread::spawn(move || {
                while running.load(Ordering::Acquire) {
                    COUNTER.record_tick();
                    thread::sleep(std::time::Duration::from_micros(200));
                }
            })
        };

        let start = COUNTER.now();
        block_on(delay_ms(&COUNTER, 25));
        let elapsed = COUNTER.now() - start;
        running.store(false, Ordering::Release);
        timer.join().unwrap();

        assert!(elapsed >= 25, "elapsed only {elapsed} ticks");
    }

    #[test]
    fn drive_ticks_advances_the_counter_on_the_time_driver() {
        let counter = TickCounter::new(100);
        let _ = block_on(select(drive_ticks(&counter), Timer::after_millis(200)));
        assert!(counter.now() >= 10, "only {} ticks in 200 ms", counter.now());
    }
}
