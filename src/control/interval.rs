// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-period tick generator on top of a microsecond clock.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut waiter = IntervalWaiter::new(clock, 20_000)?;
//!
//! loop {
//!     waiter.wait();
//!     // one control step
//! }
//! ```
//!
//! Deadlines advance in whole multiples of the interval, so jitter in the caller does not
//! accumulate. If several intervals were missed, they collapse into a single tick.

use crate::config::ConfigError;
use crate::interfaces::TimeSource;

pub struct IntervalWaiter<T> {
    time_source: T,
    interval_micros: u32,
    /// Start of the current interval.
    last_micros: u32,
    /// Clock value seen by the last poll.
    now_micros: u32,
}

impl<T: TimeSource> IntervalWaiter<T> {
    /// Create a waiter ticking every `interval_micros`. A zero interval is rejected.
    pub fn new(time_source: T, interval_micros: u32) -> Result<Self, ConfigError> {
        if interval_micros == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(Self {
            time_source,
            interval_micros,
            last_micros: 0,
            now_micros: 0,
        })
    }

    /// Poll the clock. Returns true once per elapsed interval boundary.
    pub fn next_interval(&mut self) -> bool {
        self.now_micros = self.time_source.now_micros();
        let elapsed = self.now_micros.wrapping_sub(self.last_micros);
        if elapsed < self.interval_micros {
            return false;
        }

        let missed = elapsed / self.interval_micros;
        self.last_micros = self
            .last_micros
            .wrapping_add(missed.wrapping_mul(self.interval_micros));
        true
    }

    /// Busy-poll until the next interval boundary.
    pub fn wait(&mut self) {
        while !self.next_interval() {
            core::hint::spin_loop();
        }
    }

    #[inline]
    pub fn interval_micros(&self) -> u32 {
        self.interval_micros
    }

    /// Clock value read by the most recent poll.
    #[inline]
    pub fn now_micros(&self) -> u32 {
        self.now_micros
    }

    /// Start of the current interval.
    #[inline]
    pub fn deadline_micros(&self) -> u32 {
        self.last_micros
    }

    #[inline]
    pub fn time_source(&self) -> &T {
        &self.time_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Clock returning `now`, then advancing by `step` on each read.
    struct FakeClock {
        now: Cell<u32>,
        step: u32,
    }

    impl FakeClock {
        fn at(now: u32) -> Self {
            Self {
                now: Cell::new(now),
                step: 0,
            }
        }

        fn set(&self, now: u32) {
            self.now.set(now);
        }
    }

    impl TimeSource for FakeClock {
        fn now_micros(&self) -> u32 {
            let now = self.now.get();
            self.now.set(now.wrapping_add(self.step));
            now
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(
            IntervalWaiter::new(FakeClock::at(0), 0),
            Err(ConfigError::ZeroPeriod)
        ));
    }

    #[test]
    fn fires_once_per_interval() {
        let clock = FakeClock::at(0);
        let mut waiter = IntervalWaiter::new(&clock, 1000).unwrap();

        assert!(!waiter.next_interval());
        clock.set(999);
        assert!(!waiter.next_interval());
        clock.set(1000);
        assert!(waiter.next_interval());
        assert!(!waiter.next_interval());
        clock.set(2050);
        assert!(waiter.next_interval());
        assert_eq!(waiter.deadline_micros(), 2000);
    }

    #[test]
    fn missed_intervals_collapse_into_one_tick() {
        let clock = FakeClock::at(3500);
        let mut waiter = IntervalWaiter::new(&clock, 1000).unwrap();

        assert!(waiter.next_interval());
        assert_eq!(waiter.deadline_micros(), 3000);
        assert_eq!(waiter.now_micros(), 3500);
        assert!(!waiter.next_interval());

        clock.set(4000);
        assert!(waiter.next_interval());
        assert_eq!(waiter.deadline_micros(), 4000);
    }

    #[test]
    fn late_polls_do_not_drift() {
        let clock = FakeClock::at(0);
        let mut waiter = IntervalWaiter::new(&clock, 1000).unwrap();
        for k in 1..=5u32 {
            clock.set(k * 1000 + 300);
            assert!(waiter.next_interval());
            assert_eq!(waiter.deadline_micros(), k * 1000);
        }
    }

    #[test]
    fn survives_clock_wraparound() {
        let clock = FakeClock::at(u32::MAX - 500);
        let mut waiter = IntervalWaiter::new(&clock, 1000).unwrap();
        assert!(waiter.next_interval());
        let deadline = waiter.deadline_micros();

        clock.set(deadline.wrapping_add(1000));
        assert!(waiter.next_interval());
        assert_eq!(waiter.deadline_micros(), deadline.wrapping_add(1000));
    }

    #[test]
    fn wait_spins_until_boundary() {
        let clock = FakeClock {
            now: Cell::new(0),
            step: 100,
        };
        let mut waiter = IntervalWaiter::new(&clock, 1000).unwrap();
        waiter.wait();
        assert_eq!(waiter.now_micros(), 1000);
        waiter.wait();
        assert_eq!(waiter.now_micros(), 2000);
    }
}
