// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Microsecond time base on TIM2.
//!
//! TIM2 is a 32-bit timer: with a 1 MHz tick it free-runs and wraps after ~71.6 minutes, which the
//! interval waiter handles with wrapping arithmetic.

use stm32f7xx_hal::pac;

use crate::interfaces::TimeSource;

pub struct MicrosClock {
    tim: pac::TIM2,
}

impl MicrosClock {
    /// Configure TIM2 as a free-running 1 MHz up-counter.
    ///
    /// `timer_clk_hz` is the APB1 timer clock and must be a multiple of 1 MHz.
    pub fn tim2(tim2: pac::TIM2, timer_clk_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        let tim = tim2;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 µs per count
        let psc = (timer_clk_hz / 1_000_000).saturating_sub(1);
        tim.psc.write(|w| unsafe { w.bits(psc) });

        // Auto-reload: max 32-bit
        tim.arr.write(|w| w.bits(0xFFFF_FFFF));

        // Load the prescaler, then reset the counter
        tim.egr.write(|w| w.ug().set_bit());
        tim.cnt.write(|w| w.bits(0));

        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> pac::TIM2 {
        self.tim
    }
}

impl TimeSource for MicrosClock {
    #[inline]
    fn now_micros(&self) -> u32 {
        self.tim.cnt.read().cnt().bits()
    }
}
