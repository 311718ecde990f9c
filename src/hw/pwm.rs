// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo PWM on TIM3 channel 1.
//!
//! The timer counts at 1 MHz with a 20 000-count period, so the compare value is the pulse width
//! in microseconds and the frame rate is 50 Hz.

use stm32f7xx_hal::{
    gpio::{gpiob, Alternate},
    pac,
};

use crate::drivers::servo::{PulseOutput, P500_PWM_FREQ_HZ};

const PERIOD_US: u32 = 1_000_000 / P500_PWM_FREQ_HZ;

// CCMR1 output: OC1M[2:0] at bits 6:4, OC1M[3] at bit 16, OC1PE at bit 3
const CCMR1_OC1_MASK: u32 = 0x0001_0078;
const CCMR1_OC1_PWM1_PRELOAD: u32 = (0b110 << 4) | (1 << 3);

pub struct ServoPwm {
    tim: pac::TIM3,
    _pin: gpiob::PB4<Alternate<2>>,
}

impl ServoPwm {
    /// Configure TIM3 CH1 (PB4, AF2) for 50 Hz PWM with the output disabled.
    pub fn tim3(tim3: pac::TIM3, pin: gpiob::PB4<Alternate<2>>, timer_clk_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim3en().set_bit());

        let tim = tim3;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        let psc = (timer_clk_hz / 1_000_000).saturating_sub(1);
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr.write(|w| unsafe { w.bits(PERIOD_US - 1) });
        tim.ccr1.write(|w| unsafe { w.bits(0) });

        // PWM mode 1 with preload on CH1
        tim.ccmr1_output().modify(|r, w| unsafe {
            w.bits((r.bits() & !CCMR1_OC1_MASK) | CCMR1_OC1_PWM1_PRELOAD)
        });

        // Auto-reload preload, then latch everything
        tim.cr1.modify(|_, w| w.arpe().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim, _pin: pin }
    }

    /// Consume the wrapper and return the timer and pin.
    #[inline]
    pub fn free(self) -> (pac::TIM3, gpiob::PB4<Alternate<2>>) {
        (self.tim, self._pin)
    }
}

impl PulseOutput for ServoPwm {
    fn enable(&mut self) {
        self.tim.ccer.modify(|_, w| w.cc1e().set_bit());
    }

    fn disable(&mut self) {
        self.tim.ccer.modify(|_, w| w.cc1e().clear_bit());
    }

    fn set_pulse_us(&mut self, pulse_us: u16) {
        let pulse = (pulse_us as u32).min(PERIOD_US);
        self.tim.ccr1.write(|w| unsafe { w.bits(pulse) });
    }
}
