// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Basic ADC support for STM32F7 using direct PAC register access.
//!
//! Thin wrapper around ADC1 with non-blocking single-channel conversions: a conversion is started
//! on one control tick and collected on a later one.
//!
//! Example:
//! ```ignore
//! let mut adc = Adc::adc1(dp.ADC1);
//! adc.start(3);
//! // ...
//! if adc.is_complete() {
//!     let value = adc.data();
//! }
//! ```

use stm32f7xx_hal::pac;

use crate::drivers::rig_sensors::AnalogInput;

/// Longest sample time (480 cycles) for every channel field of SMPR1 (10..=18) and SMPR2 (0..=9).
const SMPR1_ALL_480: u32 = 0x07FF_FFFF;
const SMPR2_ALL_480: u32 = 0x3FFF_FFFF;

pub struct Adc {
    adc: pac::ADC1,
}

impl Adc {
    /// Create and initialize ADC1.
    pub fn adc1(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        // ADC prescaler: PCLK2 / 4
        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        common.ccr.modify(|_, w| w.adcpre().div4());

        let adc = adc1;

        // Power off to configure
        adc.cr2.modify(|_, w| w.adon().clear_bit());

        // 12-bit, right-aligned, software trigger
        adc.cr1.modify(|_, w| w.res().bits(0b00));
        adc.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Long sample times for high-impedance feedback sources
        adc.smpr1.write(|w| unsafe { w.bits(SMPR1_ALL_480) });
        adc.smpr2.write(|w| unsafe { w.bits(SMPR2_ALL_480) });

        // Sequence length = 1 conversion
        adc.sqr1.modify(|_, w| w.l().bits(0));

        // Power on
        adc.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc }
    }

    #[inline]
    pub fn free(self) -> pac::ADC1 {
        self.adc
    }
}

impl AnalogInput for Adc {
    fn start(&mut self, channel: u8) {
        self.adc.sr.modify(|_, w| w.eoc().clear_bit());
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
    }

    #[inline]
    fn is_complete(&self) -> bool {
        self.adc.sr.read().eoc().bit_is_set()
    }

    #[inline]
    fn data(&self) -> u16 {
        self.adc.dr.read().data().bits()
    }
}
