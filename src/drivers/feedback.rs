// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Conversion of raw feedback ADC readings into engineering units.
//!
//! Four analog channels are sampled on the rig:
//! - magnetic position sensor (raw, mean-filtered)
//! - potentiometer position sensor (raw)
//! - supply current through an INA180 shunt amplifier
//! - supply voltage through a 6.8k / 1k divider
//!
//! The calibration constants were measured on the bench against a reference supply.

use crate::control::filter::MeanFilter;

/// ADC reference voltage (V).
pub const ADC_VREF_V: f32 = 3.3;

/// Full-scale count of the 12-bit ADC.
pub const ADC_FULL_SCALE: f32 = 4096.0;

/// INA180A1 voltage gain.
pub const INA180_GAIN: f32 = 20.0;

/// Current shunt (Ω).
pub const INA180_R_SHUNT_OHM: f32 = 0.015;

const CURRENT_CAL_GAIN: f32 = 1.03;
const CURRENT_CAL_OFFSET_A: f32 = 0.2;

const DIVIDER_R_UP_KOHM: f32 = 6.8;
const DIVIDER_R_DOWN_KOHM: f32 = 1.0;
const VOLTAGE_CAL_GAIN: f32 = 1.039;

/// Samples kept by the magnetic feedback filter.
pub const MAG_FILTER_LEN: usize = 100;

/// Samples averaged for the reported magnetic feedback.
pub const MAG_FILTER_WINDOW: usize = 16;

/// Analog feedback channels, in ADC scan order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FeedbackChannel {
    Magnetic = 0,
    Potentiometer = 1,
    Current = 2,
    Voltage = 3,
}

impl FeedbackChannel {
    pub const COUNT: usize = 4;

    pub const ALL: [FeedbackChannel; Self::COUNT] = [
        FeedbackChannel::Magnetic,
        FeedbackChannel::Potentiometer,
        FeedbackChannel::Current,
        FeedbackChannel::Voltage,
    ];

    /// Channel after this one in scan order, wrapping.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::COUNT]
    }
}

#[inline]
fn adc_to_volts(raw: u16) -> f32 {
    raw as f32 * ADC_VREF_V / ADC_FULL_SCALE
}

/// Supply current (A) from the INA180 output reading.
pub fn supply_current_a(raw: u16) -> f32 {
    let amps = adc_to_volts(raw) / INA180_GAIN / INA180_R_SHUNT_OHM;
    amps * CURRENT_CAL_GAIN + CURRENT_CAL_OFFSET_A
}

/// Supply voltage (V) from the divider reading.
pub fn supply_voltage_v(raw: u16) -> f32 {
    let ratio = (DIVIDER_R_UP_KOHM + DIVIDER_R_DOWN_KOHM) / DIVIDER_R_DOWN_KOHM;
    adc_to_volts(raw) * ratio * VOLTAGE_CAL_GAIN
}

/// Running conversion state for the analog channels.
pub struct FeedbackConverter {
    mag_filter: MeanFilter<MAG_FILTER_LEN>,
}

impl Default for FeedbackConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackConverter {
    pub fn new() -> Self {
        Self {
            mag_filter: MeanFilter::new(MAG_FILTER_WINDOW),
        }
    }

    /// Filtered magnetic feedback count.
    pub fn mag_feedback(&mut self, raw: u16) -> u16 {
        let mean = self.mag_filter.update(raw as f32);
        (mean + 0.5) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn current_conversion_matches_bench_calibration() {
        assert_relative_eq!(supply_current_a(0), 0.2);

        // 1.65 V at the amplifier output: 5.5 A through the shunt
        let expected = 1.65 / 20.0 / 0.015 * 1.03 + 0.2;
        assert_relative_eq!(supply_current_a(2048), expected, max_relative = 1e-5);
    }

    #[test]
    fn voltage_conversion_matches_divider() {
        assert_relative_eq!(supply_voltage_v(0), 0.0);
        let expected = 1.65 * 7.8 * 1.039;
        assert_relative_eq!(supply_voltage_v(2048), expected, max_relative = 1e-5);
    }

    #[test]
    fn mag_feedback_is_averaged_over_window() {
        let mut conv = FeedbackConverter::new();
        assert_eq!(conv.mag_feedback(1000), 1000);
        assert_eq!(conv.mag_feedback(2000), 1500);

        for _ in 0..MAG_FILTER_WINDOW {
            conv.mag_feedback(3000);
        }
        assert_eq!(conv.mag_feedback(3000), 3000);
    }

    #[test]
    fn channels_cycle_in_scan_order() {
        let mut ch = FeedbackChannel::Magnetic;
        for expected in [
            FeedbackChannel::Potentiometer,
            FeedbackChannel::Current,
            FeedbackChannel::Voltage,
            FeedbackChannel::Magnetic,
        ] {
            ch = ch.next();
            assert_eq!(ch, expected);
        }
    }
}
