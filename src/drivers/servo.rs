// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Driver for the P500 hobby servo.
//!
//! The servo is position-commanded by a 50 Hz PWM pulse:
//! - 900 µs: -60°
//! - 1500 µs: 0°
//! - 2100 µs: +60°
//!
//! Angles outside the travel are clamped before conversion.

use crate::interfaces::{Actuator, AngleRange};

/// Travel of the P500 (deg).
pub const P500_RANGE: AngleRange = AngleRange::new(-60.0, 60.0);

/// Pulse width at `P500_RANGE.min_deg` (µs).
pub const P500_PULSE_MIN_US: u16 = 900;

/// Pulse width at `P500_RANGE.max_deg` (µs).
pub const P500_PULSE_MAX_US: u16 = 2100;

/// Servo frame rate.
pub const P500_PWM_FREQ_HZ: u32 = 50;

/// A PWM channel that can emit a pulse of a given width once per frame.
pub trait PulseOutput {
    fn enable(&mut self);
    fn disable(&mut self);
    fn set_pulse_us(&mut self, pulse_us: u16);
}

/// P500 servo on a PWM channel.
pub struct ServoP500<P> {
    pwm: P,
    enabled: bool,
    angle_deg: f32,
}

impl<P: PulseOutput> ServoP500<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            enabled: false,
            angle_deg: 0.0,
        }
    }

    /// Pulse width for `angle_deg`, clamped to the servo travel.
    pub fn pulse_for_angle(angle_deg: f32) -> u16 {
        let angle = P500_RANGE.clamp(angle_deg);
        let span_deg = P500_RANGE.max_deg - P500_RANGE.min_deg;
        let span_us = (P500_PULSE_MAX_US - P500_PULSE_MIN_US) as f32;
        let pulse = (angle - P500_RANGE.min_deg) / span_deg * span_us + P500_PULSE_MIN_US as f32;
        (pulse + 0.5) as u16
    }

    /// Last commanded angle after clamping (deg).
    #[inline]
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn free(self) -> P {
        self.pwm
    }
}

impl<P: PulseOutput> Actuator for ServoP500<P> {
    /// Enable the PWM output centred at 0°.
    fn start(&mut self) {
        self.pwm.enable();
        self.enabled = true;
        self.angle_deg = 0.0;
        self.pwm.set_pulse_us(Self::pulse_for_angle(0.0));
    }

    fn stop(&mut self) {
        self.pwm.disable();
        self.enabled = false;
    }

    fn set_angle(&mut self, angle_deg: f32) {
        if angle_deg.is_nan() {
            return;
        }
        self.angle_deg = P500_RANGE.clamp(angle_deg);
        self.pwm.set_pulse_us(Self::pulse_for_angle(self.angle_deg));
    }

    fn range(&self) -> AngleRange {
        P500_RANGE
    }
}
