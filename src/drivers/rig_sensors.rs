// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sensor front-end of the rig.
//!
//! The four analog feedback channels share one ADC and are converted round-robin, one channel per
//! [`SensorFeedback::update`] call. A conversion started on one tick is collected on a later one;
//! until it completes, the previous value of that channel is reported.

use crate::drivers::feedback::{self, FeedbackChannel, FeedbackConverter};
use crate::interfaces::{SensorFeedback, SensorState};

/// Single-channel, non-blocking ADC.
pub trait AnalogInput {
    /// Clear the completion flag and start one conversion of `channel`.
    fn start(&mut self, channel: u8);

    /// True once the last started conversion has finished.
    fn is_complete(&self) -> bool;

    /// Result of the last finished conversion.
    fn data(&self) -> u16;
}

/// ADC channel numbers wired to each feedback signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelMap {
    pub magnetic: u8,
    pub potentiometer: u8,
    pub current: u8,
    pub voltage: u8,
}

impl ChannelMap {
    fn adc_channel(&self, ch: FeedbackChannel) -> u8 {
        match ch {
            FeedbackChannel::Magnetic => self.magnetic,
            FeedbackChannel::Potentiometer => self.potentiometer,
            FeedbackChannel::Current => self.current,
            FeedbackChannel::Voltage => self.voltage,
        }
    }
}

pub struct RigSensors<ADC> {
    adc: ADC,
    channels: ChannelMap,
    /// Channel of the conversion in flight, or the next one to start.
    current: FeedbackChannel,
    pending: bool,
    converter: FeedbackConverter,
    state: SensorState,
}

impl<ADC: AnalogInput> RigSensors<ADC> {
    pub fn new(adc: ADC, channels: ChannelMap) -> Self {
        Self {
            adc,
            channels,
            current: FeedbackChannel::Magnetic,
            pending: false,
            converter: FeedbackConverter::new(),
            state: SensorState::default(),
        }
    }

    fn apply(&mut self, ch: FeedbackChannel, raw: u16) {
        match ch {
            FeedbackChannel::Magnetic => {
                self.state.mag_feedback_adc_val = self.converter.mag_feedback(raw)
            }
            FeedbackChannel::Potentiometer => self.state.pot_feedback_adc_val = raw,
            FeedbackChannel::Current => self.state.supply_current_a = feedback::supply_current_a(raw),
            FeedbackChannel::Voltage => self.state.supply_voltage_v = feedback::supply_voltage_v(raw),
        }
    }

    #[inline]
    pub fn free(self) -> ADC {
        self.adc
    }
}

impl<ADC: AnalogInput> SensorFeedback for RigSensors<ADC> {
    fn update(&mut self) {
        if self.pending {
            if !self.adc.is_complete() {
                return;
            }
            let raw = self.adc.data();
            self.apply(self.current, raw);
            self.current = self.current.next();
            self.pending = false;
        }

        self.adc.start(self.channels.adc_channel(self.current));
        self.pending = true;
    }

    fn state(&self) -> SensorState {
        self.state
    }
}
