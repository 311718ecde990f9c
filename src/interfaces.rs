// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Capability Interfaces
//!
//! Narrow traits through which the control core reaches the outside world. Board code implements
//! them on top of `hw/` peripherals; tests implement them with in-memory mocks.
//!
//! - [`TimeSource`] - monotonic microsecond clock
//! - [`ByteStream`] - host link (commands in, telemetry out)
//! - [`Actuator`] - servo angle output
//! - [`SensorFeedback`] - sensor snapshot producer

/// Maximum number of one-wire temperature sensors reported in a [`SensorState`].
pub const MAX_TEMP_SENSORS: usize = 8;

/// Monotonic microsecond clock. The counter wraps at `u32::MAX`.
pub trait TimeSource {
    fn now_micros(&self) -> u32;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    #[inline]
    fn now_micros(&self) -> u32 {
        (**self).now_micros()
    }
}

/// Bidirectional byte stream.
pub trait ByteStream {
    /// Number of bytes ready to be read.
    fn available(&mut self) -> usize;

    /// Next received byte, `None` if nothing is buffered.
    fn read(&mut self) -> Option<u8>;

    /// Queue `bytes` for transmission and return how many were accepted.
    ///
    /// May be less than `bytes.len()` under backpressure; the rest is dropped.
    fn write(&mut self, bytes: &[u8]) -> usize;
}

/// Physical travel of an actuator in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub min_deg: f32,
    pub max_deg: f32,
}

impl AngleRange {
    pub const fn new(min_deg: f32, max_deg: f32) -> Self {
        Self { min_deg, max_deg }
    }

    /// True if `deg` lies inside the range (bounds included).
    #[inline]
    pub fn contains(&self, deg: f32) -> bool {
        deg >= self.min_deg && deg <= self.max_deg
    }

    #[inline]
    pub fn clamp(&self, deg: f32) -> f32 {
        deg.clamp(self.min_deg, self.max_deg)
    }
}

/// Position-commanded actuator.
pub trait Actuator {
    /// Enable the output stage.
    fn start(&mut self);

    /// Disable the output stage.
    fn stop(&mut self);

    /// Command a position. Out-of-range inputs are clamped by the implementation.
    fn set_angle(&mut self, angle_deg: f32);

    /// Declared physical travel.
    fn range(&self) -> AngleRange;
}

/// One temperature probe reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemperatureReading {
    pub temp_degc: f32,
    pub sensor_id: u16,
}

/// Most recent feedback values.
///
/// Values whose conversion has not completed since the previous tick keep their previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorState {
    pub load_cell_adc_val: i32,
    pub pot_feedback_adc_val: u16,
    pub mag_feedback_adc_val: u16,
    pub supply_current_a: f32,
    pub supply_voltage_v: f32,
    pub temperatures: [TemperatureReading; MAX_TEMP_SENSORS],
    pub temp_sensor_count: usize,
}

impl SensorState {
    /// Temperature of the first probe, 0.0 if none is attached.
    pub fn first_temperature_degc(&self) -> f32 {
        self.temperatures[0].temp_degc
    }
}

/// Sensor front-end.
pub trait SensorFeedback {
    /// One-time setup (e.g. load cell tare).
    fn init(&mut self) {}

    /// Collect completed conversions and trigger the next ones.
    fn update(&mut self);

    /// Snapshot of the latest values.
    fn state(&self) -> SensorState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_range_bounds_are_inclusive() {
        let range = AngleRange::new(-60.0, 60.0);
        assert!(range.contains(-60.0));
        assert!(range.contains(60.0));
        assert!(!range.contains(60.1));
        assert!(!range.contains(f32::NAN));
        assert_eq!(range.clamp(75.0), 60.0);
        assert_eq!(range.clamp(-75.0), -60.0);
    }

    #[test]
    fn first_temperature_reads_first_probe() {
        let mut state = SensorState::default();
        assert_eq!(state.temp_sensor_count, 0);
        assert_eq!(state.first_temperature_degc(), 0.0);

        state.temperatures[0] = TemperatureReading {
            temp_degc: 24.5,
            sensor_id: 7,
        };
        state.temp_sensor_count = 1;
        assert_eq!(state.first_temperature_degc(), 24.5);
    }
}
