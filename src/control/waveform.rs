// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sampled reference trajectories.
//!
//! A [`Waveform`] holds one period of a sinusoid sampled at the control loop rate and emits one
//! sample per tick. In sweep mode the period shrinks in equal steps from `period_max_s` toward
//! `period_min_s`, each period being held for a fixed number of cycles, after which the waveform
//! disables itself.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut wave = Waveform::new(50.0, servo.range());
//! wave.start_sinusoid(&SinParams { angle_min_deg: -20.0, angle_max_deg: 20.0, period_s: 2.0 })?;
//!
//! loop {
//!     if let Step::Sample(deg) = wave.step() {
//!         servo.set_angle(deg);
//!     }
//! }
//! ```

use core::f32::consts::PI;
use core::fmt;

use heapless::Vec;
use micromath::F32Ext;

use crate::interfaces::AngleRange;
use crate::protocol::messages::{SinParams, SinSweepParams};

/// Maximum number of samples in one period.
pub const WAVEFORM_CAPACITY: usize = 1000;

/// Shortest accepted period (s).
pub const PERIOD_MIN_S: f32 = 0.2;

/// Longest accepted period (s).
pub const PERIOD_MAX_S: f32 = 20.0;

/// Reasons a waveform request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformError {
    /// Period outside [`PERIOD_MIN_S`, `PERIOD_MAX_S`].
    PeriodOutOfRange,
    /// `angle_min_deg` is not below `angle_max_deg`.
    InvalidAngleBounds,
    /// A bound lies outside the actuator's travel.
    AngleOutOfRange,
    /// One period would need this many samples, which the table cannot hold.
    SampleCount(usize),
    /// Sweep periods are not decreasing, or a stage/cycle count is zero.
    InvalidSweep,
}

impl fmt::Display for WaveformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveformError::PeriodOutOfRange => write!(
                f,
                "period outside [{}, {}] s",
                PERIOD_MIN_S, PERIOD_MAX_S
            ),
            WaveformError::InvalidAngleBounds => f.write_str("angle min must be below angle max"),
            WaveformError::AngleOutOfRange => f.write_str("angle bound outside actuator range"),
            WaveformError::SampleCount(n) => {
                write!(f, "{} samples per period, capacity {}", n, WAVEFORM_CAPACITY)
            }
            WaveformError::InvalidSweep => f.write_str("invalid sweep parameters"),
        }
    }
}

/// Result of advancing the waveform by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Generator disabled; the reference is left alone.
    Idle,
    /// New reference angle in degrees.
    Sample(f32),
    /// The sweep just finished and the generator disabled itself.
    Complete,
}

/// Frequency sweep bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepState {
    period_min_s: f32,
    period_max_s: f32,
    period_step_s: f32,
    n_periods: u32,
    n_cycles_per_period: u32,
    cycles_count: u32,
    periods_count: u32,
}

impl SweepState {
    #[inline]
    pub fn period_min_s(&self) -> f32 {
        self.period_min_s
    }

    #[inline]
    pub fn period_max_s(&self) -> f32 {
        self.period_max_s
    }

    /// Amount the period shrinks after each completed stage.
    #[inline]
    pub fn period_step_s(&self) -> f32 {
        self.period_step_s
    }

    #[inline]
    pub fn n_periods(&self) -> u32 {
        self.n_periods
    }

    #[inline]
    pub fn n_cycles_per_period(&self) -> u32 {
        self.n_cycles_per_period
    }

    /// Full cycles completed at the current period.
    #[inline]
    pub fn cycles_count(&self) -> u32 {
        self.cycles_count
    }

    /// Stages completed so far.
    #[inline]
    pub fn periods_count(&self) -> u32 {
        self.periods_count
    }
}

/// Sinusoid / sweep reference generator.
pub struct Waveform {
    values: Vec<f32, WAVEFORM_CAPACITY>,
    /// Next sample to emit.
    head: usize,
    angle_min_deg: f32,
    angle_max_deg: f32,
    period_s: f32,
    sweep: Option<SweepState>,
    enabled: bool,
    /// Last sweep sample emitted; the next step reports completion.
    finished: bool,

    sample_rate_hz: f32,
    range: AngleRange,
}

impl Waveform {
    /// Empty, disabled generator sampling at `sample_rate_hz` for an actuator with travel `range`.
    pub fn new(sample_rate_hz: f32, range: AngleRange) -> Self {
        Self {
            values: Vec::new(),
            head: 0,
            angle_min_deg: 0.0,
            angle_max_deg: 0.0,
            period_s: 0.0,
            sweep: None,
            enabled: false,
            finished: false,
            sample_rate_hz,
            range,
        }
    }

    /// Number of samples needed for one period.
    fn sample_count(&self, period_s: f32) -> Result<usize, WaveformError> {
        let len = (period_s * self.sample_rate_hz) as usize;
        if len == 0 || len > WAVEFORM_CAPACITY {
            return Err(WaveformError::SampleCount(len));
        }
        Ok(len)
    }

    fn check_period(period_s: f32) -> Result<(), WaveformError> {
        if !(PERIOD_MIN_S..=PERIOD_MAX_S).contains(&period_s) {
            return Err(WaveformError::PeriodOutOfRange);
        }
        Ok(())
    }

    fn check_angles(&self, angle_min_deg: f32, angle_max_deg: f32) -> Result<(), WaveformError> {
        if !(angle_min_deg < angle_max_deg) {
            return Err(WaveformError::InvalidAngleBounds);
        }
        if !self.range.contains(angle_min_deg) || !self.range.contains(angle_max_deg) {
            return Err(WaveformError::AngleOutOfRange);
        }
        Ok(())
    }

    /// Fill the table with one period of `mid + amp * sin(2πi/len)`.
    ///
    /// Leaves the current table untouched on error.
    fn fill_table(
        &mut self,
        angle_min_deg: f32,
        angle_max_deg: f32,
        period_s: f32,
    ) -> Result<(), WaveformError> {
        let len = self.sample_count(period_s)?;
        let mid = (angle_min_deg + angle_max_deg) * 0.5;
        let amp = (angle_max_deg - angle_min_deg) * 0.5;

        self.values.clear();
        self.values.extend((0..len).map(|i| {
            let phase = 2.0 * PI * i as f32 / len as f32;
            mid + amp * F32Ext::sin(phase)
        }));

        self.head = 0;
        self.angle_min_deg = angle_min_deg;
        self.angle_max_deg = angle_max_deg;
        self.period_s = period_s;
        Ok(())
    }

    /// Validate and build a sinusoid table. Does not change whether the generator is enabled.
    pub fn create_sinusoidal(
        &mut self,
        angle_min_deg: f32,
        angle_max_deg: f32,
        period_s: f32,
    ) -> Result<(), WaveformError> {
        Self::check_period(period_s)?;
        self.check_angles(angle_min_deg, angle_max_deg)?;
        self.fill_table(angle_min_deg, angle_max_deg, period_s)
    }

    /// Start a fixed-period sinusoid.
    pub fn start_sinusoid(&mut self, params: &SinParams) -> Result<(), WaveformError> {
        self.create_sinusoidal(params.angle_min_deg, params.angle_max_deg, params.period_s)?;
        self.sweep = None;
        self.enabled = true;
        self.finished = false;
        Ok(())
    }

    /// Start a frequency sweep at `period_max_s`.
    pub fn start_sweep(&mut self, params: &SinSweepParams) -> Result<(), WaveformError> {
        if !(params.period_max_s > params.period_min_s)
            || params.n_periods == 0
            || params.n_cycles_per_period == 0
        {
            return Err(WaveformError::InvalidSweep);
        }
        Self::check_period(params.period_min_s)?;
        self.sample_count(params.period_min_s)?;

        self.create_sinusoidal(
            params.angle_min_deg,
            params.angle_max_deg,
            params.period_max_s,
        )?;

        let period_step_s = if params.n_periods > 1 {
            (params.period_max_s - params.period_min_s) / (params.n_periods - 1) as f32
        } else {
            0.0
        };
        self.sweep = Some(SweepState {
            period_min_s: params.period_min_s,
            period_max_s: params.period_max_s,
            period_step_s,
            n_periods: params.n_periods,
            n_cycles_per_period: params.n_cycles_per_period,
            cycles_count: 0,
            periods_count: 0,
        });
        self.enabled = true;
        self.finished = false;
        Ok(())
    }

    /// Emit the next sample and advance. Sweep bookkeeping runs when the table wraps.
    ///
    /// The last sample of a sweep is still emitted; completion is reported on the following step.
    pub fn step(&mut self) -> Step {
        if self.finished {
            self.clear();
            return Step::Complete;
        }
        if !self.enabled || self.values.is_empty() {
            return Step::Idle;
        }

        let sample = self.values[self.head];
        self.head = (self.head + 1) % self.values.len();
        if self.head != 0 {
            return Step::Sample(sample);
        }

        let Some(sweep) = self.sweep.as_mut() else {
            return Step::Sample(sample);
        };

        sweep.cycles_count += 1;
        if sweep.cycles_count < sweep.n_cycles_per_period {
            return Step::Sample(sample);
        }

        sweep.cycles_count = 0;
        sweep.periods_count += 1;
        if sweep.periods_count >= sweep.n_periods {
            self.finished = true;
            return Step::Sample(sample);
        }

        // Rounding must not push the last stage below the requested minimum.
        let period_s = (self.period_s - sweep.period_step_s).max(sweep.period_min_s);
        if self
            .fill_table(self.angle_min_deg, self.angle_max_deg, period_s)
            .is_err()
        {
            self.finished = true;
        }
        Step::Sample(sample)
    }

    /// Reset to the zero-valued, disabled state.
    pub fn clear(&mut self) {
        self.values.clear();
        self.head = 0;
        self.angle_min_deg = 0.0;
        self.angle_max_deg = 0.0;
        self.period_s = 0.0;
        self.sweep = None;
        self.enabled = false;
        self.finished = false;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    #[inline]
    pub fn sweep(&self) -> Option<&SweepState> {
        self.sweep.as_ref()
    }

    /// Current table.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn period_s(&self) -> f32 {
        self.period_s
    }

    #[inline]
    pub fn angle_min_deg(&self) -> f32 {
        self.angle_min_deg
    }

    #[inline]
    pub fn angle_max_deg(&self) -> f32 {
        self.angle_max_deg
    }

    #[inline]
    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }
}
