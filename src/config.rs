// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Loop timing and telemetry source configuration.

use core::fmt;

/// Telemetry source identifier reported every tick.
pub const SOURCE_ID: &str = "test-ser-x23";

/// Control loop period (50 Hz).
pub const LOOP_PERIOD_US: u32 = 20_000;

/// Longest source identifier that fits in a single telemetry payload.
pub const SOURCE_ID_MAX_LEN: usize = 255;

/// Invalid configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The loop period must be non-zero.
    ZeroPeriod,
    /// Source identifier does not fit in a telemetry payload.
    SourceIdTooLong(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPeriod => f.write_str("loop period must be non-zero"),
            ConfigError::SourceIdTooLong(len) => {
                write!(f, "source id is {} bytes, max {}", len, SOURCE_ID_MAX_LEN)
            }
        }
    }
}

/// Runtime loop configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    /// Tick period in microseconds.
    pub period_us: u32,
    /// Identifier sent in the `SOURCE_ID` telemetry record.
    pub source_id: &'static str,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::new(LOOP_PERIOD_US, SOURCE_ID)
    }
}

impl LoopConfig {
    pub const fn new(period_us: u32, source_id: &'static str) -> Self {
        Self {
            period_us,
            source_id,
        }
    }

    /// Set the tick period.
    pub fn with_period_us(mut self, period_us: u32) -> Self {
        self.period_us = period_us;
        self
    }

    /// Set the telemetry source identifier.
    pub fn with_source_id(mut self, source_id: &'static str) -> Self {
        self.source_id = source_id;
        self
    }

    /// Loop frequency in Hz, which is also the waveform sample rate.
    #[inline]
    pub fn freq_hz(&self) -> f32 {
        1_000_000.0 / self.period_us as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_us == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.source_id.len() > SOURCE_ID_MAX_LEN {
            return Err(ConfigError::SourceIdTooLong(self.source_id.len()));
        }
        Ok(())
    }
}
