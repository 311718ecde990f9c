// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Loop
//!
//! Timing, reference generation and the loop orchestrator.
//!
//! ## Modules
//!
//! - [`interval`] - Fixed-period tick generator with backlog collapse.
//! - [`waveform`] - Sinusoid and swept-sinusoid reference tables.
//! - [`filter`] - Moving-average filter for noisy feedback channels.
//! - [`rig`] - The per-tick orchestrator tying commands, waveform, actuator and telemetry together.

pub mod filter;
pub mod interval;
pub mod rig;
pub mod waveform;

pub use filter::MeanFilter;
pub use interval::IntervalWaiter;
pub use rig::{DebugChannel, Mode, RigController};
pub use waveform::{Step, Waveform, WaveformError};
