// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! control loop. They only depend on small traits ([`servo::PulseOutput`],
//! [`rig_sensors::AnalogInput`]) so they can be exercised on the host.
//!
//! ## Existing drivers
//!
//! - [`servo`] – P500 servo, angle to pulse width mapping
//! - [`feedback`] – INA180 current, divider voltage and magnetic feedback conversion
//! - [`rig_sensors`] – round-robin sampling of the rig's analog feedback channels

pub mod feedback;
pub mod rig_sensors;
pub mod servo;

pub use rig_sensors::{AnalogInput, ChannelMap, RigSensors};
pub use servo::{PulseOutput, ServoP500};
