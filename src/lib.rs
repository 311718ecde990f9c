// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Servo Rig Firmware
//!
//! This crate contains the firmware for the servo-actuator test rig, written in Rust, targeting an
//! STM32F7 MCU. The rig commands a PWM servo along a reference trajectory (fixed angle, sinusoid or
//! swept-frequency sinusoid), parses binary commands from a host and streams framed telemetry back.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Loop timing and telemetry source configuration |
//! | [`interfaces`] | Capability traits the control core depends on (clock, stream, actuator, sensors) |
//! | [`protocol`] | Host command parser, COBS/CRC framing and telemetry writer |
//! | [`control`] | Interval waiter, waveform generator and the control loop orchestrator |
//! | [`drivers`] | Device-level drivers (P500 servo mapping, sensor feedback conversion) |
//! | `hw` | MCU-level wrappers around USART, timers, ADC (feature `stm32`) |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features stm32 --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
#[cfg(feature = "stm32")]
pub mod hw;
pub mod interfaces;
pub mod protocol;
