// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Host Link Protocol
//!
//! - [`messages`] - command IDs, payload table and typed parameters
//! - [`parser`] - header/checksum command frame parser
//! - [`checksum`] - 8-bit additive checksum and CRC-16
//! - [`cobs`] - byte stuffing for zero-delimited records
//! - [`telemetry`] - tagged telemetry record writer

pub mod checksum;
pub mod cobs;
pub mod messages;
pub mod parser;
pub mod telemetry;

pub use messages::Command;
pub use parser::{Frame, Parser};
pub use telemetry::TelemetryWriter;
