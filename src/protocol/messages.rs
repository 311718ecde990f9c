// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command message protocol used by the host to drive the rig.
//!
//! Frame layout: `[HEADER_BYTE][id][payload: payload_len(id) bytes, little-endian][checksum]`,
//! where the checksum is the low 8 bits of the sum of `id` and the payload bytes.

/// Sync byte for the protocol.
pub const HEADER_BYTE: u8 = 0xAB;

// Message IDs
pub const MSG_STOP: u8 = 0x00;
pub const MSG_SET_ANGLE: u8 = 0x01;
pub const MSG_START_SIN: u8 = 0x02;
pub const MSG_START_TRAP: u8 = 0x03;
pub const MSG_START_SIN_SWEEP: u8 = 0x04;

/// Largest payload of any message.
pub const MAX_PAYLOAD_LEN: usize = 24;

/// Payload length for a message ID, `None` for unknown IDs.
pub const fn payload_len(id: u8) -> Option<usize> {
    match id {
        MSG_STOP => Some(0),
        MSG_SET_ANGLE => Some(4),
        MSG_START_SIN => Some(12),
        MSG_START_TRAP => Some(16),
        MSG_START_SIN_SWEEP => Some(MAX_PAYLOAD_LEN),
        _ => None,
    }
}

/// Parameters of a fixed-period sinusoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinParams {
    pub angle_min_deg: f32,
    pub angle_max_deg: f32,
    pub period_s: f32,
}

/// Parameters of a swept-frequency sinusoid.
///
/// The sweep starts at `period_max_s` and steps down to `period_min_s` over `n_periods` stages,
/// each held for `n_cycles_per_period` full cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinSweepParams {
    pub angle_min_deg: f32,
    pub angle_max_deg: f32,
    pub period_min_s: f32,
    pub period_max_s: f32,
    pub n_periods: u32,
    pub n_cycles_per_period: u32,
}

/// Parameters of a trapezoidal profile. Decoded for compatibility, not generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapParams {
    pub angle_min_deg: f32,
    pub angle_max_deg: f32,
    pub period_s: f32,
    pub plateau_s: f32,
}

/// Decoded host command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Nothing (or nothing valid) was received.
    NoCmd,
    Stop,
    SetAngle(f32),
    StartSin(SinParams),
    StartTrap(TrapParams),
    StartSinSweep(SinSweepParams),
}
