// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Message parser for the rig command protocol.
//!
//! The parser is a byte-at-a-time state machine. It keeps its state between calls, so a frame may
//! arrive split across several loop ticks. [`Parser::poll`] stops reading as soon as one frame
//! resolves, leaving any following bytes in the stream for the next tick.

use crate::interfaces::ByteStream;
use crate::protocol::checksum::checksum8;
use crate::protocol::messages::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WaitHeader,
    WaitId,
    Payload { id: u8, len: usize, idx: usize },
    WaitChecksum { id: u8, len: usize },
}

/// A checksum-validated frame: message ID plus its raw payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    id: u8,
    len: usize,
    payload: [u8; MAX_PAYLOAD_LEN],
}

impl Frame {
    /// Message ID.
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Raw payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.len]
    }

    #[inline]
    fn f32_at(&self, offset: usize) -> f32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.payload[offset..offset + 4]);
        f32::from_le_bytes(bytes)
    }

    #[inline]
    fn u32_at(&self, offset: usize) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.payload[offset..offset + 4]);
        u32::from_le_bytes(bytes)
    }

    // The accessors below read fixed offsets and are only meaningful for the matching ID.

    /// `SET_ANGLE` payload.
    pub fn target_angle(&self) -> f32 {
        self.f32_at(0)
    }

    /// `START_SIN` payload.
    pub fn sin_params(&self) -> SinParams {
        SinParams {
            angle_min_deg: self.f32_at(0),
            angle_max_deg: self.f32_at(4),
            period_s: self.f32_at(8),
        }
    }

    /// `START_SIN_SWEEP` payload.
    pub fn sin_sweep_params(&self) -> SinSweepParams {
        SinSweepParams {
            angle_min_deg: self.f32_at(0),
            angle_max_deg: self.f32_at(4),
            period_min_s: self.f32_at(8),
            period_max_s: self.f32_at(12),
            n_periods: self.u32_at(16),
            n_cycles_per_period: self.u32_at(20),
        }
    }

    /// `START_TRAP` payload.
    pub fn trap_params(&self) -> TrapParams {
        TrapParams {
            angle_min_deg: self.f32_at(0),
            angle_max_deg: self.f32_at(4),
            period_s: self.f32_at(8),
            plateau_s: self.f32_at(12),
        }
    }

    /// Decode into a typed command.
    pub fn command(&self) -> Command {
        match self.id {
            MSG_STOP => Command::Stop,
            MSG_SET_ANGLE => Command::SetAngle(self.target_angle()),
            MSG_START_SIN => Command::StartSin(self.sin_params()),
            MSG_START_TRAP => Command::StartTrap(self.trap_params()),
            MSG_START_SIN_SWEEP => Command::StartSinSweep(self.sin_sweep_params()),
            _ => Command::NoCmd,
        }
    }
}

pub struct Parser {
    state: State,
    buf: [u8; MAX_PAYLOAD_LEN],
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::WaitHeader,
            buf: [0; MAX_PAYLOAD_LEN],
        }
    }

    /// Drop any partially received frame.
    pub fn reset(&mut self) {
        self.state = State::WaitHeader;
    }

    /// True while a frame is partially received.
    pub fn in_frame(&self) -> bool {
        self.state != State::WaitHeader
    }

    /// Process a single incoming byte. Returns `Some(Frame)` if a complete, valid frame is received.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            State::WaitHeader => {
                if byte == HEADER_BYTE {
                    self.state = State::WaitId;
                }
            }
            State::WaitId => match payload_len(byte) {
                Some(0) => self.state = State::WaitChecksum { id: byte, len: 0 },
                Some(len) => {
                    self.state = State::Payload {
                        id: byte,
                        len,
                        idx: 0,
                    }
                }
                // Unknown message ID, resync on the next header
                None => self.state = State::WaitHeader,
            },
            State::Payload { id, len, idx } => {
                self.buf[idx] = byte;
                self.state = if idx + 1 == len {
                    State::WaitChecksum { id, len }
                } else {
                    State::Payload {
                        id,
                        len,
                        idx: idx + 1,
                    }
                };
            }
            State::WaitChecksum { id, len } => {
                self.state = State::WaitHeader;

                let expected = checksum8(&[id]).wrapping_add(checksum8(&self.buf[..len]));
                if byte == expected {
                    let mut payload = [0u8; MAX_PAYLOAD_LEN];
                    payload[..len].copy_from_slice(&self.buf[..len]);
                    return Some(Frame { id, len, payload });
                }
            }
        }
        None
    }

    /// Read from `stream` until one frame resolves or the stream runs dry.
    ///
    /// Returns at most one command per call; invalid or incomplete frames yield
    /// [`Command::NoCmd`].
    pub fn poll<S: ByteStream>(&mut self, stream: &mut S) -> Command {
        while stream.available() > 0 {
            let Some(byte) = stream.read() else {
                break;
            };
            if let Some(frame) = self.push(byte) {
                return frame.command();
            }
        }
        Command::NoCmd
    }
}
