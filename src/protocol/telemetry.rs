// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Framed binary telemetry.
//!
//! Each record is `[tag][payload][crc16 big-endian]`, COBS-encoded and terminated by a single
//! `0x00`. The CRC covers tag and payload. A lone `0x00` is written when the stream is opened so
//! the receiver can drop whatever partial record it was holding.

use core::fmt;

use crate::interfaces::ByteStream;
use crate::protocol::checksum::crc16;
use crate::protocol::cobs::{self, CobsError};

/// Magic byte identifying telemetry format 0.3.
pub const VERSION_MARKER: u8 = 0x45;

// Message tags
pub const MSG_TAG_SOURCE_ID: u8 = 0x02;
pub const MSG_TAG_SEQUENCE: u8 = 0x03;
pub const MSG_TAG_TIME_LOCAL: u8 = 0x12;
pub const MSG_TAG_DEBUG_VALUES: u8 = 0x7A;

/// Largest payload of a single record.
pub const MAX_PAYLOAD_LEN: usize = 255;

const MAX_RAW_LEN: usize = 1 + MAX_PAYLOAD_LEN + 2;

/// Largest record on the wire, delimiter included.
pub const MAX_RECORD_LEN: usize = cobs::max_encoded_len(MAX_RAW_LEN) + 1;

/// Telemetry framing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryError {
    /// Payload longer than [`MAX_PAYLOAD_LEN`].
    PayloadTooLong(usize),
    Cobs(CobsError),
    /// Decoded record shorter than tag + CRC.
    TooShort,
    CrcMismatch,
}

impl From<CobsError> for TelemetryError {
    fn from(e: CobsError) -> Self {
        TelemetryError::Cobs(e)
    }
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::PayloadTooLong(len) => {
                write!(f, "payload is {} bytes, max {}", len, MAX_PAYLOAD_LEN)
            }
            TelemetryError::Cobs(e) => write!(f, "cobs: {}", e),
            TelemetryError::TooShort => f.write_str("record too short"),
            TelemetryError::CrcMismatch => f.write_str("record failed CRC check"),
        }
    }
}

/// A decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub tag: u8,
    pub payload: &'a [u8],
}

/// Frame one record into `out` (delimiter included), returning its length.
pub fn encode_record(tag: u8, payload: &[u8], out: &mut [u8]) -> Result<usize, TelemetryError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(TelemetryError::PayloadTooLong(payload.len()));
    }

    let mut raw = [0u8; MAX_RAW_LEN];
    let body_len = 1 + payload.len();
    raw[0] = tag;
    raw[1..body_len].copy_from_slice(payload);
    let crc = crc16(&raw[..body_len]);
    raw[body_len..body_len + 2].copy_from_slice(&crc.to_be_bytes());

    let n = cobs::encode(&raw[..body_len + 2], out)?;
    *out.get_mut(n).ok_or(CobsError::BufferTooSmall)? = 0;
    Ok(n + 1)
}

/// Decode one record (delimiter stripped) into `scratch` and verify its CRC.
pub fn decode_record<'a>(
    encoded: &[u8],
    scratch: &'a mut [u8],
) -> Result<Record<'a>, TelemetryError> {
    let n = cobs::decode(encoded, scratch)?;
    if n < 3 {
        return Err(TelemetryError::TooShort);
    }
    let raw = &scratch[..n];
    if crc16(raw) != 0 {
        return Err(TelemetryError::CrcMismatch);
    }
    Ok(Record {
        tag: raw[0],
        payload: &raw[1..n - 2],
    })
}

/// Serializes records onto a byte stream.
///
/// The stream is passed to each method so the same link can also carry inbound commands.
pub struct TelemetryWriter {
    sequence: u8,
}

impl TelemetryWriter {
    /// Open the telemetry stream by writing the leading framing byte.
    pub fn open<S: ByteStream>(stream: &mut S) -> Self {
        stream.write(&[0]);
        Self { sequence: 0 }
    }

    /// Current sequence number. Advances by one per record written, wrapping at 256.
    #[inline]
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Write one record, returning the number of bytes the stream accepted.
    ///
    /// A short count means the record was truncated on the wire; the receiver drops it on CRC.
    pub fn write_message<S: ByteStream>(
        &mut self,
        stream: &mut S,
        tag: u8,
        payload: &[u8],
    ) -> Result<usize, TelemetryError> {
        let mut record = [0u8; MAX_RECORD_LEN];
        let n = encode_record(tag, payload, &mut record)?;
        let written = stream.write(&record[..n]);
        self.sequence = self.sequence.wrapping_add(1);
        Ok(written)
    }

    /// Version marker and sequence number, so the receiver can detect lost records.
    pub fn write_sequence_message<S: ByteStream>(
        &mut self,
        stream: &mut S,
    ) -> Result<usize, TelemetryError> {
        let payload = [VERSION_MARKER, self.sequence];
        self.write_message(stream, MSG_TAG_SEQUENCE, &payload)
    }

    pub fn write_source_id<S: ByteStream>(
        &mut self,
        stream: &mut S,
        source_id: &str,
    ) -> Result<usize, TelemetryError> {
        self.write_message(stream, MSG_TAG_SOURCE_ID, source_id.as_bytes())
    }

    pub fn write_time_local<S: ByteStream>(
        &mut self,
        stream: &mut S,
        now_micros: u32,
    ) -> Result<usize, TelemetryError> {
        self.write_message(stream, MSG_TAG_TIME_LOCAL, &now_micros.to_le_bytes())
    }

    /// Debug value: channel index followed by a little-endian `f32`.
    pub fn write_debug_value<S: ByteStream>(
        &mut self,
        stream: &mut S,
        channel: u8,
        value: f32,
    ) -> Result<usize, TelemetryError> {
        let mut payload = [0u8; 5];
        payload[0] = channel;
        payload[1..].copy_from_slice(&value.to_le_bytes());
        self.write_message(stream, MSG_TAG_DEBUG_VALUES, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Captures everything written, accepting at most `limit` bytes per call.
    struct Sink {
        data: [u8; 1024],
        len: usize,
        limit: usize,
    }

    impl Sink {
        fn new() -> Self {
            Self {
                data: [0; 1024],
                len: 0,
                limit: usize::MAX,
            }
        }

        fn bytes(&self) -> &[u8] {
            &self.data[..self.len]
        }
    }

    impl ByteStream for Sink {
        fn available(&mut self) -> usize {
            0
        }

        fn read(&mut self) -> Option<u8> {
            None
        }

        fn write(&mut self, bytes: &[u8]) -> usize {
            let n = bytes.len().min(self.limit).min(self.data.len() - self.len);
            self.data[self.len..self.len + n].copy_from_slice(&bytes[..n]);
            self.len += n;
            n
        }
    }

    #[test]
    fn open_writes_single_framing_byte() {
        let mut sink = Sink::new();
        let writer = TelemetryWriter::open(&mut sink);
        assert_eq!(sink.bytes(), &[0x00]);
        assert_eq!(writer.sequence(), 0);
    }

    #[test]
    fn sequence_record_matches_reference_bytes() {
        let mut sink = Sink::new();
        let mut writer = TelemetryWriter::open(&mut sink);
        let n = writer.write_sequence_message(&mut sink).unwrap();
        assert_eq!(n, 7);
        assert_eq!(
            sink.bytes(),
            &[0x00, 0x03, 0x03, 0x45, 0x03, 0xF2, 0x0F, 0x00]
        );
        assert_eq!(writer.sequence(), 1);
    }

    #[test]
    fn records_decode_back_to_tag_and_payload() {
        let mut sink = Sink::new();
        let mut writer = TelemetryWriter::open(&mut sink);
        writer.write_debug_value(&mut sink, 3, 15.0).unwrap();

        let framed = &sink.bytes()[1..];
        assert_eq!(*framed.last().unwrap(), 0);
        assert!(!framed[..framed.len() - 1].contains(&0));

        let mut scratch = [0u8; 64];
        let record = decode_record(&framed[..framed.len() - 1], &mut scratch).unwrap();
        assert_eq!(record.tag, MSG_TAG_DEBUG_VALUES);
        assert_eq!(record.payload, &[0x03, 0x00, 0x00, 0x70, 0x41]);
    }

    #[test]
    fn sequence_counts_every_record_and_wraps() {
        let mut sink = Sink::new();
        let mut writer = TelemetryWriter::open(&mut sink);
        for _ in 0..255 {
            writer.write_message(&mut Sink::new(), MSG_TAG_TIME_LOCAL, &[1, 2, 3, 4]).unwrap();
        }
        assert_eq!(writer.sequence(), 255);
        writer.write_time_local(&mut Sink::new(), 42).unwrap();
        assert_eq!(writer.sequence(), 0);
    }

    #[test]
    fn short_write_is_reported_not_retried() {
        let mut sink = Sink::new();
        let mut writer = TelemetryWriter::open(&mut sink);
        sink.limit = 3;
        let n = writer.write_source_id(&mut sink, "test-ser-x23").unwrap();
        assert_eq!(n, 3);
        assert_eq!(sink.bytes().len(), 4);
        assert_eq!(writer.sequence(), 1);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let mut sink = Sink::new();
        let mut writer = TelemetryWriter::open(&mut sink);
        let payload = [0x55u8; MAX_PAYLOAD_LEN + 1];
        assert_eq!(
            writer.write_message(&mut sink, MSG_TAG_DEBUG_VALUES, &payload),
            Err(TelemetryError::PayloadTooLong(MAX_PAYLOAD_LEN + 1))
        );
        assert_eq!(writer.sequence(), 0);
    }

    #[test]
    fn max_payload_fits_record_buffer() {
        let payload = [0u8; MAX_PAYLOAD_LEN];
        let mut out = [0u8; MAX_RECORD_LEN];
        let n = encode_record(MSG_TAG_DEBUG_VALUES, &payload, &mut out).unwrap();
        assert!(n <= MAX_RECORD_LEN);
    }

    #[test]
    fn corrupted_record_fails_crc() {
        let mut out = [0u8; 32];
        let n = encode_record(MSG_TAG_TIME_LOCAL, &[1, 2, 3, 4], &mut out).unwrap();
        // [code, 0x12, 0x01, 0x02, ...]: flip a payload bit without creating a zero
        out[3] ^= 0x80;
        let mut scratch = [0u8; 32];
        assert_eq!(
            decode_record(&out[..n - 1], &mut scratch),
            Err(TelemetryError::CrcMismatch)
        );
    }
}
