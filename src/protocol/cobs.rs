// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Consistent Overhead Byte Stuffing.
//!
//! Encoding removes every zero byte from a buffer so that a single `0x00` can delimit records on
//! the wire. The encoded form never contains a zero; the delimiter is appended by the caller.
//!
//! Thin wrappers over the `cobs` crate that check buffer sizes up front and map failures onto
//! [`CobsError`].

use core::fmt;

/// COBS encoding/decoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CobsError {
    /// Output buffer cannot hold the result.
    BufferTooSmall,
    /// A zero byte was found inside an encoded block.
    ZeroByte,
    /// A block code points past the end of the input.
    Truncated,
}

impl fmt::Display for CobsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CobsError::BufferTooSmall => f.write_str("output buffer too small"),
            CobsError::ZeroByte => f.write_str("zero byte in encoded data"),
            CobsError::Truncated => f.write_str("encoded block truncated"),
        }
    }
}

/// Worst-case encoded size of `len` input bytes (delimiter excluded).
pub const fn max_encoded_len(len: usize) -> usize {
    len + len / 254 + 1
}

/// Encode `src` into `dst`, returning the encoded length.
pub fn encode(src: &[u8], dst: &mut [u8]) -> Result<usize, CobsError> {
    if dst.len() < max_encoded_len(src.len()) {
        return Err(CobsError::BufferTooSmall);
    }
    Ok(::cobs::encode(src, dst))
}

/// Decode `src` (without the trailing delimiter) into `dst`, returning the decoded length.
pub fn decode(src: &[u8], dst: &mut [u8]) -> Result<usize, CobsError> {
    if src.is_empty() {
        return Ok(0);
    }
    // The decoder treats a zero as the frame delimiter.
    if src.contains(&0) {
        return Err(CobsError::ZeroByte);
    }
    // Every block drops its code byte, so the output is at least one byte shorter.
    if dst.len() + 1 < src.len() {
        return Err(CobsError::BufferTooSmall);
    }
    ::cobs::decode(src, dst).map_err(|_| CobsError::Truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8]) {
        let mut enc = [0u8; 600];
        let mut dec = [0u8; 600];
        let n = encode(data, &mut enc).unwrap();
        assert!(n <= max_encoded_len(data.len()));
        assert!(!enc[..n].contains(&0), "encoded output contains a zero");
        let m = decode(&enc[..n], &mut dec).unwrap();
        assert_eq!(&dec[..m], data);
    }

    #[test]
    fn known_encodings() {
        let mut enc = [0u8; 16];

        let n = encode(&[], &mut enc).unwrap();
        assert_eq!(&enc[..n], &[0x01]);

        let n = encode(&[0x00], &mut enc).unwrap();
        assert_eq!(&enc[..n], &[0x01, 0x01]);

        let n = encode(&[0x00, 0x00], &mut enc).unwrap();
        assert_eq!(&enc[..n], &[0x01, 0x01, 0x01]);

        let n = encode(&[0x11, 0x22, 0x00, 0x33], &mut enc).unwrap();
        assert_eq!(&enc[..n], &[0x03, 0x11, 0x22, 0x02, 0x33]);

        // Sequence record: tag 0x03, version 0x45, sequence 0, CRC 0xF20F.
        let n = encode(&[0x03, 0x45, 0x00, 0xF2, 0x0F], &mut enc).unwrap();
        assert_eq!(&enc[..n], &[0x03, 0x03, 0x45, 0x03, 0xF2, 0x0F]);
    }

    #[test]
    fn round_trips_edge_cases() {
        round_trip(&[]);
        round_trip(&[0x00]);
        round_trip(&[0x00; 10]);
        round_trip(&[0xFF; 10]);
        round_trip(b"source-id");
    }

    #[test]
    fn round_trips_long_runs() {
        let mut data = [0u8; 520];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 255) as u8 + 1;
        }
        round_trip(&data[..253]);
        round_trip(&data[..254]);
        round_trip(&data[..255]);
        round_trip(&data);

        data[254] = 0;
        data[300] = 0;
        round_trip(&data);
    }

    #[test]
    fn full_block_has_no_implicit_zero() {
        let data = [0x01u8; 254];
        let mut enc = [0u8; 300];
        let n = encode(&data, &mut enc).unwrap();
        assert!(n <= max_encoded_len(data.len()));
        assert_eq!(enc[0], 0xFF);
        assert_eq!(&enc[1..255], &data[..]);

        let mut dec = [0u8; 300];
        let m = decode(&enc[..n], &mut dec).unwrap();
        assert_eq!(m, 254);
    }

    #[test]
    fn encode_rejects_small_buffer() {
        let mut enc = [0u8; 3];
        assert_eq!(encode(&[1, 2, 3], &mut enc), Err(CobsError::BufferTooSmall));
    }

    #[test]
    fn decode_rejects_malformed_input() {
        let mut dec = [0u8; 16];
        assert_eq!(decode(&[0x03, 0x11], &mut dec), Err(CobsError::Truncated));
        assert_eq!(decode(&[0x00, 0x11], &mut dec), Err(CobsError::ZeroByte));
        assert_eq!(decode(&[0x03, 0x00, 0x11], &mut dec), Err(CobsError::ZeroByte));
        assert_eq!(decode(&[0x03, 0x11, 0x22], &mut [0u8; 1]), Err(CobsError::BufferTooSmall));
    }
}
