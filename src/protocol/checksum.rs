// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Integrity checks used on the host link.
//!
//! - [`checksum8`] - additive checksum on inbound command frames
//! - [`crc16`] - CRC-16 (poly `0x011B`, init 0, no reflection, no final XOR) on telemetry records

/// Low 8 bits of the sum of all bytes.
pub fn checksum8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Generator polynomial of the telemetry CRC.
pub const CRC16_POLY: u16 = 0x011B;

/// Nibble lookup table, four bits per step.
const CRC16_TABLE: [u16; 16] = crc16_table(CRC16_POLY);

const fn crc16_table(poly: u16) -> [u16; 16] {
    let mut table = [0u16; 16];
    let mut i = 0;
    while i < 16 {
        let mut crc = (i as u16) << 12;
        let mut bit = 0;
        while bit < 4 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ poly
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Continue a CRC over more data.
pub fn crc16_update(mut crc: u16, data: &[u8]) -> u16 {
    for &b in data {
        let idx = (crc >> 12) ^ (b >> 4) as u16;
        crc = CRC16_TABLE[(idx & 0x0F) as usize] ^ (crc << 4);
        let idx = (crc >> 12) ^ (b & 0x0F) as u16;
        crc = CRC16_TABLE[(idx & 0x0F) as usize] ^ (crc << 4);
    }
    crc
}

/// CRC of a complete buffer.
#[inline]
pub fn crc16(data: &[u8]) -> u16 {
    crc16_update(0, data)
}
