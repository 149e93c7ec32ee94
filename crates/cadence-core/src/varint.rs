//! Unsigned LEB128 varints for 32-bit values.
//!
//! Protobuf-style: 7 payload bits per byte, least significant group first,
//! MSB set on every byte except the last. A `u32` needs at most 5 bytes.
//! Decoding rejects anything longer, and rejects a fifth byte whose payload
//! would overflow 32 bits, instead of silently truncating.

use std::io::{self, Read, Write};

use crate::error::VarintError;

/// Maximum encoded length of a `u32`.
pub const MAX_VARINT_LEN: usize = 5;

/// Number of bytes `value` occupies when encoded.
pub fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Encode `value` into `buf`.
pub fn encode_u32(buf: &mut Vec<u8>, mut value: u32) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Encode `value` into a writer.
pub fn write_u32(w: &mut dyn Write, value: u32) -> io::Result<()> {
    let mut scratch = Vec::with_capacity(MAX_VARINT_LEN);
    encode_u32(&mut scratch, value);
    w.write_all(&scratch)
}

/// Decode one varint from a reader.
pub fn read_u32(r: &mut dyn Read) -> Result<u32, VarintError> {
    let mut result: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => VarintError::UnexpectedEof,
            _ => VarintError::Io(e),
        })?;
        let payload = (byte[0] & 0x7F) as u32;
        // Only 4 bits of the fifth group fit in a u32.
        if i == MAX_VARINT_LEN - 1 && payload > 0x0F {
            return Err(VarintError::Overflow);
        }
        result |= payload << (7 * i);
        if byte[0] & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(VarintError::Overflow)
}
