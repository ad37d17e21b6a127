use num_bigint::BigUint;

use crate::config::Compat;
use crate::error::{Result, TranscodeError};

/// Byte width of a bn254 base field element.
pub const FIELD_ELEMENT_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Encodes `value` into exactly `width` bytes.
///
/// Under `Compat::Strict` a value that needs more than `width` bytes is an
/// `Overflow` error. `Compat::Legacy` keeps the low `width` bytes and drops the rest.
pub fn encode(
    value: &BigUint,
    width: usize,
    endianness: Endianness,
    compat: Compat,
) -> Result<Vec<u8>> {
    if width == 0 {
        return Err(TranscodeError::ZeroWidth);
    }
    let mut bytes = value.to_bytes_le();
    if bytes.len() > width {
        match compat {
            Compat::Strict => {
                return Err(TranscodeError::Overflow {
                    needed: bytes.len(),
                    width,
                });
            }
            Compat::Legacy => bytes.truncate(width),
        }
    }
    bytes.resize(width, 0);
    if endianness == Endianness::Big {
        bytes.reverse();
    }
    Ok(bytes)
}

pub fn decode(bytes: &[u8], endianness: Endianness) -> BigUint {
    match endianness {
        Endianness::Little => BigUint::from_bytes_le(bytes),
        Endianness::Big => BigUint::from_bytes_be(bytes),
    }
}

/// One curve coordinate at the base field width.
pub(crate) fn encode_coordinate(
    value: &BigUint,
    endianness: Endianness,
    compat: Compat,
) -> Result<[u8; FIELD_ELEMENT_WIDTH]> {
    let mut out = [0u8; FIELD_ELEMENT_WIDTH];
    out.copy_from_slice(&encode(value, FIELD_ELEMENT_WIDTH, endianness, compat)?);
    Ok(out)
}

/// Public inputs are handed to the verifier as big-endian 32-byte words.
pub fn encode_public_input(value: &BigUint) -> Result<[u8; FIELD_ELEMENT_WIDTH]> {
    encode_coordinate(value, Endianness::Big, Compat::Strict)
}

/// Reverses the byte order inside every `chunk_size` chunk; a trailing partial chunk is dropped.
pub fn convert_endianness(bytes: &[u8], chunk_size: usize) -> Vec<u8> {
    bytes
        .chunks_exact(chunk_size)
        .flat_map(|chunk| chunk.iter().rev().copied())
        .collect()
}
