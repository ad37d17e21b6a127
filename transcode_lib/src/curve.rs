//! Byte layouts of bn254 points as the on-chain verifier consumes them.
//!
//! Coordinates arrive as plain integers and are only re-packaged here. The
//! arkworks conversions at the bottom exist to validate points and to negate
//! `A` for the syscall layout; no layout is derived from them.

use ark_bn254::{Fq2, G1Affine, G2Affine};
use ark_serialize::CanonicalSerialize;
use num_bigint::BigUint;

use crate::config::Compat;
use crate::error::{Result, TranscodeError};
use crate::field::{Endianness, FIELD_ELEMENT_WIDTH, encode_coordinate};
use crate::util::{fq, fq2, fq_to_biguint};

pub const G1_BYTES: usize = 2 * FIELD_ELEMENT_WIDTH;
pub const G2_BYTES: usize = 4 * FIELD_ELEMENT_WIDTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct G1Point {
    pub x: BigUint,
    pub y: BigUint,
}

/// A point over the quadratic extension. Each coordinate is `[c0, c1]`, which
/// is the order the prover writes them: `pi_b[0]` is `x`, `pi_b[1]` is `y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct G2Point {
    pub x: [BigUint; 2],
    pub y: [BigUint; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum G2Layout {
    /// `x.c0, y.c0, x.c1, y.c1`, each little-endian. Instruction argument layout.
    Direct,
    /// `x.c1, x.c0, y.c1, y.c0`, each big-endian: every coordinate pair is
    /// encoded little-endian as one 64-byte unit, reversed whole and re-split.
    LibraryAdapter,
}

/// x then y, both in `endianness`.
pub fn encode_g1(
    point: &G1Point,
    endianness: Endianness,
    compat: Compat,
) -> Result<[u8; G1_BYTES]> {
    let mut out = [0u8; G1_BYTES];
    out[..32].copy_from_slice(&encode_coordinate(&point.x, endianness, compat)?);
    out[32..].copy_from_slice(&encode_coordinate(&point.y, endianness, compat)?);
    Ok(out)
}

pub fn encode_g2(point: &G2Point, layout: G2Layout, compat: Compat) -> Result<[u8; G2_BYTES]> {
    let limbs: [[u8; 32]; 4] = match layout {
        G2Layout::Direct => {
            let le = |v: &BigUint| encode_coordinate(v, Endianness::Little, compat);
            [le(&point.x[0])?, le(&point.y[0])?, le(&point.x[1])?, le(&point.y[1])?]
        }
        G2Layout::LibraryAdapter => {
            let [x_hi, x_lo] = adapt_pair(&point.x, compat)?;
            let [y_hi, y_lo] = adapt_pair(&point.y, compat)?;
            [x_hi, x_lo, y_hi, y_lo]
        }
    };
    let mut out = [0u8; G2_BYTES];
    for (chunk, limb) in out.chunks_exact_mut(FIELD_ELEMENT_WIDTH).zip(limbs.iter()) {
        chunk.copy_from_slice(limb);
    }
    Ok(out)
}

/// Library-adapter step for one `[c0, c1]` pair.
///
/// `le(c0) || le(c1)` reversed as a single 64-byte buffer and split at 32,
/// which leaves `be(c1)` followed by `be(c0)`.
pub fn adapt_pair(pair: &[BigUint; 2], compat: Compat) -> Result<[[u8; 32]; 2]> {
    let mut combined = [0u8; 2 * FIELD_ELEMENT_WIDTH];
    combined[..32].copy_from_slice(&encode_coordinate(&pair[0], Endianness::Little, compat)?);
    combined[32..].copy_from_slice(&encode_coordinate(&pair[1], Endianness::Little, compat)?);
    combined.reverse();

    let mut first = [0u8; 32];
    let mut second = [0u8; 32];
    first.copy_from_slice(&combined[..32]);
    second.copy_from_slice(&combined[32..]);
    Ok([first, second])
}

/* ---------- curve collaborator ------------------------------------------ */

impl G1Point {
    pub fn new(x: impl Into<BigUint>, y: impl Into<BigUint>) -> Self {
        Self { x: x.into(), y: y.into() }
    }

    pub fn from_affine(point: &G1Affine) -> Self {
        Self {
            x: fq_to_biguint(&point.x),
            y: fq_to_biguint(&point.y),
        }
    }

    /// Parses into arkworks form, rejecting coordinates outside the field and
    /// points that are not in the prime order subgroup.
    pub fn to_affine(&self, what: &str) -> Result<G1Affine> {
        let point = G1Affine::new_unchecked(fq(&self.x, what)?, fq(&self.y, what)?);
        if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(TranscodeError::NotOnCurve(what.to_string()));
        }
        Ok(point)
    }
}

impl G2Point {
    pub fn from_affine(point: &G2Affine) -> Self {
        let pair = |v: &Fq2| [fq_to_biguint(&v.c0), fq_to_biguint(&v.c1)];
        Self {
            x: pair(&point.x),
            y: pair(&point.y),
        }
    }

    pub fn to_affine(&self, what: &str) -> Result<G2Affine> {
        let point = G2Affine::new_unchecked(fq2(&self.x, what)?, fq2(&self.y, what)?);
        if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(TranscodeError::NotOnCurve(what.to_string()));
        }
        Ok(point)
    }
}

/// Arkworks keeps the sign and infinity flags in the top two bits of the last
/// byte of `y`. Coordinates are below 2^254, so clearing them leaves plain limbs.
const FLAG_MASK: u8 = 0b0011_1111;

/// Uncompressed little-endian x then y, 64 bytes, flags cleared.
pub fn g1_uncompressed(point: &G1Affine) -> Result<Vec<u8>> {
    let mut writer = Vec::with_capacity(G1_BYTES);
    point.serialize_uncompressed(&mut writer)?;
    clear_flags(&mut writer);
    Ok(writer)
}

/// Uncompressed `x.c0, x.c1, y.c0, y.c1` little-endian, 128 bytes, flags cleared.
pub fn g2_uncompressed(point: &G2Affine) -> Result<Vec<u8>> {
    let mut writer = Vec::with_capacity(G2_BYTES);
    point.serialize_uncompressed(&mut writer)?;
    clear_flags(&mut writer);
    Ok(writer)
}

fn clear_flags(bytes: &mut [u8]) {
    if let Some(last) = bytes.last_mut() {
        *last &= FLAG_MASK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{convert_endianness, decode};
    use ark_bn254::{Fr, G1Projective, G2Projective};
    use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};

    fn le32(v: u64) -> Vec<u8> {
        let mut out = v.to_le_bytes().to_vec();
        out.resize(32, 0);
        out
    }

    fn g1_multiple(k: u64) -> G1Affine {
        (G1Projective::generator() * Fr::from(k)).into_affine()
    }

    fn g2_multiple(k: u64) -> G2Affine {
        (G2Projective::generator() * Fr::from(k)).into_affine()
    }

    #[test]
    fn g1_is_x_then_y() {
        let point = G1Point::new(1u32, 2u32);
        let bytes = encode_g1(&point, Endianness::Little, Compat::Strict).unwrap();
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[..32], le32(1).as_slice());
        assert_eq!(&bytes[32..], le32(2).as_slice());

        let be = encode_g1(&G1Point::new(1u32, 2u32), Endianness::Big, Compat::Strict).unwrap();
        assert_eq!(be[31], 1);
        assert_eq!(be[63], 2);
    }

    #[test]
    fn direct_g2_interleaves_the_limbs() {
        let point = G2Point {
            x: [BigUint::from(3u32), BigUint::from(4u32)],
            y: [BigUint::from(5u32), BigUint::from(6u32)],
        };
        let bytes = encode_g2(&point, G2Layout::Direct, Compat::Strict).unwrap();
        let expected = [le32(3), le32(5), le32(4), le32(6)].concat();
        assert_eq!(bytes.to_vec(), expected);
    }

    #[test]
    fn adapter_swaps_and_reverses_each_pair() {
        let pair = [BigUint::from(0x0102u32), BigUint::from(0x0304u32)];
        let [first, second] = adapt_pair(&pair, Compat::Strict).unwrap();
        assert_eq!(decode(&first, Endianness::Big), BigUint::from(0x0304u32));
        assert_eq!(decode(&second, Endianness::Big), BigUint::from(0x0102u32));
        assert_eq!(&first[30..], &[0x03, 0x04]);
    }

    #[test]
    fn overflowing_coordinate_fails_the_whole_point() {
        let wide = BigUint::from(1u32) << 256;
        let point = G1Point { x: wide, y: BigUint::from(1u32) };
        assert!(matches!(
            encode_g1(&point, Endianness::Little, Compat::Strict),
            Err(TranscodeError::Overflow { .. })
        ));
        assert!(encode_g1(&point, Endianness::Little, Compat::Legacy).is_ok());
    }

    #[test]
    fn little_endian_g1_matches_arkworks_uncompressed() {
        for k in [1, 2, 7, 191, 1337] {
            let affine = g1_multiple(k);
            let point = G1Point::from_affine(&affine);
            let ours = encode_g1(&point, Endianness::Little, Compat::Strict).unwrap();
            assert_eq!(ours.to_vec(), g1_uncompressed(&affine).unwrap());
        }
    }

    #[test]
    fn adapter_g2_is_arkworks_uncompressed_with_64_byte_chunks_reversed() {
        for k in [1, 5, 42] {
            let affine = g2_multiple(k);
            let point = G2Point::from_affine(&affine);
            let ours = encode_g2(&point, G2Layout::LibraryAdapter, Compat::Strict).unwrap();
            let ark = g2_uncompressed(&affine).unwrap();
            assert_eq!(ours.to_vec(), convert_endianness(&ark, 64));
        }
    }

    #[test]
    fn affine_round_trip_and_validation() {
        let affine = g1_multiple(9);
        assert_eq!(G1Point::from_affine(&affine).to_affine("a").unwrap(), affine);

        let g2 = g2_multiple(9);
        assert_eq!(G2Point::from_affine(&g2).to_affine("b").unwrap(), g2);

        assert!(matches!(
            G1Point::new(1u32, 3u32).to_affine("a"),
            Err(TranscodeError::NotOnCurve(_))
        ));
        let off_curve = G2Point {
            x: [BigUint::from(3u32), BigUint::from(4u32)],
            y: [BigUint::from(5u32), BigUint::from(6u32)],
        };
        assert!(off_curve.to_affine("b").is_err());
    }

    #[test]
    fn generator_is_one_two() {
        assert_eq!(G1Point::from_affine(&G1Affine::generator()), G1Point::new(1u32, 2u32));
        assert_eq!(g1_uncompressed(&G1Affine::zero()).unwrap(), vec![0u8; 64]);
    }
}
