//! Shape checks over unstringified artifacts and conversions into arkworks field types.
use ark_bn254::{Fq, Fq2};
use ark_ff::{BigInteger256, PrimeField};
use num_bigint::BigUint;

use crate::bigint::Unstringified;
use crate::curve::{G1Point, G2Point};
use crate::error::{Result, TranscodeError};

/* ---------- shape checks ------------------------------------------------ */

pub(crate) fn section<'a>(root: &'a Unstringified, key: &str) -> Result<&'a [Unstringified]> {
    root.get(key)
        .ok_or_else(|| TranscodeError::MissingKey(key.to_string()))?
        .as_array()
        .ok_or_else(|| TranscodeError::shape(key, "expected an array"))
}

fn int<'a>(value: &'a Unstringified, key: &str) -> Result<&'a BigUint> {
    value.as_int().ok_or_else(|| {
        TranscodeError::shape(key, format!("expected an integer string, found {value:?}"))
    })
}

/// `[x, y, z]` style coordinate list, any length.
pub(crate) fn ints(items: &[Unstringified], key: &str) -> Result<Vec<BigUint>> {
    items.iter().map(|item| int(item, key).cloned()).collect()
}

/// `[[c0, c1], [c0, c1], ...]` style list of quadratic extension elements.
pub(crate) fn pairs(items: &[Unstringified], key: &str) -> Result<Vec<[BigUint; 2]>> {
    items
        .iter()
        .map(|item| match item.as_array() {
            Some([c0, c1]) => Ok([int(c0, key)?.clone(), int(c1, key)?.clone()]),
            Some(other) => Err(TranscodeError::shape(
                key,
                format!("expected a pair, found {} entries", other.len()),
            )),
            None => Err(TranscodeError::shape(key, "expected a pair array")),
        })
        .collect()
}

pub(crate) fn nested_arrays<'a>(
    value: &'a Unstringified,
    key: &str,
) -> Result<&'a [Unstringified]> {
    value
        .as_array()
        .ok_or_else(|| TranscodeError::shape(key, "expected a nested array"))
}

/// Requires at least `n` entries and returns the first `n`.
pub(crate) fn leading<'a, T>(items: &'a [T], n: usize, key: &str) -> Result<&'a [T]> {
    if items.len() < n {
        return Err(TranscodeError::shape(
            key,
            format!("expected at least {n} entries, found {}", items.len()),
        ));
    }
    Ok(&items[..n])
}

/// Affine G1 point from the leading `[x, y]` of a coordinate list.
pub(crate) fn g1_from_vec(items: &[Unstringified], key: &str) -> Result<G1Point> {
    let coords = ints(leading(items, 2, key)?, key)?;
    let [x, y] = <[BigUint; 2]>::try_from(coords)
        .map_err(|_| TranscodeError::shape(key, "expected two coordinates"))?;
    Ok(G1Point { x, y })
}

/// Affine G2 point from the leading `[[x.c0, x.c1], [y.c0, y.c1]]` of a pair list.
pub(crate) fn g2_from_vecs(items: &[Unstringified], key: &str) -> Result<G2Point> {
    let coords = pairs(leading(items, 2, key)?, key)?;
    let [x, y] = <[[BigUint; 2]; 2]>::try_from(coords)
        .map_err(|_| TranscodeError::shape(key, "expected two coordinate pairs"))?;
    Ok(G2Point { x, y })
}

/* ---------- arkworks conversions ---------------------------------------- */

pub fn fq(value: &BigUint, what: &str) -> Result<Fq> {
    BigInteger256::try_from(value.clone())
        .ok()
        .and_then(Fq::from_bigint)
        .ok_or_else(|| TranscodeError::NotInField(what.to_string()))
}

pub fn fq2(pair: &[BigUint; 2], what: &str) -> Result<Fq2> {
    Ok(Fq2::new(fq(&pair[0], what)?, fq(&pair[1], what)?))
}

pub fn fq_to_biguint(value: &Fq) -> BigUint {
    value.into_bigint().into()
}
