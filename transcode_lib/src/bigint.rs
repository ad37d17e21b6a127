//! Structural walk turning the prover's string-encoded integers into `BigUint`s.
//!
//! | input leaf                         | output                    |
//! |------------------------------------|---------------------------|
//! | string matching `^[0-9]+$`         | `Int` (decimal)           |
//! | string matching `^0x[0-9a-fA-F]+$` | `Int` (hex)               |
//! | any other string                   | `Str`, unchanged          |
//! | number, bool, null                 | unchanged                 |
//! | array                              | element-wise              |
//! | object                             | value-wise, keys in order |
//!
//! Nothing here fails: leaves that do not look numeric are passed through.

use num_bigint::BigUint;
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Unstringified {
    Int(BigUint),
    Str(String),
    Number(Number),
    Bool(bool),
    Null,
    Array(Vec<Unstringified>),
    Object(Vec<(String, Unstringified)>),
}

/// Parses `s` if it is a decimal digit string or a `0x`-prefixed hex string.
pub fn parse_bigint(s: &str) -> Option<BigUint> {
    if let Some(hex) = s.strip_prefix("0x") {
        if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return BigUint::parse_bytes(hex.as_bytes(), 16);
        }
        return None;
    }
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return BigUint::parse_bytes(s.as_bytes(), 10);
    }
    None
}

pub fn unstringify_bigints(value: Value) -> Unstringified {
    Unstringified::from(value).unstringify()
}

impl From<Value> for Unstringified {
    /// Lifts a JSON value without converting any string.
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Unstringified::Str(s),
            Value::Number(n) => Unstringified::Number(n),
            Value::Bool(b) => Unstringified::Bool(b),
            Value::Null => Unstringified::Null,
            Value::Array(items) => {
                Unstringified::Array(items.into_iter().map(Unstringified::from).collect())
            }
            Value::Object(map) => Unstringified::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Unstringified::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Unstringified {
    /// Applies the rule table above. A second application is a no-op.
    pub fn unstringify(self) -> Self {
        match self {
            Unstringified::Str(s) => match parse_bigint(&s) {
                Some(n) => Unstringified::Int(n),
                None => Unstringified::Str(s),
            },
            Unstringified::Array(items) => {
                Unstringified::Array(items.into_iter().map(Self::unstringify).collect())
            }
            Unstringified::Object(entries) => Unstringified::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.unstringify()))
                    .collect(),
            ),
            leaf => leaf,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Unstringified> {
        match self {
            Unstringified::Object(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigUint> {
        match self {
            Unstringified::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Unstringified]> {
        match self {
            Unstringified::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Unstringified::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_decimal_and_hex_leaves() {
        assert_eq!(parse_bigint("0"), Some(BigUint::from(0u32)));
        assert_eq!(parse_bigint("1337"), Some(BigUint::from(1337u32)));
        assert_eq!(parse_bigint("0xff"), Some(BigUint::from(255u32)));
        assert_eq!(parse_bigint("0xAbC"), Some(BigUint::from(0xabcu32)));
    }

    #[test]
    fn rejects_non_numeric_strings() {
        for s in ["", "0x", "-1", "+1", "1.5", "0X1f", "12a", " 1", "groth16", "0xfg"] {
            assert_eq!(parse_bigint(s), None, "{s:?}");
        }
    }

    #[test]
    fn preserves_shape_and_key_order() {
        let input = json!({
            "protocol": "groth16",
            "nPublic": 1,
            "pi_a": ["1", "0x2", "1"],
            "nested": [["3", ["4"]], {"z": "5", "a": null, "m": true}],
        });
        let out = unstringify_bigints(input);

        let keys: Vec<&str> = match &out {
            Unstringified::Object(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            other => panic!("expected object, got {other:?}"),
        };
        assert_eq!(keys, ["protocol", "nPublic", "pi_a", "nested"]);

        assert_eq!(out.get("protocol"), Some(&Unstringified::Str("groth16".into())));
        assert_eq!(out.get("nPublic").and_then(Unstringified::as_u64), Some(1));

        let pi_a = out.get("pi_a").and_then(Unstringified::as_array).unwrap();
        assert_eq!(pi_a.len(), 3);
        assert_eq!(pi_a[1].as_int(), Some(&BigUint::from(2u32)));

        let nested = out.get("nested").and_then(Unstringified::as_array).unwrap();
        assert_eq!(nested.len(), 2);
        let inner = nested[0].as_array().unwrap();
        assert_eq!(inner[1].as_array().unwrap()[0].as_int(), Some(&BigUint::from(4u32)));
        let object_keys: Vec<&str> = match &nested[1] {
            Unstringified::Object(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            other => panic!("expected object, got {other:?}"),
        };
        assert_eq!(object_keys, ["z", "a", "m"]);
        assert_eq!(nested[1].get("a"), Some(&Unstringified::Null));
        assert_eq!(nested[1].get("m"), Some(&Unstringified::Bool(true)));
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let once = unstringify_bigints(json!({
            "IC": [["0x10", "20", "1"]],
            "curve": "bn128",
            "n": 3.5,
        }));
        assert_eq!(once.clone().unstringify(), once);
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(unstringify_bigints(json!("bn128")), Unstringified::Str("bn128".into()));
        assert_eq!(unstringify_bigints(json!(null)), Unstringified::Null);
        assert_eq!(unstringify_bigints(json!(false)), Unstringified::Bool(false));
        let modulus =
            "21888242871839275222246405745257275088696311157297823662689037894645226208583";
        assert_eq!(
            unstringify_bigints(json!(modulus)),
            Unstringified::Int(BigUint::parse_bytes(modulus.as_bytes(), 10).unwrap())
        );
    }
}
