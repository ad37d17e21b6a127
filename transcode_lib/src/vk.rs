//! Verifying key JSON into a `Groth16Verifyingkey` constant for groth16-solana.

use std::fs;
use std::path::{Path, PathBuf};

use ark_bn254::Bn254;
use ark_ec::pairing::Pairing;
use ark_groth16::VerifyingKey;
use num_bigint::BigUint;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::bigint::{Unstringified, unstringify_bigints};
use crate::config::{Compat, TranscodeOptions};
use crate::curve::{G1Point, G2Point, adapt_pair};
use crate::error::{Result, TranscodeError};
use crate::field::{Endianness, FIELD_ELEMENT_WIDTH, encode_coordinate};
use crate::util::{fq_to_biguint, ints, leading, nested_arrays, pairs, section};

pub const VK_FILE_NAME: &str = "verifying_key.rs";

const ALPHABETA: &str = "vk_alphabeta_12";

type Row = [u8; FIELD_ELEMENT_WIDTH];

/// A verifying key as the trusted setup exports it, coordinates still projective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyingKeyArtifact {
    pub n_public: Option<usize>,
    pub alpha_1: Vec<BigUint>,
    pub beta_2: Vec<[BigUint; 2]>,
    pub gamma_2: Vec<[BigUint; 2]>,
    pub delta_2: Vec<[BigUint; 2]>,
    pub alphabeta_12: Option<Vec<Vec<Vec<BigUint>>>>,
    pub ic: Vec<Vec<BigUint>>,
}

impl VerifyingKeyArtifact {
    pub fn from_value(root: &Unstringified) -> Result<Self> {
        let n_public = match root.get("nPublic") {
            None => None,
            Some(value) => {
                let n = value.as_u64().ok_or_else(|| {
                    TranscodeError::shape("nPublic", "expected a non-negative integer")
                })?;
                let n = usize::try_from(n).map_err(|_| {
                    TranscodeError::shape("nPublic", format!("{n} does not fit usize"))
                })?;
                Some(n)
            }
        };

        let alphabeta_12 = match root.get(ALPHABETA) {
            None => None,
            Some(value) => Some(
                nested_arrays(value, ALPHABETA)?
                    .iter()
                    .map(|row| {
                        nested_arrays(row, ALPHABETA)?
                            .iter()
                            .map(|cell| ints(nested_arrays(cell, ALPHABETA)?, ALPHABETA))
                            .collect::<Result<Vec<_>>>()
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
        };

        let ic = section(root, "IC")?
            .iter()
            .map(|point| ints(nested_arrays(point, "IC")?, "IC"))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            n_public,
            alpha_1: ints(section(root, "vk_alpha_1")?, "vk_alpha_1")?,
            beta_2: pairs(section(root, "vk_beta_2")?, "vk_beta_2")?,
            gamma_2: pairs(section(root, "vk_gamma_2")?, "vk_gamma_2")?,
            delta_2: pairs(section(root, "vk_delta_2")?, "vk_delta_2")?,
            alphabeta_12,
            ic,
        })
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&unstringify_bigints(value))
    }

    pub fn from_arkworks(vk: &VerifyingKey<Bn254>) -> Self {
        let g1 = |p: &G1Point| vec![p.x.clone(), p.y.clone(), BigUint::from(1u32)];
        let g2 = |p: &G2Point| {
            vec![
                p.x.clone(),
                p.y.clone(),
                [BigUint::from(1u32), BigUint::from(0u32)],
            ]
        };
        Self {
            n_public: Some(vk.gamma_abc_g1.len().saturating_sub(1)),
            alpha_1: g1(&G1Point::from_affine(&vk.alpha_g1)),
            beta_2: g2(&G2Point::from_affine(&vk.beta_g2)),
            gamma_2: g2(&G2Point::from_affine(&vk.gamma_g2)),
            delta_2: g2(&G2Point::from_affine(&vk.delta_g2)),
            alphabeta_12: Some(alphabeta_12(vk)),
            ic: vk
                .gamma_abc_g1
                .iter()
                .map(|p| g1(&G1Point::from_affine(p)))
                .collect(),
        }
    }

    pub fn to_arkworks(&self) -> Result<VerifyingKey<Bn254>> {
        let g1 = |coords: &[BigUint], key: &str| -> Result<G1Point> {
            match leading(coords, 2, key)? {
                [x, y] => Ok(G1Point { x: x.clone(), y: y.clone() }),
                _ => Err(TranscodeError::shape(key, "expected two coordinates")),
            }
        };
        let g2 = |coords: &[[BigUint; 2]], key: &str| -> Result<G2Point> {
            match leading(coords, 2, key)? {
                [x, y] => Ok(G2Point { x: x.clone(), y: y.clone() }),
                _ => Err(TranscodeError::shape(key, "expected two coordinate pairs")),
            }
        };

        Ok(VerifyingKey {
            alpha_g1: g1(&self.alpha_1, "vk_alpha_1")?.to_affine("vk_alpha_1")?,
            beta_g2: g2(&self.beta_2, "vk_beta_2")?.to_affine("vk_beta_2")?,
            gamma_g2: g2(&self.gamma_2, "vk_gamma_2")?.to_affine("vk_gamma_2")?,
            delta_g2: g2(&self.delta_2, "vk_delta_2")?.to_affine("vk_delta_2")?,
            gamma_abc_g1: self
                .ic
                .iter()
                .map(|p| g1(p, "IC")?.to_affine("IC"))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// The trusted setup's JSON shape.
    pub fn to_json(&self) -> Value {
        let strings =
            |coords: &[BigUint]| coords.iter().map(BigUint::to_string).collect::<Vec<_>>();
        let g2 = |pairs: &[[BigUint; 2]]| pairs.iter().map(|p| strings(p)).collect::<Vec<_>>();

        let mut out = json!({
            "protocol": "groth16",
            "curve": "bn128",
            "nPublic": self.n_public.unwrap_or(self.ic.len().saturating_sub(1)),
            "vk_alpha_1": strings(&self.alpha_1),
            "vk_beta_2": g2(&self.beta_2),
            "vk_gamma_2": g2(&self.gamma_2),
            "vk_delta_2": g2(&self.delta_2),
            "IC": self.ic.iter().map(|p| strings(p)).collect::<Vec<_>>(),
        });
        if let Some(alphabeta) = &self.alphabeta_12 {
            out[ALPHABETA] = alphabeta
                .iter()
                .map(|row| row.iter().map(|cell| strings(cell)).collect::<Vec<_>>())
                .collect::<Vec<_>>()
                .into();
        }
        out
    }
}

/// `e(alpha, beta)` laid out as the trusted setup writes it: two rows of three
/// `[c0, c1]` cells.
fn alphabeta_12(vk: &VerifyingKey<Bn254>) -> Vec<Vec<Vec<BigUint>>> {
    let target = Bn254::pairing(vk.alpha_g1, vk.beta_g2).0;
    [target.c0, target.c1]
        .iter()
        .map(|half| {
            [half.c0, half.c1, half.c2]
                .iter()
                .map(|cell| vec![fq_to_biguint(&cell.c0), fq_to_biguint(&cell.c1)])
                .collect()
        })
        .collect()
}

/// Byte rows of every rendered section, one row per 32-byte coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedVerifyingKey {
    pub nr_pubinputs: usize,
    pub vk_alpha_g1: Vec<Row>,
    pub vk_beta_g2: Vec<Row>,
    pub vk_gamma_g2: Vec<Row>,
    pub vk_delta_g2: Vec<Row>,
    pub vk_ic: Vec<Vec<Row>>,
    /// Minimal little-endian bytes per element. Transcoded, never rendered.
    pub vk_alphabeta_12: Vec<Vec<Vec<Vec<u8>>>>,
}

impl TranscodedVerifyingKey {
    /// Renders the `VERIFYINGKEY` constant. `vk_gamme_g2` is the field name
    /// groth16-solana declares.
    pub fn render(&self) -> String {
        let mut s = String::from("use groth16_solana::groth16::Groth16Verifyingkey;\n\n");
        s += "pub const VERIFYINGKEY: Groth16Verifyingkey = Groth16Verifyingkey {\n";
        s += &format!("\tnr_pubinputs: {},\n\n", self.nr_pubinputs);

        for (name, rows) in [
            ("vk_alpha_g1", &self.vk_alpha_g1),
            ("vk_beta_g2", &self.vk_beta_g2),
            ("vk_gamme_g2", &self.vk_gamma_g2),
            ("vk_delta_g2", &self.vk_delta_g2),
        ] {
            s += &format!("\t{name}: [\n");
            push_rows(&mut s, "\t\t", rows);
            s += "\t],\n\n";
        }

        s += "\tvk_ic: &[\n";
        for point in &self.vk_ic {
            s += "\t\t[\n";
            push_rows(&mut s, "\t\t\t", point);
            s += "\t\t],\n";
        }
        s += "\t]\n};";
        s
    }
}

fn push_rows(s: &mut String, indent: &str, rows: &[Row]) {
    for row in rows {
        let bytes: Vec<String> = row.iter().map(u8::to_string).collect();
        s.push_str(indent);
        s.push_str(&bytes.join(","));
        s.push_str(",\n");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyingKeyTranscoder {
    options: TranscodeOptions,
}

impl VerifyingKeyTranscoder {
    pub fn new(options: TranscodeOptions) -> Self {
        Self { options }
    }

    pub fn transcode(&self, vk: VerifyingKeyArtifact) -> Result<TranscodedVerifyingKey> {
        if self.options.compat == Compat::Strict {
            if vk.ic.is_empty() {
                return Err(TranscodeError::shape("IC", "expected at least one point"));
            }
            if let Some(n_public) = vk.n_public {
                if vk.ic.len().checked_sub(1) != Some(n_public) {
                    return Err(TranscodeError::shape(
                        "nPublic",
                        format!("{n_public} public inputs but {} IC points", vk.ic.len()),
                    ));
                }
            }
            if vk.alphabeta_12.is_none() {
                return Err(TranscodeError::MissingKey(ALPHABETA.to_string()));
            }
        }

        let vk_alpha_g1 = self.g1_rows("vk_alpha_1", &vk.alpha_1)?;
        let vk_beta_g2 = self.g2_rows("vk_beta_2", &vk.beta_2)?;
        let vk_gamma_g2 = self.g2_rows("vk_gamma_2", &vk.gamma_2)?;
        let vk_delta_g2 = self.g2_rows("vk_delta_2", &vk.delta_2)?;
        let vk_ic = vk
            .ic
            .iter()
            .map(|point| self.g1_rows("IC", point))
            .collect::<Result<Vec<_>>>()?;

        let vk_alphabeta_12: Vec<Vec<Vec<Vec<u8>>>> = vk
            .alphabeta_12
            .iter()
            .flatten()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.iter().map(BigUint::to_bytes_le).collect())
                    .collect()
            })
            .collect();
        if self.options.traces() {
            debug!(rows = ?vk_alphabeta_12, "transcoded vk_alphabeta_12");
        }

        Ok(TranscodedVerifyingKey {
            nr_pubinputs: vk.ic.len(),
            vk_alpha_g1,
            vk_beta_g2,
            vk_gamma_g2,
            vk_delta_g2,
            vk_ic,
            vk_alphabeta_12,
        })
    }

    /// The entries of a section that end up in the constant.
    ///
    /// Strict keeps the two affine entries. Legacy drops only the last entry,
    /// which is the projective `z` for well-formed keys but cuts real
    /// coordinates from anything longer or shorter.
    fn emitted<'a, T>(&self, key: &str, entries: &'a [T]) -> Result<&'a [T]> {
        match self.options.compat {
            Compat::Strict => leading(entries, 2, key),
            Compat::Legacy => Ok(&entries[..entries.len().saturating_sub(1)]),
        }
    }

    fn g1_rows(&self, key: &str, coords: &[BigUint]) -> Result<Vec<Row>> {
        let rows = self
            .emitted(key, coords)?
            .iter()
            .map(|c| encode_coordinate(c, Endianness::Big, self.options.compat))
            .collect::<Result<Vec<_>>>()?;
        if self.options.traces() {
            debug!(section = key, ?rows, "transcoded G1 coordinates");
        }
        Ok(rows)
    }

    fn g2_rows(&self, key: &str, pairs: &[[BigUint; 2]]) -> Result<Vec<Row>> {
        let mut rows = Vec::with_capacity(2 * pairs.len());
        for (j, pair) in self.emitted(key, pairs)?.iter().enumerate() {
            let adapted = adapt_pair(pair, self.options.compat)?;
            if self.options.traces() {
                debug!(section = key, element = j, rows = ?adapted, "transcoded G2 pair");
            }
            rows.extend(adapted);
        }
        Ok(rows)
    }

    pub fn transcode_to_source(&self, vk: VerifyingKeyArtifact) -> Result<String> {
        Ok(self.transcode(vk)?.render())
    }
}

/// Reads the key at `input` and writes `verifying_key.rs` into `out_dir`.
///
/// Nothing is written unless reading, parsing and transcoding all succeed.
pub fn transcode_vk_file(
    input: &Path,
    out_dir: &Path,
    options: TranscodeOptions,
) -> Result<PathBuf> {
    let contents = fs::read_to_string(input).map_err(|source| TranscodeError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    info!(path = %input.display(), "verifying key opened");

    let vk = VerifyingKeyArtifact::from_json_str(&contents)?;
    let source = VerifyingKeyTranscoder::new(options).transcode_to_source(vk)?;

    let output = out_dir.join(VK_FILE_NAME);
    fs::write(&output, source).map_err(|source| TranscodeError::Write {
        path: output.clone(),
        source,
    })?;
    info!(path = %output.display(), "verifying key constant written");
    Ok(output)
}
