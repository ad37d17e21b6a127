use ark_bn254::Bn254;
use ark_groth16::Proof;
use serde_json::{Value, json};
use tracing::debug;

use crate::bigint::{Unstringified, unstringify_bigints};
use crate::config::TranscodeOptions;
use crate::curve::{G1_BYTES, G1Point, G2_BYTES, G2Layout, G2Point, encode_g1, encode_g2};
use crate::error::Result;
use crate::field::Endianness;
use crate::util::{g1_from_vec, g2_from_vecs, section};

pub const PROOF_BYTES: usize = 2 * G1_BYTES + G2_BYTES;

/// The three points of a Groth16 proof in affine coordinates.
///
/// The prover writes them projectively (`pi_a: [x, y, z]`,
/// `pi_b: [[x.c0, x.c1], [y.c0, y.c1], [z.c0, z.c1]]`); the `z` entries are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofArtifact {
    pub a: G1Point,
    pub b: G2Point,
    pub c: G1Point,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProofLayout {
    /// Little-endian coordinates, `B` in the direct G2 layout.
    #[default]
    Direct,
    /// What the alt_bn128 pairing syscall expects: `A` negated, big-endian
    /// coordinates, `B` in the library-adapter G2 layout.
    Syscall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedProof {
    pub proof_a: [u8; G1_BYTES],
    pub proof_b: [u8; G2_BYTES],
    pub proof_c: [u8; G1_BYTES],
}

impl TranscodedProof {
    /// `proof_a ++ proof_b ++ proof_c`.
    pub fn raw(&self) -> [u8; PROOF_BYTES] {
        let mut raw = [0u8; PROOF_BYTES];
        raw[..64].copy_from_slice(&self.proof_a);
        raw[64..192].copy_from_slice(&self.proof_b);
        raw[192..].copy_from_slice(&self.proof_c);
        raw
    }
}

impl ProofArtifact {
    pub fn from_value(root: &Unstringified) -> Result<Self> {
        Ok(Self {
            a: g1_from_vec(section(root, "pi_a")?, "pi_a")?,
            b: g2_from_vecs(section(root, "pi_b")?, "pi_b")?,
            c: g1_from_vec(section(root, "pi_c")?, "pi_c")?,
        })
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&unstringify_bigints(value))
    }

    /// The prover's JSON shape, with unit `z` coordinates.
    pub fn to_json(&self) -> Value {
        json!({
            "pi_a": [self.a.x.to_string(), self.a.y.to_string(), "1"],
            "pi_b": [
                [self.b.x[0].to_string(), self.b.x[1].to_string()],
                [self.b.y[0].to_string(), self.b.y[1].to_string()],
                ["1", "0"],
            ],
            "pi_c": [self.c.x.to_string(), self.c.y.to_string(), "1"],
            "protocol": "groth16",
            "curve": "bn128",
        })
    }

    pub fn from_arkworks(proof: &Proof<Bn254>) -> Self {
        Self {
            a: G1Point::from_affine(&proof.a),
            b: G2Point::from_affine(&proof.b),
            c: G1Point::from_affine(&proof.c),
        }
    }

    pub fn to_arkworks(&self) -> Result<Proof<Bn254>> {
        Ok(Proof {
            a: self.a.to_affine("pi_a")?,
            b: self.b.to_affine("pi_b")?,
            c: self.c.to_affine("pi_c")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProofTranscoder {
    options: TranscodeOptions,
    layout: ProofLayout,
}

impl ProofTranscoder {
    pub fn new(options: TranscodeOptions) -> Self {
        Self {
            options,
            layout: ProofLayout::Direct,
        }
    }

    pub fn with_layout(mut self, layout: ProofLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn transcode(&self, proof: ProofArtifact) -> Result<TranscodedProof> {
        let compat = self.options.compat;
        let transcoded = match self.layout {
            ProofLayout::Direct => TranscodedProof {
                proof_a: encode_g1(&proof.a, Endianness::Little, compat)?,
                proof_b: encode_g2(&proof.b, G2Layout::Direct, compat)?,
                proof_c: encode_g1(&proof.c, Endianness::Little, compat)?,
            },
            ProofLayout::Syscall => {
                let points = proof.to_arkworks()?;
                let negated_a = G1Point::from_affine(&-points.a);
                TranscodedProof {
                    proof_a: encode_g1(&negated_a, Endianness::Big, compat)?,
                    proof_b: encode_g2(&proof.b, G2Layout::LibraryAdapter, compat)?,
                    proof_c: encode_g1(&proof.c, Endianness::Big, compat)?,
                }
            }
        };
        if self.options.traces() {
            debug!(layout = ?self.layout, proof_a = ?transcoded.proof_a, "transcoded pi_a");
            debug!(layout = ?self.layout, proof_b = ?transcoded.proof_b, "transcoded pi_b");
            debug!(layout = ?self.layout, proof_c = ?transcoded.proof_c, "transcoded pi_c");
        }
        Ok(transcoded)
    }
}
