//! Transcodes Groth16 proofs and verifying keys exported by the proving
//! toolkit (JSON, string-encoded field elements) into the byte layouts the
//! on-chain bn254 verifier expects.

pub mod bigint;
pub mod config;
pub mod curve;
pub mod error;
pub mod field;
pub mod proof;
pub mod util;
pub mod vk;

pub use bigint::{Unstringified, parse_bigint, unstringify_bigints};
pub use config::{Compat, TranscodeOptions};
pub use curve::{
    G1Point, G2Layout, G2Point, adapt_pair, encode_g1, encode_g2, g1_uncompressed, g2_uncompressed,
};
pub use error::{Result, TranscodeError};
pub use field::{
    Endianness, FIELD_ELEMENT_WIDTH, convert_endianness, decode, encode, encode_public_input,
};
pub use proof::{ProofArtifact, ProofLayout, ProofTranscoder, TranscodedProof};
pub use vk::{
    TranscodedVerifyingKey, VK_FILE_NAME, VerifyingKeyArtifact, VerifyingKeyTranscoder,
    transcode_vk_file,
};
