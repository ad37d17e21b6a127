use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The value needs more bytes than the declared width.
    #[error("field element needs {needed} bytes but the declared width is {width}")]
    Overflow { needed: usize, width: usize },

    #[error("byte width must be positive")]
    ZeroWidth,

    #[error("missing key `{0}`")]
    MissingKey(String),

    /// A key is present but its value does not have the expected nesting.
    #[error("`{key}` has an unexpected shape: {reason}")]
    Shape { key: String, reason: String },

    #[error("`{0}` is not below the bn254 base field modulus")]
    NotInField(String),

    #[error("`{0}` is not a point of the bn254 prime order subgroup")]
    NotOnCurve(String),

    #[error("curve point serialization failed: {0}")]
    Serialization(#[from] ark_serialize::SerializationError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl TranscodeError {
    pub(crate) fn shape(key: &str, reason: impl Into<String>) -> Self {
        TranscodeError::Shape {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = TranscodeError> = std::result::Result<T, E>;
