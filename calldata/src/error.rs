use circom_types::VerificationError;
use thiserror::Error;

use crate::ENVELOPE_VERSION;

/// Errors raised while decoding calldata strings or proof envelopes.
#[derive(Debug, Error)]
pub enum CalldataError {
    /// The string does not have the expected overall shape.
    #[error("calldata is not well formed: {0}")]
    Syntax(String),
    /// The JSON part could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A word is neither a `0x`-prefixed hex string nor a JSON integer.
    #[error("word {index} is not a 0x-prefixed hex string")]
    NotHex {
        /// Position of the word in the calldata.
        index: usize,
    },
    /// The decoded values were rejected by the proof layer.
    #[error(transparent)]
    Verification(#[from] VerificationError),
    /// The envelope was written by an unknown format version.
    #[error("unsupported envelope version {0}, expected {ENVELOPE_VERSION}")]
    UnsupportedVersion(u32),
    /// The envelope targets another curve.
    #[error("envelope is for curve {found}, expected {expected}")]
    CurveMismatch {
        /// Curve of the pairing the envelope was decoded with.
        expected: String,
        /// Curve named in the envelope.
        found: String,
    },
    /// The envelope names a proof system other than Groth16 or PLONK.
    #[error("unsupported protocol {0}")]
    UnsupportedProtocol(String),
}
