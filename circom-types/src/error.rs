//! Error types shared by the verifiers and the key loader.

use thiserror::Error;

/// Classifies why a verification request could not be evaluated.
///
/// A proof that decodes fine but does not satisfy the verification equation is not an
/// error. The verifiers report it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The proof has the wrong size, a coordinate outside the base field, a point off the
    /// curve or outside the prime-order subgroup, or an evaluation outside the scalar field.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The public input at `index` is not smaller than the scalar field modulus.
    #[error("public input at index {index} is not a canonical field element")]
    InvalidFieldElement {
        /// Position of the offending input.
        index: usize,
    },
    /// The number of public inputs does not match the verification key.
    #[error("expected {expected} public inputs, got {actual}")]
    InputLengthMismatch {
        /// Number of inputs the key was generated for.
        expected: usize,
        /// Number of inputs that were supplied.
        actual: usize,
    },
}

/// Errors that occur while loading or preparing a verification key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Any I/O error encountered while reading the key.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The key is not valid snarkjs JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The SHA-256 fingerprint of the key did not match the pinned value.
    #[error("invalid verification key - wrong sha256 fingerprint: {0}")]
    FingerprintMismatch(String),
    /// The key parsed but is structurally unusable.
    #[error("invalid verification key: {0}")]
    Invalid(String),
}
