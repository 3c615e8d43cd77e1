#![warn(missing_docs)]
//! This crate defines the artifacts exchanged with snarkjs (verification keys, proofs and
//! public signals for Groth16 and PLONK), their JSON and big-endian byte encodings, and
//! the errors shared by the verifiers.
//!
//! All decoding is strict: integers are never reduced modulo the field order and curve
//! points are checked for curve and subgroup membership.
mod error;
pub mod field;
#[cfg(feature = "groth16")]
pub mod groth16;
mod loader;
#[cfg(feature = "plonk")]
pub mod plonk;
mod public_input;
pub mod traits;

pub use error::{KeyError, VerificationError};
pub use loader::{KeyLoader, fingerprint};
pub use public_input::PublicInput;
pub use traits::CheckElement;
