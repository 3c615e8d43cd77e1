//! # Calldata and envelopes
//!
//! Conversions between the typed snarkjs artifacts of [`circom_types`] and the textual
//! forms they travel in:
//!
//! - [`Groth16Calldata`] and [`PlonkCalldata`] read and write the strings produced by
//!   `snarkjs zkey export soliditycalldata`, which are passed verbatim to the generated
//!   Solidity verifiers.
//! - [`ProofEnvelope`] is a versioned JSON document carrying a proof together with its
//!   public signals.
//!
//! Decoding never reduces values modulo a field order. Words that do not fit, points that
//! are not on the curve and similar defects surface as [`CalldataError::Verification`]
//! with the same classification the verifiers use.
//!
//! ```rust,no_run
//! # fn load() -> (circom_types::groth16::Groth16Proof<ark_bn254::Bn254>, Vec<ark_bn254::Fr>) { todo!() }
//! use zkcheck_calldata::Groth16Calldata;
//!
//! let (proof, inputs) = load();
//! let calldata = Groth16Calldata::new(proof, inputs).to_string();
//! let parsed: Groth16Calldata<ark_bn254::Bn254> = calldata.parse().unwrap();
//! ```
#![deny(missing_docs)]

mod envelope;
mod error;
mod groth16;
mod plonk;
mod word;

pub use envelope::{ENVELOPE_VERSION, EnvelopeProof, ProofEnvelope};
pub use error::CalldataError;
pub use self::groth16::Groth16Calldata;
pub use self::plonk::PlonkCalldata;
