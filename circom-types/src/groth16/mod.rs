//! This module defines the snarkjs Groth16 artifacts and their conversions to and from `ark-groth16`.
mod proof;
mod verification_key;

pub use proof::Groth16Proof;
pub use verification_key::VerificationKey;
