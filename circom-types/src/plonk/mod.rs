//! This module defines the snarkjs PLONK artifacts.

mod proof;
mod verification_key;

pub use proof::PlonkProof;
pub use verification_key::JsonVerificationKey;
