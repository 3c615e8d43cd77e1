//! This module defines the [`Groth16Proof`] struct that implements de/serialization using [`serde`].

use ark_ec::pairing::Pairing;
use serde::{Deserialize, Serialize};

use crate::{
    VerificationError,
    traits::{CheckElement, CircomArkworksPairingBridge},
};

pub(crate) fn groth16_protocol() -> String {
    "groth16".to_owned()
}

/// Represents a Groth16 proof in JSON format as written by snarkjs (`proof.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Groth16Proof<P: Pairing + CircomArkworksPairingBridge> {
    /// Proof element A (or [A]_1) in G1
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub pi_a: P::G1Affine,
    /// Proof element B (or [B]_2) in G2
    #[serde(serialize_with = "P::serialize_g2")]
    #[serde(deserialize_with = "P::deserialize_g2")]
    pub pi_b: P::G2Affine,
    /// Proof element C (or [C]_1) in G1
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub pi_c: P::G1Affine,
    /// The protocol used to generate the proof (always `"groth16"`)
    #[serde(default = "groth16_protocol")]
    pub protocol: String,
    /// The curve used to generate the proof
    #[serde(default = "P::get_circom_name")]
    pub curve: String,
}

impl<P: Pairing + CircomArkworksPairingBridge> Groth16Proof<P> {
    /// Creates a proof from its three group elements.
    pub fn new(pi_a: P::G1Affine, pi_b: P::G2Affine, pi_c: P::G1Affine) -> Self {
        Self {
            pi_a,
            pi_b,
            pi_c,
            protocol: groth16_protocol(),
            curve: P::get_circom_name(),
        }
    }

    /// Size of the uncompressed big-endian encoding `A || B || C`.
    pub fn byte_size() -> usize {
        2 * P::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED + P::G2_SERIALIZED_BYTE_SIZE_UNCOMPRESSED
    }

    /// Encodes the proof as `A.x || A.y || B.x.c1 || B.x.c0 || B.y.c1 || B.y.c0 || C.x || C.y`.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        [
            P::g1_to_be_bytes(&self.pi_a),
            P::g2_to_be_bytes(&self.pi_b),
            P::g1_to_be_bytes(&self.pi_c),
        ]
        .concat()
    }

    /// Decodes the layout written by [`Self::to_be_bytes`], checking every point.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, VerificationError> {
        if bytes.len() != Self::byte_size() {
            return Err(VerificationError::MalformedProof(format!(
                "Groth16 proof must be {} bytes, got {}",
                Self::byte_size(),
                bytes.len()
            )));
        }
        let (a, rest) = bytes.split_at(P::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED);
        let (b, c) = rest.split_at(P::G2_SERIALIZED_BYTE_SIZE_UNCOMPRESSED);
        Ok(Self::new(
            P::g1_from_be_bytes(a, CheckElement::Yes)?,
            P::g2_from_be_bytes(b, CheckElement::Yes)?,
            P::g1_from_be_bytes(c, CheckElement::Yes)?,
        ))
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> From<Groth16Proof<P>> for ark_groth16::Proof<P> {
    fn from(proof: Groth16Proof<P>) -> Self {
        Self {
            a: proof.pi_a,
            b: proof.pi_b,
            c: proof.pi_c,
        }
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> From<ark_groth16::Proof<P>> for Groth16Proof<P> {
    fn from(proof: ark_groth16::Proof<P>) -> Self {
        Self::new(proof.a, proof.b, proof.c)
    }
}
