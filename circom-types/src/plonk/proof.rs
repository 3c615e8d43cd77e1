//! This module defines the [`PlonkProof`] struct that implements de/serialization using [`serde`]
//! and the fixed-width big-endian blob consumed by Solidity PLONK verifiers.

use ark_ff::AdditiveGroup;
use ark_ec::pairing::Pairing;
use serde::{Deserialize, Serialize};

use super::verification_key::plonk_protocol;
use crate::{
    VerificationError, field,
    traits::{CheckElement, CircomArkworksPairingBridge},
};

const NUM_COMMITMENTS: usize = 9;
const NUM_EVALUATIONS: usize = 7;

/// Represents a PLONK proof in JSON format as written by snarkjs (`proof.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PlonkProof<P: Pairing + CircomArkworksPairingBridge> {
    /// Commitment to the left wire polynomial
    #[serde(rename = "A")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub a: P::G1Affine,
    /// Commitment to the right wire polynomial
    #[serde(rename = "B")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub b: P::G1Affine,
    /// Commitment to the output wire polynomial
    #[serde(rename = "C")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub c: P::G1Affine,
    /// Commitment to the permutation accumulator
    #[serde(rename = "Z")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub z: P::G1Affine,
    /// Commitment to the low part of the quotient
    #[serde(rename = "T1")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub t1: P::G1Affine,
    /// Commitment to the middle part of the quotient
    #[serde(rename = "T2")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub t2: P::G1Affine,
    /// Commitment to the high part of the quotient
    #[serde(rename = "T3")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub t3: P::G1Affine,
    /// Opening proof at ξ
    #[serde(rename = "Wxi")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub wxi: P::G1Affine,
    /// Opening proof at ξω
    #[serde(rename = "Wxiw")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub wxiw: P::G1Affine,
    /// a(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_a: P::ScalarField,
    /// b(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_b: P::ScalarField,
    /// c(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_c: P::ScalarField,
    /// S1(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_s1: P::ScalarField,
    /// S2(ξ)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_s2: P::ScalarField,
    /// z(ξω)
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_zw: P::ScalarField,
    /// r(ξ), the evaluation of the linearisation polynomial
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub eval_r: P::ScalarField,
    /// The protocol used to generate the proof (always `"plonk"`)
    #[serde(default = "plonk_protocol")]
    pub protocol: String,
    /// The curve used to generate the proof
    #[serde(default = "P::get_circom_name")]
    pub curve: String,
}

impl<P: Pairing + CircomArkworksPairingBridge> PlonkProof<P> {
    /// Builds a proof from its commitments `[A, B, C, Z, T1, T2, T3, Wxi, Wxiw]` and
    /// evaluations `[a, b, c, s1, s2, zw, r]`.
    pub fn from_parts(
        commitments: [P::G1Affine; NUM_COMMITMENTS],
        evaluations: [P::ScalarField; NUM_EVALUATIONS],
    ) -> Self {
        let [a, b, c, z, t1, t2, t3, wxi, wxiw] = commitments;
        let [eval_a, eval_b, eval_c, eval_s1, eval_s2, eval_zw, eval_r] = evaluations;
        Self {
            a,
            b,
            c,
            z,
            t1,
            t2,
            t3,
            wxi,
            wxiw,
            eval_a,
            eval_b,
            eval_c,
            eval_s1,
            eval_s2,
            eval_zw,
            eval_r,
            protocol: plonk_protocol(),
            curve: P::get_circom_name(),
        }
    }

    /// The commitments with their names, in blob order.
    pub fn commitments(&self) -> [(&'static str, &P::G1Affine); NUM_COMMITMENTS] {
        [
            ("A", &self.a),
            ("B", &self.b),
            ("C", &self.c),
            ("Z", &self.z),
            ("T1", &self.t1),
            ("T2", &self.t2),
            ("T3", &self.t3),
            ("Wxi", &self.wxi),
            ("Wxiw", &self.wxiw),
        ]
    }

    /// The evaluations in blob order.
    pub fn evaluations(&self) -> [P::ScalarField; NUM_EVALUATIONS] {
        [
            self.eval_a,
            self.eval_b,
            self.eval_c,
            self.eval_s1,
            self.eval_s2,
            self.eval_zw,
            self.eval_r,
        ]
    }

    /// Size of the blob: nine G1 points followed by seven scalars
    /// (`9·2·n8q + 7·n8r`, 800 bytes on BN254).
    pub fn byte_size() -> usize {
        NUM_COMMITMENTS * P::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED
            + NUM_EVALUATIONS * P::SCALAR_FIELD_BYTE_SIZE
    }

    /// Encodes the proof as the blob consumed by the Solidity verifier.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::byte_size());
        for (_, p) in self.commitments() {
            bytes.extend(P::g1_to_be_bytes(p));
        }
        for eval in self.evaluations() {
            bytes.extend(field::to_be_bytes(&eval));
        }
        bytes
    }

    /// Decodes a blob. Any other size, a bad point or an evaluation `>= r` is a
    /// [`VerificationError::MalformedProof`].
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, VerificationError> {
        if bytes.len() != Self::byte_size() {
            return Err(VerificationError::MalformedProof(format!(
                "PLONK proof must be {} bytes, got {}",
                Self::byte_size(),
                bytes.len()
            )));
        }
        let (points, scalars) =
            bytes.split_at(NUM_COMMITMENTS * P::G1_SERIALIZED_BYTE_SIZE_UNCOMPRESSED);
        let points = P::g1_vec_from_be_bytes(points, NUM_COMMITMENTS, CheckElement::Yes)?;
        let commitments: [P::G1Affine; NUM_COMMITMENTS] = points.try_into().map_err(|_| {
            VerificationError::MalformedProof("wrong number of commitments".to_owned())
        })?;

        const NAMES: [&str; NUM_EVALUATIONS] = [
            "eval_a", "eval_b", "eval_c", "eval_s1", "eval_s2", "eval_zw", "eval_r",
        ];
        let mut evaluations = [P::ScalarField::ZERO; NUM_EVALUATIONS];
        for ((eval, chunk), name) in evaluations
            .iter_mut()
            .zip(scalars.chunks_exact(P::SCALAR_FIELD_BYTE_SIZE))
            .zip(NAMES)
        {
            *eval = field::from_be_bytes_strict(chunk).map_err(|_| {
                VerificationError::MalformedProof(format!(
                    "{name} is not smaller than the scalar field modulus"
                ))
            })?;
        }
        Ok(Self::from_parts(commitments, evaluations))
    }
}
