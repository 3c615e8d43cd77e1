//! This module defines the [`VerificationKey`] struct that implements de/serialization using [`serde`].

use ark_ec::pairing::Pairing;
use serde::{Deserialize, Serialize};

use super::proof::groth16_protocol;
use crate::{KeyError, traits::CircomArkworksPairingBridge};

/// Represents a Groth16 verification key in JSON format as written by snarkjs
/// (`verification_key.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct VerificationKey<P: Pairing + CircomArkworksPairingBridge> {
    /// The protocol (always `"groth16"`)
    #[serde(default = "groth16_protocol")]
    pub protocol: String,
    /// The curve the key was generated for
    #[serde(default = "P::get_circom_name")]
    pub curve: String,
    /// The number of public inputs
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    /// The element α of the verification key ∈ G1
    #[serde(rename = "vk_alpha_1")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub alpha_1: P::G1Affine,
    /// The element β of the verification key ∈ G2
    #[serde(rename = "vk_beta_2")]
    #[serde(serialize_with = "P::serialize_g2")]
    #[serde(deserialize_with = "P::deserialize_g2")]
    pub beta_2: P::G2Affine,
    /// The γ of the verification key ∈ G2
    #[serde(rename = "vk_gamma_2")]
    #[serde(serialize_with = "P::serialize_g2")]
    #[serde(deserialize_with = "P::deserialize_g2")]
    pub gamma_2: P::G2Affine,
    /// The δ of the verification key ∈ G2
    #[serde(rename = "vk_delta_2")]
    #[serde(serialize_with = "P::serialize_g2")]
    #[serde(deserialize_with = "P::deserialize_g2")]
    pub delta_2: P::G2Affine,
    /// e(α, β) as precomputed by snarkjs. Not used for verification.
    #[serde(rename = "vk_alphabeta_12")]
    #[serde(serialize_with = "P::serialize_gt")]
    #[serde(deserialize_with = "P::deserialize_gt")]
    pub alpha_beta_gt: P::TargetField,
    /// Used to bind the public inputs to the proof
    #[serde(rename = "IC")]
    #[serde(serialize_with = "P::serialize_g1_seq")]
    #[serde(deserialize_with = "P::deserialize_g1_seq")]
    pub ic: Vec<P::G1Affine>,
}

impl<P: Pairing + CircomArkworksPairingBridge> VerificationKey<P> {
    /// Checks that the key is usable for verification: the protocol matches, `IC` is
    /// non-empty and agrees with `nPublic`.
    pub fn validate(&self) -> Result<(), KeyError> {
        if self.protocol != "groth16" {
            return Err(KeyError::Invalid(format!(
                "expected a groth16 key, got protocol {:?}",
                self.protocol
            )));
        }
        if self.curve != P::get_circom_name() {
            return Err(KeyError::Invalid(format!(
                "key is for curve {:?}, expected {:?}",
                self.curve,
                P::get_circom_name()
            )));
        }
        if self.ic.is_empty() {
            return Err(KeyError::Invalid("IC must contain at least one point".to_owned()));
        }
        if self.ic.len() != self.n_public + 1 {
            return Err(KeyError::Invalid(format!(
                "IC has {} points but nPublic is {}",
                self.ic.len(),
                self.n_public
            )));
        }
        Ok(())
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> From<VerificationKey<P>>
    for ark_groth16::VerifyingKey<P>
{
    fn from(vk: VerificationKey<P>) -> Self {
        Self {
            alpha_g1: vk.alpha_1,
            beta_g2: vk.beta_2,
            gamma_g2: vk.gamma_2,
            delta_g2: vk.delta_2,
            gamma_abc_g1: vk.ic,
        }
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> From<ark_groth16::VerifyingKey<P>>
    for VerificationKey<P>
{
    fn from(vk: ark_groth16::VerifyingKey<P>) -> Self {
        Self {
            protocol: groth16_protocol(),
            curve: P::get_circom_name(),
            n_public: vk.gamma_abc_g1.len().saturating_sub(1),
            alpha_1: vk.alpha_g1,
            beta_2: vk.beta_g2,
            gamma_2: vk.gamma_g2,
            delta_2: vk.delta_g2,
            alpha_beta_gt: P::pairing(vk.alpha_g1, vk.beta_g2).0,
            ic: vk.gamma_abc_g1,
        }
    }
}

#[cfg(test)]
#[cfg(feature = "bn254")]
mod bn254_tests {
    use ark_bn254::{Bn254, G1Affine, G2Affine};
    use ark_ec::{AffineRepr, CurveGroup};

    use super::*;

    fn test_vk() -> VerificationKey<Bn254> {
        let g1 = G1Affine::generator();
        let g2 = G2Affine::generator();
        ark_groth16::VerifyingKey::<Bn254> {
            alpha_g1: g1,
            beta_g2: g2,
            gamma_g2: (g2 * ark_bn254::Fr::from(3u64)).into_affine(),
            delta_g2: (g2 * ark_bn254::Fr::from(5u64)).into_affine(),
            gamma_abc_g1: vec![g1, (g1 * ark_bn254::Fr::from(2u64)).into_affine()],
        }
        .into()
    }

    #[test]
    fn can_serde_vk_bn254() {
        let vk = test_vk();
        assert_eq!(vk.n_public, 1);
        vk.validate().unwrap();
        let json = serde_json::to_value(&vk).unwrap();
        assert_eq!(json["protocol"], "groth16");
        assert_eq!(json["curve"], "bn128");
        assert_eq!(json["nPublic"], 1);
        assert_eq!(json["vk_alpha_1"][0], "1");
        assert_eq!(json["IC"].as_array().unwrap().len(), 2);

        let der = serde_json::from_value::<VerificationKey<Bn254>>(json).unwrap();
        assert_eq!(der, vk);
    }

    #[test]
    fn empty_ic_is_rejected() {
        let mut vk = test_vk();
        vk.ic.clear();
        assert!(matches!(vk.validate(), Err(KeyError::Invalid(_))));
    }

    #[test]
    fn mismatched_n_public_is_rejected() {
        let mut vk = test_vk();
        vk.n_public = 3;
        assert!(matches!(vk.validate(), Err(KeyError::Invalid(_))));
    }

    #[test]
    fn wrong_protocol_is_rejected() {
        let mut vk = test_vk();
        vk.protocol = "plonk".to_owned();
        assert!(matches!(vk.validate(), Err(KeyError::Invalid(_))));
    }
}
