//! This module defines the [`JsonVerificationKey`] struct that implements de/serialization using [`serde`].

use ark_ec::pairing::Pairing;
use serde::{Deserialize, Serialize};

use crate::{KeyError, traits::CircomArkworksPairingBridge};

pub(crate) fn plonk_protocol() -> String {
    "plonk".to_owned()
}

/// Represents a PLONK verification key in JSON format as written by snarkjs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct JsonVerificationKey<P: Pairing + CircomArkworksPairingBridge> {
    /// The protocol (always `"plonk"`)
    #[serde(default = "plonk_protocol")]
    pub protocol: String,
    /// The curve the key was generated for
    #[serde(default = "P::get_circom_name")]
    pub curve: String,
    /// The number of public inputs
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    /// The domain size is `2^power`
    pub power: u32,
    /// Coset shift of the second wire column
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub k1: P::ScalarField,
    /// Coset shift of the third wire column
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub k2: P::ScalarField,
    /// Commitment to the multiplication selector
    #[serde(rename = "Qm")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub qm: P::G1Affine,
    /// Commitment to the left selector
    #[serde(rename = "Ql")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub ql: P::G1Affine,
    /// Commitment to the right selector
    #[serde(rename = "Qr")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub qr: P::G1Affine,
    /// Commitment to the output selector
    #[serde(rename = "Qo")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub qo: P::G1Affine,
    /// Commitment to the constant selector
    #[serde(rename = "Qc")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub qc: P::G1Affine,
    /// Commitment to the first permutation polynomial
    #[serde(rename = "S1")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub s1: P::G1Affine,
    /// Commitment to the second permutation polynomial
    #[serde(rename = "S2")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub s2: P::G1Affine,
    /// Commitment to the third permutation polynomial
    #[serde(rename = "S3")]
    #[serde(serialize_with = "P::serialize_g1")]
    #[serde(deserialize_with = "P::deserialize_g1")]
    pub s3: P::G1Affine,
    /// `[τ]_2` from the KZG setup
    #[serde(rename = "X_2")]
    #[serde(serialize_with = "P::serialize_g2")]
    #[serde(deserialize_with = "P::deserialize_g2")]
    pub x_2: P::G2Affine,
    /// Generator of the evaluation domain
    #[serde(serialize_with = "ark_serde_compat::serialize_f")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f")]
    pub w: P::ScalarField,
}

impl<P: Pairing + CircomArkworksPairingBridge> JsonVerificationKey<P> {
    /// Size of the evaluation domain, `2^power`.
    pub fn domain_size(&self) -> Result<usize, KeyError> {
        1usize
            .checked_shl(self.power)
            .filter(|_| self.power < usize::BITS - 1)
            .ok_or_else(|| KeyError::Invalid(format!("power {} is too large", self.power)))
    }

    /// Checks protocol, curve and that the public inputs fit into the domain.
    pub fn validate(&self) -> Result<(), KeyError> {
        if self.protocol != "plonk" {
            return Err(KeyError::Invalid(format!(
                "expected a plonk key, got protocol {:?}",
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
        let n = self.domain_size()?;
        if self.n_public > n {
            return Err(KeyError::Invalid(format!(
                "nPublic {} exceeds the domain size {n}",
                self.n_public
            )));
        }
        Ok(())
    }

    /// The selector, permutation commitments in the order `Qm, Ql, Qr, Qo, Qc, S1, S2, S3`.
    pub fn commitments(&self) -> [(&'static str, &P::G1Affine); 8] {
        [
            ("Qm", &self.qm),
            ("Ql", &self.ql),
            ("Qr", &self.qr),
            ("Qo", &self.qo),
            ("Qc", &self.qc),
            ("S1", &self.s1),
            ("S2", &self.s2),
            ("S3", &self.s3),
        ]
    }
}

#[cfg(test)]
#[cfg(feature = "bn254")]
mod bn254_tests {
    use ark_bn254::Bn254;

    use super::*;

    const TEST_VK: &str = r#"{
        "protocol": "plonk",
        "curve": "bn128",
        "nPublic": 1,
        "power": 3,
        "k1": "2",
        "k2": "3",
        "Qm": ["1", "2", "1"],
        "Ql": ["0", "1", "0"],
        "Qr": ["0", "1", "0"],
        "Qo": ["1", "2", "1"],
        "Qc": ["0", "1", "0"],
        "S1": ["1", "2", "1"],
        "S2": ["1", "2", "1"],
        "S3": ["1", "2", "1"],
        "X_2": [
            ["10857046999023057135944570762232829481370756359578518086990519993285655852781",
             "11559732032986387107991004021392285783925812861821192530917403151452391805634"],
            ["8495653923123431417604973247489272438418190587263600148770280649306958101930",
             "4082367875863433681332203403145435568316851327593401208105741076214120093531"],
            ["1", "0"]
        ],
        "w": "19540430494807482326159819597004422086093766032135589407132600596362845576832"
    }"#;

    #[test]
    fn can_serde_vk_bn254() {
        let vk = serde_json::from_str::<JsonVerificationKey<Bn254>>(TEST_VK).unwrap();
        assert_eq!(vk.power, 3);
        assert_eq!(vk.domain_size().unwrap(), 8);
        assert_eq!(vk.k1, ark_bn254::Fr::from(2u64));
        vk.validate().unwrap();

        let json = serde_json::to_value(&vk).unwrap();
        assert_eq!(json["X_2"][2], serde_json::json!(["1", "0"]));
        let der = serde_json::from_value::<JsonVerificationKey<Bn254>>(json).unwrap();
        assert_eq!(der, vk);
    }

    #[test]
    fn rejects_oversized_public_input_count() {
        let mut vk = serde_json::from_str::<JsonVerificationKey<Bn254>>(TEST_VK).unwrap();
        vk.n_public = 9;
        assert!(matches!(vk.validate(), Err(KeyError::Invalid(_))));
        vk.n_public = 1;
        vk.power = 200;
        assert!(matches!(vk.validate(), Err(KeyError::Invalid(_))));
    }
}
