//! This module defines the [`PublicInput`] struct that allows loading the `public.json`
//! written by snarkjs via [`serde::Deserialize`] and [`serde::Serialize`].

use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::{VerificationError, field};

/// The public signals of a proof, in circuit order. Shared by Groth16 and PLONK.
///
/// Every value must be a canonical element of the scalar field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicInput<F: PrimeField>(
    /// The values of the public input.
    #[serde(serialize_with = "ark_serde_compat::serialize_f_seq")]
    #[serde(deserialize_with = "ark_serde_compat::deserialize_f_seq")]
    pub Vec<F>,
);

impl<F: PrimeField> PublicInput<F> {
    /// Parses decimal strings, reporting the index of the first non-canonical value.
    pub fn from_decimal<S: AsRef<str>>(values: &[S]) -> Result<Self, VerificationError> {
        field::public_inputs_from_decimal(values).map(Self)
    }

    /// Parses big-endian words, reporting the index of the first non-canonical value.
    pub fn from_be_words<W: AsRef<[u8]>>(words: &[W]) -> Result<Self, VerificationError> {
        field::public_inputs_from_be_words(words).map(Self)
    }

    /// Renders the values as decimal strings.
    pub fn to_decimal(&self) -> Vec<String> {
        self.0.iter().map(field::to_decimal).collect()
    }

    /// Consumes `self` and returns the inner values.
    pub fn into_inner(self) -> Vec<F> {
        self.0
    }
}

impl<F: PrimeField> From<Vec<F>> for PublicInput<F> {
    fn from(values: Vec<F>) -> Self {
        Self(values)
    }
}

impl<F: PrimeField> AsRef<[F]> for PublicInput<F> {
    fn as_ref(&self) -> &[F] {
        &self.0
    }
}

#[cfg(test)]
#[cfg(feature = "bls12-381")]
mod bls12_381_tests {
    use super::PublicInput;

    #[test]
    fn can_serde_public_input_bls12_381() {
        let is_public_input_str = "[\"1\",\"2\",\"3\"]";
        let public_input =
            serde_json::from_str::<PublicInput<ark_bls12_381::Fr>>(is_public_input_str).unwrap();
        let should_values = vec![
            ark_bls12_381::Fr::from(1u64),
            ark_bls12_381::Fr::from(2u64),
            ark_bls12_381::Fr::from(3u64),
        ];
        assert_eq!(public_input.0, should_values);
        let ser_public_input = serde_json::to_string(&public_input).unwrap();
        assert_eq!(ser_public_input, is_public_input_str);
    }
}
