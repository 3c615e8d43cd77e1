//! Circuit inputs in the form circom witness calculators take them: every signal name
//! maps to a list of values (one value for scalar signals).

use std::collections::HashMap;

use ark_bn254::Fr;
use ark_ff::{BigInt, PrimeField};
use ruint::aliases::U256;

use crate::ProverError;

/// Anything that can be turned into named circuit inputs.
pub trait ProofInput {
    /// The inputs keyed by signal name.
    fn prepare_input(&self) -> HashMap<String, Vec<U256>>;
}

impl ProofInput for HashMap<String, Vec<U256>> {
    fn prepare_input(&self) -> HashMap<String, Vec<U256>> {
        self.to_owned()
    }
}

impl<const N: usize> ProofInput for [(&str, u64); N] {
    fn prepare_input(&self) -> HashMap<String, Vec<U256>> {
        self.iter()
            .map(|(name, value)| (name.to_string(), vec![U256::from(*value)]))
            .collect()
    }
}

impl<const N: usize> ProofInput for [(&str, U256); N] {
    fn prepare_input(&self) -> HashMap<String, Vec<U256>> {
        self.iter()
            .map(|(name, value)| (name.to_string(), vec![*value]))
            .collect()
    }
}

/// A scalar field element as the single value of a signal.
#[inline(always)]
pub fn fr_to_u256_vec(f: Fr) -> Vec<U256> {
    vec![f.into()]
}

/// Converts a value into the scalar field, rejecting values `>= r`.
pub fn u256_to_fr(value: U256) -> Option<Fr> {
    Fr::from_bigint(BigInt(value.into_limbs()))
}

/// Looks up the single value of the scalar signal `name`.
pub(crate) fn scalar_input(
    inputs: &HashMap<String, Vec<U256>>,
    name: &str,
) -> Result<U256, ProverError> {
    match inputs.get(name).map(Vec::as_slice) {
        Some([value]) => Ok(*value),
        Some(values) => Err(ProverError::WitnessGeneration(eyre::eyre!(
            "input {name} must be a single value, got {}",
            values.len()
        ))),
        None => Err(ProverError::MissingInput(name.to_owned())),
    }
}

/// Like [`scalar_input`], converted into the scalar field.
pub(crate) fn field_input(
    inputs: &HashMap<String, Vec<U256>>,
    name: &str,
) -> Result<Fr, ProverError> {
    let value = scalar_input(inputs, name)?;
    u256_to_fr(value).ok_or_else(|| {
        ProverError::WitnessGeneration(eyre::eyre!("input {name} is not a field element"))
    })
}
