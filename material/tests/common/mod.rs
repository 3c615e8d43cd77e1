use std::collections::HashMap;

use ark_bn254::Fr;
use ruint::aliases::U256;
use zkcheck_material::{Circuit, Gate, ProverError, proof_input::u256_to_fr};

fn input(inputs: &HashMap<String, Vec<U256>>, name: &str) -> Result<Fr, ProverError> {
    inputs
        .get(name)
        .and_then(|v| v.first())
        .and_then(|v| u256_to_fr(*v))
        .ok_or_else(|| ProverError::MissingInput(name.to_owned()))
}

/// `[1, a^2, a^3, a]` with both powers public.
pub fn powers() -> Circuit {
    fn witness(inputs: &HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError> {
        let a = input(inputs, "a")?;
        Ok(vec![Fr::from(1u64), a * a, a * a * a, a])
    }
    Circuit::new(
        "Powers",
        2,
        4,
        vec![Gate::mul(3, 3, 1), Gate::mul(1, 3, 2)],
        witness,
    )
}

/// `[1, a, b, a·b]` without public signals.
pub fn hidden_product() -> Circuit {
    fn witness(inputs: &HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError> {
        let (a, b) = (input(inputs, "a")?, input(inputs, "b")?);
        Ok(vec![Fr::from(1u64), a, b, a * b])
    }
    Circuit::new("HiddenProduct", 0, 4, vec![Gate::mul(1, 2, 3)], witness)
}

/// Circuits that must not pass setup: a gate naming signal 7 of 3, and more public
/// signals than signals.
pub fn malformed() -> [Circuit; 2] {
    fn witness(_: &HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError> {
        Ok(vec![Fr::from(1u64); 3])
    }
    [
        Circuit::new("Bad", 1, 3, vec![Gate::mul(1, 2, 7)], witness),
        Circuit::new("Bad", 3, 3, vec![Gate::mul(1, 2, 0)], witness),
    ]
}
