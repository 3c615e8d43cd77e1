use std::{fmt, str::FromStr};

use ark_ec::pairing::Pairing;
use circom_types::{
    VerificationError, field, plonk::PlonkProof, traits::CircomArkworksPairingBridge,
};

use crate::{
    CalldataError,
    groth16::decode_inputs,
    word::{self, RawWord},
};

/// A PLONK proof and its public inputs in Solidity calldata form:
///
/// ```text
/// 0x<proof blob>,["in0",...]
/// ```
///
/// The blob is [`PlonkProof::to_be_bytes`] written as exactly `2 · blob size` hex digits
/// (1600 on BN254). Parsing also accepts a quoted blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlonkCalldata<P: Pairing + CircomArkworksPairingBridge> {
    /// The proof.
    pub proof: PlonkProof<P>,
    /// The public inputs, in circuit order.
    pub public_inputs: Vec<P::ScalarField>,
}

impl<P: Pairing + CircomArkworksPairingBridge> PlonkCalldata<P> {
    /// Pairs a proof with its public inputs.
    pub fn new(proof: PlonkProof<P>, public_inputs: Vec<P::ScalarField>) -> Self {
        Self {
            proof,
            public_inputs,
        }
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> fmt::Display for PlonkCalldata<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs = self
            .public_inputs
            .iter()
            .map(|input| format!("\"{}\"", word::encode(&field::to_be_bytes(input))))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{},[{inputs}]", word::encode(&self.proof.to_be_bytes()))
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> FromStr for PlonkCalldata<P> {
    type Err = CalldataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (blob, inputs) = s
            .trim()
            .split_once(',')
            .ok_or_else(|| CalldataError::Syntax("expected `<proof>,[<inputs>]`".to_owned()))?;
        let digits = word::digits(blob.trim().trim_matches('"'))
            .ok_or(CalldataError::NotHex { index: 0 })?;
        let expected = 2 * PlonkProof::<P>::byte_size();
        if digits.len() != expected {
            return Err(VerificationError::MalformedProof(format!(
                "PLONK proof must be {expected} hex digits, got {}",
                digits.len()
            ))
            .into());
        }
        let blob = hex::decode(digits).map_err(|_| CalldataError::NotHex { index: 0 })?;
        let proof = PlonkProof::from_be_bytes(&blob)?;
        let inputs: Vec<RawWord> = serde_json::from_str(inputs.trim())?;
        let public_inputs = decode_inputs::<P>(&inputs, 1)?;
        Ok(Self::new(proof, public_inputs))
    }
}
