use std::{fmt, str::FromStr};

use ark_ec::pairing::Pairing;
use circom_types::{
    VerificationError, field, groth16::Groth16Proof, traits::CircomArkworksPairingBridge,
};

use crate::{
    CalldataError,
    word::{self, RawWord, WordError},
};

type RawGroth16Call = ([RawWord; 2], [[RawWord; 2]; 2], [RawWord; 2], Vec<RawWord>);

/// A Groth16 proof and its public inputs in Solidity calldata form:
///
/// ```text
/// ["a.x", "a.y"],[["b.x.c1", "b.x.c0"],["b.y.c1", "b.y.c0"]],["c.x", "c.y"],["in0",...]
/// ```
///
/// Every value is a `0x`-prefixed big-endian word of the base field size (scalar field
/// size for the inputs). The G2 coordinates use the order of the EVM pairing precompile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groth16Calldata<P: Pairing + CircomArkworksPairingBridge> {
    /// The proof.
    pub proof: Groth16Proof<P>,
    /// The public inputs, in circuit order.
    pub public_inputs: Vec<P::ScalarField>,
}

impl<P: Pairing + CircomArkworksPairingBridge> Groth16Calldata<P> {
    /// Pairs a proof with its public inputs.
    pub fn new(proof: Groth16Proof<P>, public_inputs: Vec<P::ScalarField>) -> Self {
        Self {
            proof,
            public_inputs,
        }
    }

    /// The eight proof words `[a.x, a.y, b.x.c1, b.x.c0, b.y.c1, b.y.c0, c.x, c.y]`.
    pub fn proof_words(&self) -> Vec<Vec<u8>> {
        self.proof
            .to_be_bytes()
            .chunks_exact(P::BASE_FIELD_BYTE_SIZE)
            .map(<[u8]>::to_vec)
            .collect()
    }

    /// The public inputs as big-endian words of the scalar field size.
    pub fn input_words(&self) -> Vec<Vec<u8>> {
        self.public_inputs.iter().map(field::to_be_bytes).collect()
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> fmt::Display for Groth16Calldata<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.proof_words();
        let w = w.iter().map(|w| word::encode(w)).collect::<Vec<_>>();
        let inputs = self
            .input_words()
            .iter()
            .map(|w| format!("\"{}\"", word::encode(w)))
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "[\"{}\", \"{}\"],[[\"{}\", \"{}\"],[\"{}\", \"{}\"]],[\"{}\", \"{}\"],[{inputs}]",
            w[0], w[1], w[2], w[3], w[4], w[5], w[6], w[7]
        )
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> FromStr for Groth16Calldata<P> {
    type Err = CalldataError;

    /// Parses the four comma separated JSON arrays written by snarkjs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, [b0, b1], c, inputs): RawGroth16Call =
            serde_json::from_str(&format!("[{}]", s.trim()))?;

        let mut bytes = Vec::with_capacity(Groth16Proof::<P>::byte_size());
        let words = a.iter().chain(&b0).chain(&b1).chain(&c);
        for (index, w) in words.enumerate() {
            match word::decode(w, P::BASE_FIELD_BYTE_SIZE) {
                Ok(w) => bytes.extend(w),
                Err(WordError::NotHex) => return Err(CalldataError::NotHex { index }),
                Err(WordError::Overflow) => {
                    return Err(VerificationError::MalformedProof(format!(
                        "proof word {index} does not fit into the base field"
                    ))
                    .into());
                }
            }
        }
        let proof = Groth16Proof::from_be_bytes(&bytes)?;
        let public_inputs = decode_inputs::<P>(&inputs, 8)?;
        Ok(Self::new(proof, public_inputs))
    }
}

/// Decodes public input words. `offset` is the position of the first input among all
/// words of the calldata and is only used for [`CalldataError::NotHex`].
pub(crate) fn decode_inputs<P: Pairing + CircomArkworksPairingBridge>(
    inputs: &[RawWord],
    offset: usize,
) -> Result<Vec<P::ScalarField>, CalldataError> {
    let mut words = Vec::with_capacity(inputs.len());
    for (index, w) in inputs.iter().enumerate() {
        match word::decode(w, P::SCALAR_FIELD_BYTE_SIZE) {
            Ok(w) => words.push(w),
            Err(WordError::NotHex) => {
                return Err(CalldataError::NotHex {
                    index: offset + index,
                });
            }
            Err(WordError::Overflow) => {
                return Err(VerificationError::InvalidFieldElement { index }.into());
            }
        }
    }
    Ok(field::public_inputs_from_be_words(&words)?)
}
