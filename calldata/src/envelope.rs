//! Versioned JSON transport for a proof and its public signals.
//!
//! ```json
//! {"version":1,"protocol":"groth16","curve":"bn128","proof":{...},"publicSignals":["33"]}
//! ```
//!
//! `proof` is the unmodified snarkjs `proof.json` of the named protocol.

use ark_ec::pairing::Pairing;
use circom_types::{
    PublicInput, VerificationError, groth16::Groth16Proof, plonk::PlonkProof,
    traits::CircomArkworksPairingBridge,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, error::Category};

use crate::CalldataError;

/// The only envelope version this crate reads and writes.
pub const ENVELOPE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    version: u32,
    protocol: String,
    curve: String,
    proof: Value,
    public_signals: Vec<String>,
}

/// The proof carried by an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeProof<P: Pairing + CircomArkworksPairingBridge> {
    /// A Groth16 proof.
    Groth16(Groth16Proof<P>),
    /// A PLONK proof.
    Plonk(PlonkProof<P>),
}

impl<P: Pairing + CircomArkworksPairingBridge> EnvelopeProof<P> {
    /// The snarkjs protocol name.
    pub fn protocol(&self) -> &'static str {
        match self {
            EnvelopeProof::Groth16(_) => "groth16",
            EnvelopeProof::Plonk(_) => "plonk",
        }
    }

    /// Reads a snarkjs `proof.json`, dispatching on its `protocol` field.
    ///
    /// Input that is not JSON is a [`CalldataError::Json`]. A proof with missing fields,
    /// a point off the curve or outside the subgroup, or a non-canonical number is a
    /// [`VerificationError::MalformedProof`].
    pub fn from_json(json: &[u8]) -> Result<Self, CalldataError> {
        let value: Value = serde_json::from_slice(json)?;
        let protocol = value
            .get("protocol")
            .and_then(Value::as_str)
            .ok_or_else(|| CalldataError::Syntax("proof does not name its protocol".to_owned()))?
            .to_owned();
        Self::from_value(&protocol, value)
    }

    fn from_value(protocol: &str, proof: Value) -> Result<Self, CalldataError> {
        match protocol {
            "groth16" => Ok(EnvelopeProof::Groth16(decode_proof(proof)?)),
            "plonk" => Ok(EnvelopeProof::Plonk(decode_proof(proof)?)),
            _ => Err(CalldataError::UnsupportedProtocol(protocol.to_owned())),
        }
    }
}

// serde reports rejected points and numbers as data errors
fn decode_proof<T: DeserializeOwned>(proof: Value) -> Result<T, CalldataError> {
    serde_json::from_value(proof).map_err(|e| match e.classify() {
        Category::Data => VerificationError::MalformedProof(e.to_string()).into(),
        _ => e.into(),
    })
}

/// A proof and its public signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofEnvelope<P: Pairing + CircomArkworksPairingBridge> {
    /// The proof.
    pub proof: EnvelopeProof<P>,
    /// The public signals, in circuit order.
    pub public_signals: PublicInput<P::ScalarField>,
}

impl<P: Pairing + CircomArkworksPairingBridge> ProofEnvelope<P> {
    /// Wraps a proof and its public signals.
    pub fn new(proof: EnvelopeProof<P>, public_signals: impl Into<PublicInput<P::ScalarField>>) -> Self {
        Self {
            proof,
            public_signals: public_signals.into(),
        }
    }

    /// Writes the envelope as JSON.
    pub fn to_json(&self) -> Result<String, CalldataError> {
        let proof = match &self.proof {
            EnvelopeProof::Groth16(proof) => serde_json::to_value(proof)?,
            EnvelopeProof::Plonk(proof) => serde_json::to_value(proof)?,
        };
        let raw = RawEnvelope {
            version: ENVELOPE_VERSION,
            protocol: self.proof.protocol().to_owned(),
            curve: P::get_circom_name(),
            proof,
            public_signals: self.public_signals.to_decimal(),
        };
        Ok(serde_json::to_string(&raw)?)
    }

    /// Reads an envelope. Other versions, curves and protocols are rejected before the
    /// proof is looked at.
    pub fn from_json(json: &str) -> Result<Self, CalldataError> {
        let raw: RawEnvelope = serde_json::from_str(json)?;
        if raw.version != ENVELOPE_VERSION {
            return Err(CalldataError::UnsupportedVersion(raw.version));
        }
        let expected = P::get_circom_name();
        if raw.curve != expected {
            return Err(CalldataError::CurveMismatch {
                expected,
                found: raw.curve,
            });
        }
        let proof = EnvelopeProof::from_value(&raw.protocol, raw.proof)?;
        let public_signals = PublicInput::from_decimal(&raw.public_signals)?;
        tracing::debug!(
            protocol = proof.protocol(),
            n = public_signals.0.len(),
            "decoded proof envelope"
        );
        Ok(Self {
            proof,
            public_signals,
        })
    }
}
