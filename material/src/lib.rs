//! Proof material for exercising the zkcheck verifiers without snarkjs.
//!
//! This crate reproduces what circom and snarkjs produce for a handful of small
//! circuits: witnesses in circom layout (`witness[0] = 1`, outputs first), Groth16
//! proofs via `ark-groth16` and PLONK proofs in the snarkjs layout over a locally
//! generated KZG setup. Keys and proofs come out as [`circom_types`] values, so they
//! can be fed to the verifiers, serialized to snarkjs JSON or turned into calldata.
//!
//! The setups are derived from a seed and their trapdoors are kept in memory. None of
//! this is fit for production use.
#![deny(missing_docs)]

use ark_bn254::Fr;
use rand::{SeedableRng, rngs::StdRng};

pub mod circuit;
pub mod groth16;
pub mod plonk;
pub mod proof_input;
mod r1cs;

pub use circuit::{Circuit, Gate};
pub use self::groth16::Groth16Material;
pub use self::plonk::PlonkMaterial;
pub use proof_input::ProofInput;

/// Errors that can occur during witness and proof generation.
#[derive(Debug, thiserror::Error)]
pub enum ProverError {
    /// No circuit with this id was registered.
    #[error("unknown circuit {0}")]
    UnknownCircuit(String),
    /// The circuit description is inconsistent.
    #[error("circuit {id} is malformed: {reason}")]
    InvalidCircuit {
        /// Id of the circuit
        id: String,
        /// What is wrong with it
        reason: String,
    },
    /// A circuit input was not supplied.
    #[error("missing input {0}")]
    MissingInput(String),
    /// Failed to generate a witness for the circuit.
    #[error("failed to generate witness")]
    WitnessGeneration(#[source] eyre::Report),
    /// Failed to generate a proof.
    #[error("failed to generate proof")]
    ProofGeneration(#[source] eyre::Report),
    /// Generated proof could not be verified against the verification key.
    #[error("proof could not be verified")]
    InvalidProof,
}

/// Runs the setups for a set of circuits.
///
/// The setup randomness is derived from [`MaterialBuilder::seed`], so two builds with
/// the same seed produce the same keys.
#[derive(Debug, Clone)]
pub struct MaterialBuilder {
    seed: u64,
    circuits: Vec<Circuit>,
}

impl Default for MaterialBuilder {
    fn default() -> Self {
        Self {
            seed: 0,
            circuits: Circuit::builtin(),
        }
    }
}

impl MaterialBuilder {
    /// A builder for the builtin circuits with seed 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the setup seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Registers an additional circuit, replacing a builtin one with the same id.
    pub fn circuit(mut self, circuit: Circuit) -> Self {
        self.circuits.retain(|c| c.id() != circuit.id());
        self.circuits.push(circuit);
        self
    }

    /// Runs a Groth16 setup per circuit.
    ///
    /// The generator that ran the setups keeps supplying the blinding of later proofs.
    pub fn build_groth16(self) -> Result<Groth16Material, ProverError> {
        Groth16Material::setup(self.circuits, StdRng::seed_from_u64(self.seed))
    }

    /// Runs a PLONK setup per circuit.
    pub fn build_plonk(self) -> Result<PlonkMaterial, ProverError> {
        PlonkMaterial::setup(self.circuits, &mut StdRng::seed_from_u64(self.seed))
    }
}

/// Produces a proof and its public signals for a registered circuit.
pub trait ProofGenerator {
    /// The snarkjs proof type of the backend.
    type Proof;

    /// Computes the witness of `circuit_id` for `inputs` and proves it.
    ///
    /// Backends that blind their proofs draw the randomness from their own seeded
    /// generator. Use the backend's `generate_proof_from_witness` to supply it explicitly.
    fn prove(
        &self,
        circuit_id: &str,
        inputs: &impl ProofInput,
    ) -> Result<(Self::Proof, Vec<Fr>), ProverError>;
}
