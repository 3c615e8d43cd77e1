//! Groth16 proving with `ark-groth16`, one circuit specific setup per circuit.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use circom_types::groth16::{Groth16Proof, VerificationKey};
use groth16::Groth16Verifier;
use rand::{CryptoRng, Rng, rngs::StdRng};

use crate::{
    Circuit, ProofGenerator, ProverError, proof_input::ProofInput, r1cs::R1csCircuit,
};

#[derive(Debug)]
struct Groth16Setup {
    circuit: Circuit,
    pk: ProvingKey<Bn254>,
    verifier: Groth16Verifier<Bn254>,
}

/// Groth16 proving keys and verifiers for a set of circuits.
///
/// Built by [`MaterialBuilder::build_groth16`](crate::MaterialBuilder::build_groth16).
#[derive(Debug)]
pub struct Groth16Material {
    setups: HashMap<String, Groth16Setup>,
    rng: Mutex<StdRng>,
}

impl Groth16Material {
    pub(crate) fn setup(circuits: Vec<Circuit>, mut rng: StdRng) -> Result<Self, ProverError> {
        let mut setups = HashMap::with_capacity(circuits.len());
        for circuit in circuits {
            circuit.validate()?;
            let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(
                R1csCircuit {
                    circuit: &circuit,
                    witness: None,
                },
                &mut rng,
            )
            .map_err(|e| ProverError::ProofGeneration(eyre::eyre!(e)))?;
            let verifier = Groth16Verifier::new(vk.into())
                .map_err(|e| ProverError::ProofGeneration(eyre::Report::new(e)))?;
            tracing::debug!(circuit = circuit.id(), "groth16 setup done");
            setups.insert(
                circuit.id().to_owned(),
                Groth16Setup {
                    circuit,
                    pk,
                    verifier,
                },
            );
        }
        Ok(Self {
            setups,
            rng: Mutex::new(rng),
        })
    }

    fn get(&self, circuit_id: &str) -> Result<&Groth16Setup, ProverError> {
        self.setups
            .get(circuit_id)
            .ok_or_else(|| ProverError::UnknownCircuit(circuit_id.to_owned()))
    }

    /// The circuit registered under `circuit_id`.
    pub fn circuit(&self, circuit_id: &str) -> Result<&Circuit, ProverError> {
        Ok(&self.get(circuit_id)?.circuit)
    }

    /// The verification key of `circuit_id` in snarkjs form.
    pub fn verification_key(&self, circuit_id: &str) -> Result<VerificationKey<Bn254>, ProverError> {
        Ok(self.get(circuit_id)?.pk.vk.clone().into())
    }

    /// A verifier for `circuit_id`.
    pub fn verifier(&self, circuit_id: &str) -> Result<&Groth16Verifier<Bn254>, ProverError> {
        Ok(&self.get(circuit_id)?.verifier)
    }

    /// Computes the witness of `circuit_id` for `inputs`.
    pub fn generate_witness(
        &self,
        circuit_id: &str,
        inputs: &impl ProofInput,
    ) -> Result<Vec<Fr>, ProverError> {
        self.get(circuit_id)?.circuit.generate_witness(inputs)
    }

    /// Generates a Groth16 proof from a witness.
    ///
    /// Doesn't verify the proof internally.
    pub fn generate_proof_from_witness<R: Rng + CryptoRng>(
        &self,
        circuit_id: &str,
        witness: &[Fr],
        rng: &mut R,
    ) -> Result<(Groth16Proof<Bn254>, Vec<Fr>), ProverError> {
        let setup = self.get(circuit_id)?;
        if witness.len() != setup.circuit.num_signals() {
            return Err(ProverError::ProofGeneration(eyre::eyre!(
                "expected {} signals, got {}",
                setup.circuit.num_signals(),
                witness.len()
            )));
        }
        let proof = Groth16::<Bn254>::prove(
            &setup.pk,
            R1csCircuit {
                circuit: &setup.circuit,
                witness: Some(witness),
            },
            rng,
        )
        .map_err(|e| ProverError::ProofGeneration(eyre::eyre!(e)))?;
        Ok((proof.into(), setup.circuit.public_signals(witness)?))
    }

    /// Checks `proof` with the zkcheck verifier.
    pub fn verify_proof(
        &self,
        circuit_id: &str,
        proof: &Groth16Proof<Bn254>,
        public_inputs: &[Fr],
    ) -> Result<(), ProverError> {
        match self.verifier(circuit_id)?.verify(proof, public_inputs) {
            Ok(true) => Ok(()),
            _ => Err(ProverError::InvalidProof),
        }
    }
}

impl ProofGenerator for Groth16Material {
    type Proof = Groth16Proof<Bn254>;

    fn prove(
        &self,
        circuit_id: &str,
        inputs: &impl ProofInput,
    ) -> Result<(Self::Proof, Vec<Fr>), ProverError> {
        let witness = self.generate_witness(circuit_id, inputs)?;
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.generate_proof_from_witness(circuit_id, &witness, &mut *rng)
    }
}
