//! Verifier for Groth16 proofs produced by circom and snarkjs.
//!
//! The verification key is validated and prepared once by [`Groth16Verifier::new`] and
//! can then be shared across threads. Each call checks the public-input count, validates
//! every proof point and evaluates
//!
//! ```text
//! e(A, B) · e(vk_x, -γ) · e(C, -δ) == e(α, β),   vk_x = IC[0] + Σ input_i · IC[i+1]
//! ```
//!
//! A proof that fails the equation yields `Ok(false)`. Input that cannot be evaluated at
//! all is reported as a [`VerificationError`].
#![deny(missing_docs)]

use std::sync::Arc;

use ark_ec::{VariableBaseMSM, pairing::Pairing};
use ark_groth16::PreparedVerifyingKey;
use circom_types::{
    KeyError, VerificationError, field,
    groth16::{Groth16Proof, VerificationKey},
    traits::{CircomArkworksPairingBridge, validate_g1, validate_g2},
};
use tracing::instrument;

/// A Groth16 verifier bound to one prepared verification key.
///
/// Cloning is cheap, the prepared key is reference counted.
#[derive(Debug, Clone)]
pub struct Groth16Verifier<P: Pairing> {
    pvk: Arc<PreparedVerifyingKey<P>>,
}

impl<P: Pairing + CircomArkworksPairingBridge> Groth16Verifier<P> {
    /// Validates `vk` and precomputes `e(α, β)`, `-γ` and `-δ`.
    #[instrument(level = "debug", skip_all, fields(n_public = vk.n_public))]
    pub fn new(vk: VerificationKey<P>) -> Result<Self, KeyError> {
        vk.validate()?;
        let invalid = |e: VerificationError| KeyError::Invalid(e.to_string());
        validate_g1::<P>(&vk.alpha_1, "vk_alpha_1").map_err(invalid)?;
        validate_g2::<P>(&vk.beta_2, "vk_beta_2").map_err(invalid)?;
        validate_g2::<P>(&vk.gamma_2, "vk_gamma_2").map_err(invalid)?;
        validate_g2::<P>(&vk.delta_2, "vk_delta_2").map_err(invalid)?;
        for (i, p) in vk.ic.iter().enumerate() {
            validate_g1::<P>(p, &format!("IC[{i}]")).map_err(invalid)?;
        }
        let pvk = PreparedVerifyingKey::from(ark_groth16::VerifyingKey::from(vk));
        Ok(Self { pvk: Arc::new(pvk) })
    }

    /// Number of public inputs the key expects.
    pub fn num_public_inputs(&self) -> usize {
        self.pvk.vk.gamma_abc_g1.len() - 1
    }

    /// The verifying key in `ark-groth16` form.
    pub fn verifying_key(&self) -> &ark_groth16::VerifyingKey<P> {
        &self.pvk.vk
    }

    /// Verifies `proof` against `public_inputs`.
    #[instrument(level = "debug", skip_all, fields(n = public_inputs.len()))]
    pub fn verify(
        &self,
        proof: &Groth16Proof<P>,
        public_inputs: &[P::ScalarField],
    ) -> Result<bool, VerificationError> {
        let expected = self.num_public_inputs();
        if public_inputs.len() != expected {
            return Err(VerificationError::InputLengthMismatch {
                expected,
                actual: public_inputs.len(),
            });
        }
        validate_g1::<P>(&proof.pi_a, "A")?;
        validate_g2::<P>(&proof.pi_b, "B")?;
        validate_g1::<P>(&proof.pi_c, "C")?;

        let vk_x = self.prepare_inputs(public_inputs);
        let qap = P::multi_miller_loop(
            [
                <P::G1Prepared>::from(proof.pi_a),
                <P::G1Prepared>::from(vk_x),
                <P::G1Prepared>::from(proof.pi_c),
            ],
            [
                <P::G2Prepared>::from(proof.pi_b),
                self.pvk.gamma_g2_neg_pc.clone(),
                self.pvk.delta_g2_neg_pc.clone(),
            ],
        );
        let accepted = P::final_exponentiation(qap)
            .is_some_and(|test| test.0 == self.pvk.alpha_g1_beta_g2);
        tracing::debug!(accepted, "groth16 verification finished");
        Ok(accepted)
    }

    /// Verifies the uncompressed big-endian proof encoding (`A || B || C`, see
    /// [`Groth16Proof::to_be_bytes`]) against big-endian public input words.
    ///
    /// Everything is decoded and range checked before any pairing is computed.
    pub fn verify_encoded<W: AsRef<[u8]>>(
        &self,
        proof_bytes: &[u8],
        public_input_words: &[W],
    ) -> Result<bool, VerificationError> {
        let proof = Groth16Proof::<P>::from_be_bytes(proof_bytes)?;
        let public_inputs = field::public_inputs_from_be_words(public_input_words)?;
        self.verify(&proof, &public_inputs)
    }

    /// Verifies independent `(proof, public inputs)` pairs against the shared key.
    ///
    /// Results are returned in input order. Runs on the rayon thread pool if the
    /// `parallel` feature is enabled.
    pub fn verify_batch(
        &self,
        batch: &[(Groth16Proof<P>, Vec<P::ScalarField>)],
    ) -> Vec<Result<bool, VerificationError>> {
        #[cfg(feature = "parallel")]
        use rayon::prelude::*;

        #[cfg(feature = "parallel")]
        let iter = batch.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = batch.iter();

        iter.map(|(proof, inputs)| self.verify(proof, inputs))
            .collect()
    }

    fn prepare_inputs(&self, public_inputs: &[P::ScalarField]) -> P::G1 {
        let ic = &self.pvk.vk.gamma_abc_g1;
        let mut vk_x: P::G1 = ic[0].into();
        vk_x += P::G1::msm_unchecked(&ic[1..], public_inputs);
        vk_x
    }
}

#[cfg(test)]
mod tests {
    use ark_bn254::{Bn254, Fr};
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_groth16::Groth16;
    use ark_relations::{
        lc,
        r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError},
    };
    use ark_snark::{CircuitSpecificSetupSNARK, SNARK};

    use super::*;

    // out = a * b
    #[derive(Clone)]
    struct Multiply {
        a: Fr,
        b: Fr,
    }

    impl ConstraintSynthesizer<Fr> for Multiply {
        fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
            let out = cs.new_input_variable(|| Ok(self.a * self.b))?;
            let a = cs.new_witness_variable(|| Ok(self.a))?;
            let b = cs.new_witness_variable(|| Ok(self.b))?;
            cs.enforce_constraint(lc!() + a, lc!() + b, lc!() + out)
        }
    }

    fn setup() -> (Groth16Verifier<Bn254>, Groth16Proof<Bn254>) {
        let mut rng = <ark_std::rand::rngs::StdRng as ark_std::rand::SeedableRng>::seed_from_u64(0);
        let circuit = Multiply {
            a: Fr::from(2u64),
            b: Fr::from(3u64),
        };
        let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit.clone(), &mut rng).unwrap();
        let proof = Groth16::<Bn254>::prove(&pk, circuit, &mut rng).unwrap();
        let verifier = Groth16Verifier::new(vk.into()).unwrap();
        (verifier, proof.into())
    }

    #[test]
    fn accepts_valid_proof() {
        let (verifier, proof) = setup();
        assert_eq!(verifier.num_public_inputs(), 1);
        assert_eq!(verifier.verify(&proof, &[Fr::from(6u64)]), Ok(true));
        // repeated calls give the same answer
        assert_eq!(verifier.verify(&proof, &[Fr::from(6u64)]), Ok(true));
    }

    #[test]
    fn rejects_wrong_public_input() {
        let (verifier, proof) = setup();
        assert_eq!(verifier.verify(&proof, &[Fr::from(7u64)]), Ok(false));
    }

    #[test]
    fn rejects_tampered_proof() {
        let (verifier, mut proof) = setup();
        proof.pi_a = (proof.pi_a + ark_bn254::G1Affine::generator()).into_affine();
        assert_eq!(verifier.verify(&proof, &[Fr::from(6u64)]), Ok(false));
    }

    #[test]
    fn zeroed_proof_is_false() {
        let (verifier, _) = setup();
        let proof = Groth16Proof::<Bn254>::new(
            ark_bn254::G1Affine::zero(),
            ark_bn254::G2Affine::zero(),
            ark_bn254::G1Affine::zero(),
        );
        assert_eq!(verifier.verify(&proof, &[Fr::from(0u64)]), Ok(false));
        assert_eq!(
            verifier.verify_encoded(&[0u8; 256], &[[0u8; 32]]),
            Ok(false)
        );
    }

    #[test]
    fn classifies_bad_requests() {
        let (verifier, proof) = setup();
        assert_eq!(
            verifier.verify(&proof, &[]),
            Err(VerificationError::InputLengthMismatch {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            verifier.verify(&proof, &[Fr::from(1u64), Fr::from(2u64)]),
            Err(VerificationError::InputLengthMismatch {
                expected: 1,
                actual: 2
            })
        );

        let bytes = proof.to_be_bytes();
        assert!(matches!(
            verifier.verify_encoded(&bytes[..200], &[[0u8; 32]]),
            Err(VerificationError::MalformedProof(_))
        ));
        assert_eq!(
            verifier.verify_encoded(&bytes, &[[0xffu8; 32]]),
            Err(VerificationError::InvalidFieldElement { index: 0 })
        );

        let mut off_curve = bytes.clone();
        off_curve[63] ^= 1;
        assert!(matches!(
            verifier.verify_encoded(&off_curve, &[[0u8; 32]]),
            Err(VerificationError::MalformedProof(_))
        ));
    }

    #[test]
    fn encoded_path_matches_typed_path() {
        let (verifier, proof) = setup();
        let mut six = [0u8; 32];
        six[31] = 6;
        assert_eq!(verifier.verify_encoded(&proof.to_be_bytes(), &[six]), Ok(true));
    }

    #[test]
    fn batch_preserves_order() {
        let (verifier, proof) = setup();
        let batch = vec![
            (proof.clone(), vec![Fr::from(6u64)]),
            (proof.clone(), vec![Fr::from(5u64)]),
            (proof, vec![]),
        ];
        let results = verifier.verify_batch(&batch);
        assert_eq!(results[0], Ok(true));
        assert_eq!(results[1], Ok(false));
        assert!(matches!(
            results[2],
            Err(VerificationError::InputLengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_key_without_ic() {
        let (verifier, _) = setup();
        let mut vk: VerificationKey<Bn254> = verifier.verifying_key().clone().into();
        vk.ic.clear();
        vk.n_public = 0;
        assert!(matches!(
            Groth16Verifier::new(vk),
            Err(KeyError::Invalid(_))
        ));
    }
}
