//! Verifier for PLONK proofs produced by snarkjs.
//!
//! The verifier reproduces the snarkjs PLONK verification over KZG commitments: it
//! recomputes the Fiat-Shamir challenges from the proof ([`transcript`]), evaluates the
//! public-input polynomial and the quotient at ξ, folds all commitments into one batched
//! opening and finishes with the pairing check
//!
//! ```text
//! e(-(Wxi + u·Wxiw), [τ]_2) · e(ξ·Wxi + u·ξ·ω·Wxiw + F - E, [1]_2) == 1
//! ```
#![deny(missing_docs)]

use std::sync::Arc;

use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM, pairing::Pairing};
use ark_ff::{Field, One, Zero};
use circom_types::{
    KeyError, VerificationError, field,
    plonk::{JsonVerificationKey, PlonkProof},
    traits::{CircomArkworksPairingBridge, validate_g1, validate_g2},
};
use tracing::instrument;

pub mod transcript;

pub use transcript::{Challenges, Transcript};

#[derive(Debug)]
struct PreparedKey<P: Pairing + CircomArkworksPairingBridge> {
    vk: JsonVerificationKey<P>,
    n: u64,
    n_field: P::ScalarField,
    x_2: P::G2Prepared,
    g2: P::G2Prepared,
}

/// A PLONK verifier bound to one validated verification key.
///
/// Cloning is cheap, the prepared key is reference counted.
#[derive(Debug, Clone)]
pub struct PlonkVerifier<P: Pairing + CircomArkworksPairingBridge> {
    key: Arc<PreparedKey<P>>,
}

impl<P: Pairing + CircomArkworksPairingBridge> PlonkVerifier<P> {
    /// Validates `vk`: ω must be a primitive `2^power`-th root of unity, `nPublic` must fit
    /// into the domain and all commitments must be valid group elements.
    #[instrument(level = "debug", skip_all, fields(power = vk.power, n_public = vk.n_public))]
    pub fn new(vk: JsonVerificationKey<P>) -> Result<Self, KeyError> {
        vk.validate()?;
        let n = vk.domain_size()? as u64;
        if vk.w.pow([n]) != P::ScalarField::one() {
            return Err(KeyError::Invalid(format!("w is not a {n}-th root of unity")));
        }
        if n > 1 && vk.w.pow([n / 2]).is_one() {
            return Err(KeyError::Invalid(format!(
                "w is not a primitive {n}-th root of unity"
            )));
        }
        let invalid = |e: VerificationError| KeyError::Invalid(e.to_string());
        for (name, p) in vk.commitments() {
            validate_g1::<P>(p, name).map_err(invalid)?;
        }
        validate_g2::<P>(&vk.x_2, "X_2").map_err(invalid)?;

        let key = PreparedKey {
            n,
            n_field: P::ScalarField::from(n),
            x_2: vk.x_2.into(),
            g2: P::G2Affine::generator().into(),
            vk,
        };
        Ok(Self { key: Arc::new(key) })
    }

    /// Number of public inputs the key expects.
    pub fn num_public_inputs(&self) -> usize {
        self.key.vk.n_public
    }

    /// The verification key this verifier was built from.
    pub fn verification_key(&self) -> &JsonVerificationKey<P> {
        &self.key.vk
    }

    /// Verifies `proof` against `public_inputs`.
    #[instrument(level = "debug", skip_all, fields(n = public_inputs.len()))]
    pub fn verify(
        &self,
        proof: &PlonkProof<P>,
        public_inputs: &[P::ScalarField],
    ) -> Result<bool, VerificationError> {
        let expected = self.num_public_inputs();
        if public_inputs.len() != expected {
            return Err(VerificationError::InputLengthMismatch {
                expected,
                actual: public_inputs.len(),
            });
        }
        for (name, p) in proof.commitments() {
            validate_g1::<P>(p, name)?;
        }

        let challenges = Challenges::compute(proof, public_inputs);
        let accepted = match self.check(proof, public_inputs, &challenges) {
            Some(accepted) => accepted,
            None => {
                tracing::debug!("degenerate challenge, rejecting proof");
                false
            }
        };
        tracing::debug!(accepted, "plonk verification finished");
        Ok(accepted)
    }

    /// Verifies the fixed-size proof blob (see [`PlonkProof::to_be_bytes`]) against
    /// big-endian public input words.
    ///
    /// Everything is decoded and range checked before any pairing is computed.
    pub fn verify_encoded<W: AsRef<[u8]>>(
        &self,
        blob: &[u8],
        public_input_words: &[W],
    ) -> Result<bool, VerificationError> {
        let proof = PlonkProof::<P>::from_be_bytes(blob)?;
        let public_inputs = field::public_inputs_from_be_words(public_input_words)?;
        self.verify(&proof, &public_inputs)
    }

    // Returns None if one of the denominators vanishes.
    fn check(
        &self,
        proof: &PlonkProof<P>,
        public_inputs: &[P::ScalarField],
        ch: &Challenges<P::ScalarField>,
    ) -> Option<bool> {
        let key = &*self.key;
        let vk = &key.vk;
        let Challenges {
            beta,
            gamma,
            alpha,
            xi,
            v,
            u,
        } = *ch;

        let xin = xi.pow([key.n]);
        let zh = xin - P::ScalarField::one();

        // L_i(ξ) = ω^(i-1) (ξ^n - 1) / (n (ξ - ω^(i-1))) for i = 1..=max(1, nPublic)
        let mut lagrange = Vec::with_capacity(public_inputs.len().max(1));
        let mut w = P::ScalarField::one();
        for _ in 0..public_inputs.len().max(1) {
            let denominator = (key.n_field * (xi - w)).inverse()?;
            lagrange.push(w * zh * denominator);
            w *= vk.w;
        }
        let l1 = lagrange[0];
        let pi = -public_inputs
            .iter()
            .zip(&lagrange)
            .map(|(input, l)| *input * l)
            .sum::<P::ScalarField>();

        let alpha2 = alpha.square();
        let e1 = proof.eval_a + beta * proof.eval_s1 + gamma;
        let e2 = proof.eval_b + beta * proof.eval_s2 + gamma;
        let e3 = proof.eval_c + gamma;
        let t = (proof.eval_r + pi - alpha * e1 * e2 * e3 * proof.eval_zw - alpha2 * l1)
            * zh.inverse()?;

        // [D] = v1 ([r] without the Z and S3 terms) + (...) [Z] - (...) [S3]
        let betaxi = beta * xi;
        let z_scalar = alpha
            * v[1]
            * (proof.eval_a + betaxi + gamma)
            * (proof.eval_b + betaxi * vk.k1 + gamma)
            * (proof.eval_c + betaxi * vk.k2 + gamma)
            + l1 * alpha2 * v[1]
            + u;
        let s3_scalar = alpha * v[1] * e1 * e2 * beta * proof.eval_zw;

        // [F] = [T1] + ξ^n [T2] + ξ^2n [T3] + [D] + v2 [A] + v3 [B] + v4 [C] + v5 [S1] + v6 [S2]
        let bases = [
            proof.t1, proof.t2, proof.t3, vk.qm, vk.ql, vk.qr, vk.qo, vk.qc, proof.z, vk.s3,
            proof.a, proof.b, proof.c, vk.s1, vk.s2,
        ];
        let scalars = [
            P::ScalarField::one(),
            xin,
            xin.square(),
            proof.eval_a * proof.eval_b * v[1],
            proof.eval_a * v[1],
            proof.eval_b * v[1],
            proof.eval_c * v[1],
            v[1],
            z_scalar,
            -s3_scalar,
            v[2],
            v[3],
            v[4],
            v[5],
            v[6],
        ];
        let f = P::G1::msm_unchecked(&bases, &scalars);

        // [E] = (t + v1 r + v2 a + v3 b + v4 c + v5 s1 + v6 s2 + u zw) [1]_1
        let e = t
            + v[1] * proof.eval_r
            + v[2] * proof.eval_a
            + v[3] * proof.eval_b
            + v[4] * proof.eval_c
            + v[5] * proof.eval_s1
            + v[6] * proof.eval_s2
            + u * proof.eval_zw;
        let e = P::G1Affine::generator() * e;

        let a1 = P::G1::from(proof.wxi) + proof.wxiw * u;
        let b1 = proof.wxi * xi + proof.wxiw * (u * xi * vk.w) + f - e;

        let batch = P::G1::normalize_batch(&[-a1, b1]);
        let qap = P::multi_miller_loop(
            [<P::G1Prepared>::from(batch[0]), <P::G1Prepared>::from(batch[1])],
            [key.x_2.clone(), key.g2.clone()],
        );
        Some(P::final_exponentiation(qap).is_some_and(|out| out.is_zero()))
    }
}

#[cfg(test)]
mod tests {
    use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
    use ark_ec::AffineRepr;
    use ark_ff::FftField;

    use super::*;

    fn test_vk(power: u32) -> JsonVerificationKey<Bn254> {
        let g1 = G1Affine::generator();
        let n = 1u64 << power;
        JsonVerificationKey {
            protocol: "plonk".to_owned(),
            curve: "bn128".to_owned(),
            n_public: 1,
            power,
            k1: Fr::from(2u64),
            k2: Fr::from(3u64),
            qm: g1,
            ql: g1,
            qr: g1,
            qo: g1,
            qc: g1,
            s1: g1,
            s2: g1,
            s3: g1,
            x_2: G2Affine::generator(),
            w: Fr::get_root_of_unity(n).unwrap(),
        }
    }

    #[test]
    fn rejects_non_primitive_root() {
        let mut vk = test_vk(3);
        vk.w = vk.w.square();
        assert!(matches!(PlonkVerifier::new(vk), Err(KeyError::Invalid(_))));

        let mut vk = test_vk(3);
        vk.w = Fr::from(5u64);
        assert!(matches!(PlonkVerifier::new(vk), Err(KeyError::Invalid(_))));
    }

    #[test]
    fn zeroed_blob_is_false() {
        let verifier = PlonkVerifier::new(test_vk(3)).unwrap();
        assert_eq!(verifier.verify_encoded(&[0u8; 800], &[[0u8; 32]]), Ok(false));
    }

    #[test]
    fn classifies_bad_requests() {
        let verifier = PlonkVerifier::new(test_vk(3)).unwrap();
        assert!(matches!(
            verifier.verify_encoded(&[0u8; 799], &[[0u8; 32]]),
            Err(VerificationError::MalformedProof(_))
        ));
        assert_eq!(
            verifier.verify_encoded(&[0u8; 800], &[[0xffu8; 32]]),
            Err(VerificationError::InvalidFieldElement { index: 0 })
        );
        let no_inputs: [[u8; 32]; 0] = [];
        assert_eq!(
            verifier.verify_encoded(&[0u8; 800], &no_inputs),
            Err(VerificationError::InputLengthMismatch {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn random_proof_is_false() {
        let verifier = PlonkVerifier::new(test_vk(3)).unwrap();
        let g = G1Affine::generator();
        let proof = PlonkProof::<Bn254>::from_parts([g; 9], [Fr::from(7u64); 7]);
        assert_eq!(verifier.verify(&proof, &[Fr::from(1u64)]), Ok(false));
        assert_eq!(verifier.verify(&proof, &[Fr::from(1u64)]), Ok(false));
    }
}
