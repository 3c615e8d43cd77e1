//! Keccak-256 Fiat-Shamir transcript in the layout used by snarkjs PLONK verifiers.
//!
//! Scalars are absorbed as fixed-width big-endian words, G1 points as `x || y` (the
//! identity as zeros). A challenge is `keccak256(absorbed bytes) mod r` and resets the
//! buffer, so every challenge hashes only what was absorbed since the previous one.
//!
//! The absorption order is part of the wire contract between prover and verifier:
//!
//! | challenge | absorbed                                   |
//! |-----------|--------------------------------------------|
//! | β         | public inputs, A, B, C                     |
//! | γ         | β                                          |
//! | α         | Z                                          |
//! | ξ         | T1, T2, T3                                 |
//! | v1        | eval_a, eval_b, eval_c, eval_s1, eval_s2, eval_zw, eval_r |
//! | u         | Wxi, Wxiw                                  |

use std::marker::PhantomData;

use alloy_primitives::keccak256;
use ark_ec::pairing::Pairing;
use ark_ff::{Field, PrimeField};
use circom_types::{field, plonk::PlonkProof, traits::CircomArkworksPairingBridge};

/// Byte buffer that is hashed into scalar field challenges.
#[derive(Debug, Clone)]
pub struct Transcript<P: Pairing> {
    buffer: Vec<u8>,
    _curve: PhantomData<P>,
}

impl<P: Pairing + CircomArkworksPairingBridge> Transcript<P> {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            _curve: PhantomData,
        }
    }

    /// Absorbs a scalar.
    pub fn add_scalar(&mut self, s: &P::ScalarField) {
        self.buffer.extend(field::to_be_bytes(s));
    }

    /// Absorbs a G1 point.
    pub fn add_point(&mut self, p: &P::G1Affine) {
        self.buffer.extend(P::g1_to_be_bytes(p));
    }

    /// Hashes everything absorbed so far into a challenge and clears the buffer.
    pub fn challenge(&mut self) -> P::ScalarField {
        let digest = keccak256(&self.buffer);
        self.buffer.clear();
        P::ScalarField::from_be_bytes_mod_order(digest.as_slice())
    }
}

impl<P: Pairing + CircomArkworksPairingBridge> Default for Transcript<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// All Fiat-Shamir challenges of one proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenges<F: PrimeField> {
    /// Permutation challenge β
    pub beta: F,
    /// Permutation challenge γ
    pub gamma: F,
    /// Constraint separation challenge α
    pub alpha: F,
    /// Evaluation point ξ
    pub xi: F,
    /// Opening batching powers `v[0] = 1, v[i] = v1^i` for `i = 1..=6`
    pub v: [F; 7],
    /// Multipoint batching challenge u
    pub u: F,
}

impl<F: PrimeField> Challenges<F> {
    /// Recomputes the challenges a verifier derives for `proof`.
    pub fn compute<P>(proof: &PlonkProof<P>, public_inputs: &[F]) -> Self
    where
        P: Pairing<ScalarField = F> + CircomArkworksPairingBridge,
    {
        let mut transcript = Transcript::<P>::new();
        for input in public_inputs {
            transcript.add_scalar(input);
        }
        transcript.add_point(&proof.a);
        transcript.add_point(&proof.b);
        transcript.add_point(&proof.c);
        let beta = transcript.challenge();

        transcript.add_scalar(&beta);
        let gamma = transcript.challenge();

        transcript.add_point(&proof.z);
        let alpha = transcript.challenge();

        transcript.add_point(&proof.t1);
        transcript.add_point(&proof.t2);
        transcript.add_point(&proof.t3);
        let xi = transcript.challenge();

        for eval in proof.evaluations() {
            transcript.add_scalar(&eval);
        }
        let v1 = transcript.challenge();

        transcript.add_point(&proof.wxi);
        transcript.add_point(&proof.wxiw);
        let u = transcript.challenge();

        Self {
            beta,
            gamma,
            alpha,
            xi,
            v: batching_powers(v1),
            u,
        }
    }
}

/// `[1, v1, v1^2, ..., v1^6]`
pub fn batching_powers<F: Field>(v1: F) -> [F; 7] {
    let mut v = [F::ONE; 7];
    for i in 1..7 {
        v[i] = v[i - 1] * v1;
    }
    v
}

#[cfg(test)]
mod tests {
    use ark_bn254::{Bn254, Fr, G1Affine};
    use ark_ec::AffineRepr;
    use ark_ff::{One, Zero};

    use super::*;

    #[test]
    fn challenge_is_keccak_mod_r() {
        let mut transcript = Transcript::<Bn254>::new();
        transcript.add_scalar(&Fr::one());
        let mut word = [0u8; 32];
        word[31] = 1;
        let expected = Fr::from_be_bytes_mod_order(keccak256(word).as_slice());
        assert_eq!(transcript.challenge(), expected);
        // buffer was reset
        let empty = Fr::from_be_bytes_mod_order(keccak256([0u8; 0]).as_slice());
        assert_eq!(transcript.challenge(), empty);
    }

    #[test]
    fn identity_is_absorbed_as_zeros() {
        let mut with_identity = Transcript::<Bn254>::new();
        with_identity.add_point(&G1Affine::zero());
        let mut with_zeros = Transcript::<Bn254>::new();
        with_zeros.add_scalar(&Fr::zero());
        with_zeros.add_scalar(&Fr::zero());
        assert_eq!(with_identity.challenge(), with_zeros.challenge());
    }

    #[test]
    fn public_inputs_bind_beta() {
        let g = G1Affine::generator();
        let proof = PlonkProof::<Bn254>::from_parts([g; 9], [Fr::one(); 7]);
        let c1 = Challenges::compute(&proof, &[Fr::from(6u64)]);
        let c2 = Challenges::compute(&proof, &[Fr::from(7u64)]);
        assert_ne!(c1.beta, c2.beta);
        assert_ne!(c1.gamma, c2.gamma);
        // later rounds only hash their own commitments
        assert_eq!(c1.xi, c2.xi);
        assert_eq!(c1, Challenges::compute(&proof, &[Fr::from(6u64)]));
        assert_eq!(c1.v[0], Fr::one());
        assert_eq!(c1.v[3], c1.v[1] * c1.v[1] * c1.v[1]);
    }
}
