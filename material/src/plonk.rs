//! PLONK proving in the snarkjs layout.
//!
//! The KZG setup keeps its trapdoor τ, so a commitment is simply `[p(τ)]_1` and no
//! powers of τ are materialized. Proofs carry no blinding factors. The Fiat-Shamir
//! challenges come from [`plonk::Transcript`] in the same order the verifier uses.
//!
//! Row layout: the first `nPublic` rows hold the public signals in wire `a` with
//! `ql = 1`, followed by one row per gate, padded with empty gates to a power of two.

use std::collections::HashMap;

use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, One, UniformRand, Zero};
use ark_poly::{
    DenseUVPolynomial, EvaluationDomain, Polynomial, Radix2EvaluationDomain,
    univariate::DensePolynomial,
};
use circom_types::{
    plonk::{JsonVerificationKey, PlonkProof},
    traits::CircomArkworksPairingBridge,
};
use plonk::{PlonkVerifier, Transcript, transcript::batching_powers};
use rand::{CryptoRng, Rng};

use crate::{Circuit, ProofGenerator, ProverError, proof_input::ProofInput};

type Poly = DensePolynomial<Fr>;

/// Coset shifts of the `b` and `c` wire columns.
const K1: u64 = 2;
const K2: u64 = 3;

#[derive(Debug)]
struct PlonkSetup {
    circuit: Circuit,
    domain: Radix2EvaluationDomain<Fr>,
    tau: Fr,
    /// Signal index of every wire, per column `a`, `b`, `c`
    wires: [Vec<usize>; 3],
    /// qm, ql, qr, qo, qc
    selectors: [Poly; 5],
    sigma_evals: [Vec<Fr>; 3],
    sigma: [Poly; 3],
    vk: JsonVerificationKey<Bn254>,
    verifier: PlonkVerifier<Bn254>,
}

fn constant(c: Fr) -> Poly {
    Poly::from_coefficients_vec(vec![c])
}

fn scale(p: &Poly, s: Fr) -> Poly {
    Poly::from_coefficients_vec(p.coeffs.iter().map(|c| *c * s).collect())
}

fn sum(polys: &[Poly]) -> Poly {
    polys.iter().fold(Poly::zero(), |acc, p| &acc + p)
}

/// `p(w·X)`
fn shift(p: &Poly, w: Fr) -> Poly {
    let mut power = Fr::one();
    let coeffs = p
        .coeffs
        .iter()
        .map(|c| {
            let shifted = *c * power;
            power *= w;
            shifted
        })
        .collect();
    Poly::from_coefficients_vec(coeffs)
}

/// `p / (X^n - 1)`, `None` if the division leaves a remainder.
fn divide_by_vanishing(p: &Poly, n: usize) -> Option<Poly> {
    let mut rem = p.coeffs.clone();
    if rem.len() <= n {
        return rem.iter().all(Zero::is_zero).then(Poly::zero);
    }
    let mut quotient = vec![Fr::zero(); rem.len() - n];
    for i in (n..rem.len()).rev() {
        let c = rem[i];
        quotient[i - n] = c;
        rem[i] = Fr::zero();
        rem[i - n] += c;
    }
    rem.iter()
        .all(Zero::is_zero)
        .then(|| Poly::from_coefficients_vec(quotient))
}

/// `(p(X) - p(z)) / (X - z)`
fn open(p: &Poly, z: Fr) -> Poly {
    let coeffs = &p.coeffs;
    if coeffs.len() < 2 {
        return Poly::zero();
    }
    let mut quotient = vec![Fr::zero(); coeffs.len() - 1];
    let mut carry = Fr::zero();
    for i in (1..coeffs.len()).rev() {
        carry = coeffs[i] + carry * z;
        quotient[i - 1] = carry;
    }
    Poly::from_coefficients_vec(quotient)
}

/// Coefficients `[from, from + n)` of `p`.
fn chunk(p: &Poly, from: usize, n: usize) -> Poly {
    let coeffs = p.coeffs.iter().skip(from).take(n).copied().collect();
    Poly::from_coefficients_vec(coeffs)
}

impl PlonkSetup {
    fn new<R: Rng + CryptoRng>(circuit: Circuit, rng: &mut R) -> Result<Self, ProverError> {
        circuit.validate()?;
        let num_public = circuit.num_public();
        let rows = num_public + circuit.gates().len();
        let domain = Radix2EvaluationDomain::<Fr>::new(rows.next_power_of_two().max(4))
            .ok_or_else(|| {
                ProverError::ProofGeneration(eyre::eyre!("circuit is too large for the domain"))
            })?;
        let n = domain.size();

        let mut selectors: [Vec<Fr>; 5] = std::array::from_fn(|_| vec![Fr::zero(); n]);
        let mut wires: [Vec<usize>; 3] = std::array::from_fn(|_| vec![0; n]);
        for row in 0..num_public {
            selectors[1][row] = Fr::one();
            wires[0][row] = row + 1;
        }
        for (i, gate) in circuit.gates().iter().enumerate() {
            let row = num_public + i;
            for (column, q) in selectors
                .iter_mut()
                .zip([gate.qm, gate.ql, gate.qr, gate.qo, gate.qc])
            {
                column[row] = q;
            }
            wires[0][row] = gate.a;
            wires[1][row] = gate.b;
            wires[2][row] = gate.c;
        }

        // every signal's wires form one cycle of the copy permutation
        let omega = domain.elements().collect::<Vec<_>>();
        let shifts = [Fr::one(), Fr::from(K1), Fr::from(K2)];
        let mut cycles = vec![Vec::new(); circuit.num_signals()];
        for (col, column) in wires.iter().enumerate() {
            for (row, signal) in column.iter().enumerate() {
                cycles[*signal].push((col, row));
            }
        }
        let mut sigma_evals: [Vec<Fr>; 3] = std::array::from_fn(|_| vec![Fr::zero(); n]);
        for cycle in &cycles {
            for (i, (col, row)) in cycle.iter().enumerate() {
                let (next_col, next_row) = cycle[(i + 1) % cycle.len()];
                sigma_evals[*col][*row] = shifts[next_col] * omega[next_row];
            }
        }

        let interpolate = |evals: &[Fr]| Poly::from_coefficients_vec(domain.ifft(evals));
        let selectors = selectors.map(|column| interpolate(&column));
        let sigma = std::array::from_fn(|i| interpolate(&sigma_evals[i]));

        let tau = Fr::rand(rng);
        let commit = |p: &Poly| (G1Affine::generator() * p.evaluate(&tau)).into_affine();
        let vk = JsonVerificationKey {
            protocol: "plonk".to_owned(),
            curve: Bn254::get_circom_name(),
            n_public: num_public,
            power: n.trailing_zeros(),
            k1: Fr::from(K1),
            k2: Fr::from(K2),
            qm: commit(&selectors[0]),
            ql: commit(&selectors[1]),
            qr: commit(&selectors[2]),
            qo: commit(&selectors[3]),
            qc: commit(&selectors[4]),
            s1: commit(&sigma[0]),
            s2: commit(&sigma[1]),
            s3: commit(&sigma[2]),
            x_2: (G2Affine::generator() * tau).into_affine(),
            w: omega[1],
        };
        let verifier = PlonkVerifier::new(vk.clone())
            .map_err(|e| ProverError::ProofGeneration(eyre::Report::new(e)))?;
        tracing::debug!(circuit = circuit.id(), n, "plonk setup done");

        Ok(Self {
            circuit,
            domain,
            tau,
            wires,
            selectors,
            sigma_evals,
            sigma,
            vk,
            verifier,
        })
    }

    fn commit(&self, p: &Poly) -> G1Affine {
        (G1Affine::generator() * p.evaluate(&self.tau)).into_affine()
    }

    fn prove(&self, witness: &[Fr]) -> Result<(PlonkProof<Bn254>, Vec<Fr>), ProverError> {
        if witness.len() != self.circuit.num_signals() {
            return Err(ProverError::ProofGeneration(eyre::eyre!(
                "expected {} signals, got {}",
                self.circuit.num_signals(),
                witness.len()
            )));
        }
        let n = self.domain.size();
        let omega = self.domain.element(1);
        let public_inputs = self.circuit.public_signals(witness)?;
        let interpolate = |evals: &[Fr]| Poly::from_coefficients_vec(self.domain.ifft(evals));
        let unsatisfied =
            || ProverError::ProofGeneration(eyre::eyre!("witness does not satisfy the circuit"));

        // round 1: wires
        let values: [Vec<Fr>; 3] =
            std::array::from_fn(|col| self.wires[col].iter().map(|s| witness[*s]).collect());
        let [a, b, c] = std::array::from_fn(|col| interpolate(&values[col]));
        let (commit_a, commit_b, commit_c) = (self.commit(&a), self.commit(&b), self.commit(&c));

        let mut transcript = Transcript::<Bn254>::new();
        for input in &public_inputs {
            transcript.add_scalar(input);
        }
        transcript.add_point(&commit_a);
        transcript.add_point(&commit_b);
        transcript.add_point(&commit_c);
        let beta = transcript.challenge();
        transcript.add_scalar(&beta);
        let gamma = transcript.challenge();

        // round 2: permutation accumulator
        let shifts = [Fr::one(), Fr::from(K1), Fr::from(K2)];
        let mut z_evals = Vec::with_capacity(n);
        z_evals.push(Fr::one());
        for (row, w) in self.domain.elements().enumerate().take(n - 1) {
            let mut num = Fr::one();
            let mut den = Fr::one();
            for col in 0..3 {
                num *= values[col][row] + beta * shifts[col] * w + gamma;
                den *= values[col][row] + beta * self.sigma_evals[col][row] + gamma;
            }
            z_evals.push(z_evals[row] * num * den.inverse().ok_or_else(unsatisfied)?);
        }
        let z = interpolate(&z_evals);
        let commit_z = self.commit(&z);
        transcript.add_point(&commit_z);
        let alpha = transcript.challenge();

        // round 3: quotient
        let [qm, ql, qr, qo, qc] = &self.selectors;
        let [s1, s2, s3] = &self.sigma;
        let mut pi_evals = vec![Fr::zero(); n];
        for (eval, input) in pi_evals.iter_mut().zip(&public_inputs) {
            *eval = -*input;
        }
        let pi = interpolate(&pi_evals);
        let x = Poly::from_coefficients_vec(vec![Fr::zero(), Fr::one()]);
        let l1 = Poly::from_coefficients_vec(vec![
            Fr::from(n as u64).inverse().ok_or_else(unsatisfied)?;
            n
        ]);
        // p + β·s + γ
        let perm = |p: &Poly, s: &Poly| sum(&[p.clone(), scale(s, beta), constant(gamma)]);

        let gate = sum(&[
            &(&a * &b) * qm,
            &a * ql,
            &b * qr,
            &c * qo,
            qc.clone(),
            pi,
        ]);
        let id_product = &(&(&perm(&a, &x) * &perm(&b, &scale(&x, shifts[1])))
            * &perm(&c, &scale(&x, shifts[2])))
            * &z;
        let sigma_product =
            &(&(&perm(&a, s1) * &perm(&b, s2)) * &perm(&c, s3)) * &shift(&z, omega);
        let boundary = &(&z - &constant(Fr::one())) * &l1;
        let numerator = sum(&[
            gate,
            scale(&(&id_product - &sigma_product), alpha),
            scale(&boundary, alpha.square()),
        ]);
        let t = divide_by_vanishing(&numerator, n).ok_or_else(unsatisfied)?;
        if t.coeffs.len() > 3 * n {
            return Err(ProverError::ProofGeneration(eyre::eyre!(
                "quotient has degree {}, expected less than {}",
                t.coeffs.len() - 1,
                3 * n
            )));
        }
        let [t1, t2, t3] = std::array::from_fn(|i| chunk(&t, i * n, n));
        let [commit_t1, commit_t2, commit_t3] = [&t1, &t2, &t3].map(|p| self.commit(p));
        transcript.add_point(&commit_t1);
        transcript.add_point(&commit_t2);
        transcript.add_point(&commit_t3);
        let xi = transcript.challenge();

        // round 4: evaluations
        let eval_a = a.evaluate(&xi);
        let eval_b = b.evaluate(&xi);
        let eval_c = c.evaluate(&xi);
        let eval_s1 = s1.evaluate(&xi);
        let eval_s2 = s2.evaluate(&xi);
        let eval_zw = z.evaluate(&(xi * omega));

        let betaxi = beta * xi;
        let z_coeff = alpha
            * (eval_a + betaxi + gamma)
            * (eval_b + betaxi * shifts[1] + gamma)
            * (eval_c + betaxi * shifts[2] + gamma)
            + alpha.square() * l1.evaluate(&xi);
        let s3_coeff = alpha
            * beta
            * eval_zw
            * (eval_a + beta * eval_s1 + gamma)
            * (eval_b + beta * eval_s2 + gamma);
        let r = sum(&[
            scale(qm, eval_a * eval_b),
            scale(ql, eval_a),
            scale(qr, eval_b),
            scale(qo, eval_c),
            qc.clone(),
            scale(&z, z_coeff),
            scale(s3, -s3_coeff),
        ]);
        let eval_r = r.evaluate(&xi);
        let evaluations = [eval_a, eval_b, eval_c, eval_s1, eval_s2, eval_zw, eval_r];
        for eval in &evaluations {
            transcript.add_scalar(eval);
        }
        let v = batching_powers(transcript.challenge());

        // round 5: openings
        let xin = xi.pow([n as u64]);
        let combined = sum(&[
            t1,
            scale(&t2, xin),
            scale(&t3, xin.square()),
            scale(&r, v[1]),
            scale(&a, v[2]),
            scale(&b, v[3]),
            scale(&c, v[4]),
            scale(s1, v[5]),
            scale(s2, v[6]),
        ]);
        let wxi = self.commit(&open(&combined, xi));
        let wxiw = self.commit(&open(&z, xi * omega));

        let proof = PlonkProof::from_parts(
            [
                commit_a, commit_b, commit_c, commit_z, commit_t1, commit_t2, commit_t3, wxi, wxiw,
            ],
            evaluations,
        );
        Ok((proof, public_inputs))
    }
}

/// PLONK keys and verifiers for a set of circuits.
///
/// Built by [`MaterialBuilder::build_plonk`](crate::MaterialBuilder::build_plonk).
#[derive(Debug)]
pub struct PlonkMaterial {
    setups: HashMap<String, PlonkSetup>,
}

impl PlonkMaterial {
    pub(crate) fn setup<R: Rng + CryptoRng>(
        circuits: Vec<Circuit>,
        rng: &mut R,
    ) -> Result<Self, ProverError> {
        let mut setups = HashMap::with_capacity(circuits.len());
        for circuit in circuits {
            let id = circuit.id().to_owned();
            setups.insert(id, PlonkSetup::new(circuit, rng)?);
        }
        Ok(Self { setups })
    }

    fn get(&self, circuit_id: &str) -> Result<&PlonkSetup, ProverError> {
        self.setups
            .get(circuit_id)
            .ok_or_else(|| ProverError::UnknownCircuit(circuit_id.to_owned()))
    }

    /// The circuit registered under `circuit_id`.
    pub fn circuit(&self, circuit_id: &str) -> Result<&Circuit, ProverError> {
        Ok(&self.get(circuit_id)?.circuit)
    }

    /// The verification key of `circuit_id` in snarkjs form.
    pub fn verification_key(
        &self,
        circuit_id: &str,
    ) -> Result<JsonVerificationKey<Bn254>, ProverError> {
        Ok(self.get(circuit_id)?.vk.clone())
    }

    /// A verifier for `circuit_id`.
    pub fn verifier(&self, circuit_id: &str) -> Result<&PlonkVerifier<Bn254>, ProverError> {
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

    /// Generates a PLONK proof from a witness. The result is deterministic.
    ///
    /// Doesn't verify the proof internally.
    pub fn generate_proof_from_witness(
        &self,
        circuit_id: &str,
        witness: &[Fr],
    ) -> Result<(PlonkProof<Bn254>, Vec<Fr>), ProverError> {
        self.get(circuit_id)?.prove(witness)
    }

    /// Checks `proof` with the zkcheck verifier.
    pub fn verify_proof(
        &self,
        circuit_id: &str,
        proof: &PlonkProof<Bn254>,
        public_inputs: &[Fr],
    ) -> Result<(), ProverError> {
        match self.verifier(circuit_id)?.verify(proof, public_inputs) {
            Ok(true) => Ok(()),
            _ => Err(ProverError::InvalidProof),
        }
    }
}

impl ProofGenerator for PlonkMaterial {
    type Proof = PlonkProof<Bn254>;

    fn prove(
        &self,
        circuit_id: &str,
        inputs: &impl ProofInput,
    ) -> Result<(Self::Proof, Vec<Fr>), ProverError> {
        let witness = self.generate_witness(circuit_id, inputs)?;
        self.generate_proof_from_witness(circuit_id, &witness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[u64]) -> Poly {
        Poly::from_coefficients_vec(coeffs.iter().map(|c| Fr::from(*c)).collect())
    }

    #[test]
    fn divides_by_vanishing_polynomial() {
        // (X^4 - 1)(2 + 3X) = -2 - 3X + 2X^4 + 3X^5
        let p = sum(&[poly(&[0, 0, 0, 0, 2, 3]), scale(&poly(&[2, 3]), -Fr::one())]);
        assert_eq!(divide_by_vanishing(&p, 4), Some(poly(&[2, 3])));
        assert_eq!(divide_by_vanishing(&poly(&[1, 0, 0, 0, 2, 3]), 4), None);
        assert_eq!(divide_by_vanishing(&Poly::zero(), 4), Some(Poly::zero()));
    }

    #[test]
    fn opening_quotient() {
        let p = poly(&[5, 0, 7, 1]);
        let z = Fr::from(3u64);
        let q = open(&p, z);
        let x = Fr::from(11u64);
        assert_eq!(q.evaluate(&x) * (x - z), p.evaluate(&x) - p.evaluate(&z));
    }

    #[test]
    fn shifted_polynomial() {
        let p = poly(&[1, 2, 3]);
        let w = Fr::from(5u64);
        let x = Fr::from(7u64);
        assert_eq!(shift(&p, w).evaluate(&x), p.evaluate(&(w * x)));
        assert_eq!(chunk(&p, 1, 1), poly(&[2]));
        assert_eq!(chunk(&p, 3, 2), Poly::zero());
    }
}
