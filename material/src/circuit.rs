//! Arithmetic circuits as lists of PLONK gates over circom-style signals.
//!
//! Signals are numbered the way circom numbers witness entries: signal 0 is the
//! constant one, followed by the public outputs and then everything else. A gate
//! constrains three signals `a`, `b`, `c`:
//!
//! ```text
//! qm·a·b + ql·a + qr·b + qo·c + qc = 0
//! ```
//!
//! Constants enter through `qc`, never through signal 0, so the same gate list can be
//! proven with PLONK directly and with Groth16 after conversion to R1CS.

use std::collections::HashMap;

use ark_bn254::Fr;
use ark_ff::{AdditiveGroup, One, Zero};
use ruint::aliases::U256;

use crate::{
    ProverError,
    proof_input::{ProofInput, field_input, scalar_input, u256_to_fr},
};

/// `qm·a·b + ql·a + qr·b + qo·c + qc = 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    /// Multiplication selector
    pub qm: Fr,
    /// Left selector
    pub ql: Fr,
    /// Right selector
    pub qr: Fr,
    /// Output selector
    pub qo: Fr,
    /// Constant
    pub qc: Fr,
    /// Left signal
    pub a: usize,
    /// Right signal
    pub b: usize,
    /// Output signal
    pub c: usize,
}

impl Gate {
    /// `a · b = c`
    pub fn mul(a: usize, b: usize, c: usize) -> Self {
        Self {
            qm: Fr::one(),
            qo: -Fr::one(),
            a,
            b,
            c,
            ..Self::empty()
        }
    }

    /// `ql·a + qr·b + qo·c + qc = 0`
    pub fn linear(ql: Fr, a: usize, qr: Fr, b: usize, qo: Fr, c: usize, qc: Fr) -> Self {
        Self {
            ql,
            qr,
            qo,
            qc,
            a,
            b,
            c,
            ..Self::empty()
        }
    }

    /// `a · (a - 1) = 0`
    pub fn boolean(a: usize) -> Self {
        Self {
            qm: Fr::one(),
            ql: -Fr::one(),
            a,
            b: a,
            ..Self::empty()
        }
    }

    /// The gate that constrains nothing. All wires point at signal 0.
    pub fn empty() -> Self {
        Self {
            qm: Fr::zero(),
            ql: Fr::zero(),
            qr: Fr::zero(),
            qo: Fr::zero(),
            qc: Fr::zero(),
            a: 0,
            b: 0,
            c: 0,
        }
    }

    /// The left hand side of the gate equation, `None` if a wire is out of range.
    pub fn evaluate(&self, witness: &[Fr]) -> Option<Fr> {
        let (a, b, c) = (
            witness.get(self.a)?,
            witness.get(self.b)?,
            witness.get(self.c)?,
        );
        Some(self.qm * a * b + self.ql * a + self.qr * b + self.qo * c + self.qc)
    }
}

type WitnessFn = fn(&HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError>;

/// A circuit with its witness calculator.
#[derive(Debug, Clone)]
pub struct Circuit {
    id: String,
    num_public: usize,
    num_signals: usize,
    gates: Vec<Gate>,
    witness: WitnessFn,
}

impl Circuit {
    /// Creates a circuit. `witness` computes all `num_signals` signals from the inputs.
    pub fn new(
        id: impl Into<String>,
        num_public: usize,
        num_signals: usize,
        gates: Vec<Gate>,
        witness: WitnessFn,
    ) -> Self {
        Self {
            id: id.into(),
            num_public,
            num_signals,
            gates,
            witness,
        }
    }

    /// The id the circuit is registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of public signals (outputs).
    pub fn num_public(&self) -> usize {
        self.num_public
    }

    /// Number of signals including the constant one.
    pub fn num_signals(&self) -> usize {
        self.num_signals
    }

    /// The gates.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Checks that the circuit has room for its public signals and that every gate
    /// wire names an existing signal.
    pub fn validate(&self) -> Result<(), ProverError> {
        let invalid = |reason: String| ProverError::InvalidCircuit {
            id: self.id.clone(),
            reason,
        };
        if self.num_public >= self.num_signals {
            return Err(invalid(format!(
                "{} public signals do not fit into {} signals",
                self.num_public, self.num_signals
            )));
        }
        for (i, gate) in self.gates.iter().enumerate() {
            if let Some(signal) = [gate.a, gate.b, gate.c]
                .into_iter()
                .find(|s| *s >= self.num_signals)
            {
                return Err(invalid(format!("gate {i} references unknown signal {signal}")));
            }
        }
        Ok(())
    }

    /// Computes the witness and checks it against every gate.
    pub fn generate_witness(&self, inputs: &impl ProofInput) -> Result<Vec<Fr>, ProverError> {
        let witness = (self.witness)(&inputs.prepare_input())?;
        if witness.len() != self.num_signals || witness.first() != Some(&Fr::one()) {
            return Err(ProverError::WitnessGeneration(eyre::eyre!(
                "witness calculator of {} returned a malformed witness",
                self.id
            )));
        }
        for (i, gate) in self.gates.iter().enumerate() {
            if gate.evaluate(&witness) != Some(Fr::zero()) {
                return Err(ProverError::WitnessGeneration(eyre::eyre!(
                    "{}: gate {i} is not satisfied",
                    self.id
                )));
            }
        }
        tracing::trace!(circuit = %self.id, signals = witness.len(), "computed witness");
        Ok(witness)
    }

    /// The public signals of a witness, `witness[1..=num_public]`.
    pub fn public_signals(&self, witness: &[Fr]) -> Result<Vec<Fr>, ProverError> {
        witness
            .get(1..=self.num_public)
            .map(<[Fr]>::to_vec)
            .ok_or_else(|| {
                ProverError::ProofGeneration(eyre::eyre!(
                    "witness of {} has only {} signals",
                    self.id,
                    witness.len()
                ))
            })
    }

    /// `out = a · b`
    pub fn multiplier2() -> Self {
        // [1, out, a, b]
        fn witness(inputs: &HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError> {
            let a = field_input(inputs, "a")?;
            let b = field_input(inputs, "b")?;
            Ok(vec![Fr::one(), a * b, a, b])
        }
        Self::new("Multiplier2", 1, 4, vec![Gate::mul(2, 3, 1)], witness)
    }

    /// `out = a · b · c`
    pub fn multiplier3() -> Self {
        // [1, out, a, b, c, a·b]
        fn witness(inputs: &HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError> {
            let a = field_input(inputs, "a")?;
            let b = field_input(inputs, "b")?;
            let c = field_input(inputs, "c")?;
            Ok(vec![Fr::one(), a * b * c, a, b, c, a * b])
        }
        Self::new(
            "Multiplier3",
            1,
            6,
            vec![Gate::mul(2, 3, 5), Gate::mul(5, 4, 1)],
            witness,
        )
    }

    /// `out = in < 10`, compared as 32-bit numbers like circomlib's `LessThan(32)`:
    /// the 33 bits of `in + 2^32 - 10` are computed and `out = 1 - bit32`.
    pub fn less_than10() -> Self {
        const BITS: usize = 33;
        // [1, out, in, bit0..bit32, acc1..acc32] with acc_i = sum_{j <= i} 2^j bit_j
        const BIT0: usize = 3;
        const ACC1: usize = BIT0 + BITS;
        let bit = |i: usize| BIT0 + i;
        let acc = |i: usize| if i == 0 { bit(0) } else { ACC1 + i - 1 };

        fn witness(inputs: &HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError> {
            let value = scalar_input(inputs, "in")?;
            let input = u256_to_fr(value).ok_or_else(|| {
                ProverError::WitnessGeneration(eyre::eyre!("input in is not a field element"))
            })?;
            let shifted = value + U256::from((1u64 << 32) - 10);
            if shifted >> BITS != U256::ZERO {
                return Err(ProverError::WitnessGeneration(eyre::eyre!(
                    "input in does not fit into 32 bits"
                )));
            }
            let bits = (0..BITS)
                .map(|i| Fr::from(shifted.bit(i) as u64))
                .collect::<Vec<_>>();
            let mut witness = vec![Fr::one(), Fr::one() - bits[BITS - 1], input];
            witness.extend(&bits);
            let mut acc = bits[0];
            let mut power = Fr::one();
            for b in &bits[1..] {
                power.double_in_place();
                acc += power * b;
                witness.push(acc);
            }
            Ok(witness)
        }

        let mut gates = (0..BITS).map(|i| Gate::boolean(bit(i))).collect::<Vec<_>>();
        let mut power = Fr::one();
        for i in 1..BITS {
            power.double_in_place();
            gates.push(Gate::linear(
                Fr::one(),
                acc(i - 1),
                power,
                bit(i),
                -Fr::one(),
                acc(i),
                Fr::zero(),
            ));
        }
        // in + 2^32 - 10 = acc32
        gates.push(Gate::linear(
            Fr::one(),
            2,
            Fr::zero(),
            0,
            -Fr::one(),
            acc(BITS - 1),
            Fr::from((1u64 << 32) - 10),
        ));
        // out = 1 - bit32
        gates.push(Gate::linear(
            Fr::one(),
            1,
            Fr::one(),
            bit(BITS - 1),
            Fr::zero(),
            0,
            -Fr::one(),
        ));
        Self::new("LessThan10", 1, ACC1 + BITS - 1, gates, witness)
    }

    /// Multiplier2, Multiplier3 and LessThan10.
    pub fn builtin() -> Vec<Self> {
        vec![Self::multiplier2(), Self::multiplier3(), Self::less_than10()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_follow_circom_layout() {
        let witness = Circuit::multiplier2()
            .generate_witness(&[("a", 2), ("b", 3)])
            .unwrap();
        assert_eq!(witness[0], Fr::one());
        assert_eq!(witness[1], Fr::from(6u64));

        let circuit = Circuit::multiplier3();
        let witness = circuit
            .generate_witness(&[("a", 3), ("b", 5), ("c", 7)])
            .unwrap();
        assert_eq!(witness[0], Fr::one());
        assert_eq!(circuit.public_signals(&witness).unwrap(), vec![Fr::from(105u64)]);
    }

    #[test]
    fn less_than10() {
        let circuit = Circuit::less_than10();
        assert_eq!(circuit.num_signals(), 68);
        for (input, expected) in [(5u64, 1u64), (9, 1), (10, 0), (100, 0), ((1 << 32) + 9, 0)] {
            let witness = circuit.generate_witness(&[("in", input)]).unwrap();
            assert_eq!(witness[0], Fr::one());
            assert_eq!(witness[1], Fr::from(expected), "in = {input}");
        }
        assert!(matches!(
            circuit.generate_witness(&[("in", (1u64 << 32) + 10)]),
            Err(ProverError::WitnessGeneration(_))
        ));
    }

    #[test]
    fn reports_missing_inputs() {
        assert!(matches!(
            Circuit::multiplier3().generate_witness(&[("a", 3), ("b", 5)]),
            Err(ProverError::MissingInput(name)) if name == "c"
        ));
    }

    #[test]
    fn detects_bad_witness() {
        fn lying(_: &HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError> {
            Ok(vec![Fr::one(), Fr::from(7u64), Fr::from(2u64), Fr::from(3u64)])
        }
        let circuit = Circuit::new("Lying", 1, 4, vec![Gate::mul(2, 3, 1)], lying);
        assert!(matches!(
            circuit.generate_witness(&[("a", 2), ("b", 3)]),
            Err(ProverError::WitnessGeneration(_))
        ));
    }

    #[test]
    fn validation() {
        for circuit in Circuit::builtin() {
            circuit.validate().unwrap();
        }
        fn three(_: &HashMap<String, Vec<U256>>) -> Result<Vec<Fr>, ProverError> {
            Ok(vec![Fr::one(); 3])
        }
        let unknown_signal = Circuit::new("Bad", 1, 3, vec![Gate::mul(1, 2, 3)], three);
        assert!(matches!(
            unknown_signal.validate(),
            Err(ProverError::InvalidCircuit { reason, .. }) if reason.contains("signal 3")
        ));
        let crowded = Circuit::new("Bad", 3, 3, Vec::new(), three);
        assert!(matches!(crowded.validate(), Err(ProverError::InvalidCircuit { .. })));
        assert!(matches!(
            crowded.public_signals(&[Fr::one(); 3]),
            Err(ProverError::ProofGeneration(_))
        ));
    }
}
