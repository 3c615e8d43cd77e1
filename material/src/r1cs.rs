//! Gate lists as rank-1 constraint systems.
//!
//! A gate with a product term becomes `(qm·a) · b = -(ql·a + qr·b + qo·c + qc)`, a purely
//! linear gate becomes `(ql·a + qr·b + qo·c + qc) · 1 = 0`.

use ark_bn254::Fr;
use ark_ff::{One, Zero};
use ark_relations::{
    lc,
    r1cs::{ConstraintSynthesizer, ConstraintSystemRef, LinearCombination, SynthesisError, Variable},
};

use crate::circuit::Circuit;

pub(crate) struct R1csCircuit<'a> {
    pub(crate) circuit: &'a Circuit,
    /// `None` during setup
    pub(crate) witness: Option<&'a [Fr]>,
}

impl R1csCircuit<'_> {
    fn term(lc: LinearCombination<Fr>, coeff: Fr, var: Variable) -> LinearCombination<Fr> {
        if coeff.is_zero() { lc } else { lc + (coeff, var) }
    }
}

impl ConstraintSynthesizer<Fr> for R1csCircuit<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let num_public = self.circuit.num_public();
        let value = |i: usize| {
            self.witness
                .and_then(|w| w.get(i).copied())
                .ok_or(SynthesisError::AssignmentMissing)
        };

        let mut vars = Vec::with_capacity(self.circuit.num_signals());
        vars.push(Variable::One);
        for i in 1..self.circuit.num_signals() {
            let var = if i <= num_public {
                cs.new_input_variable(|| value(i))?
            } else {
                cs.new_witness_variable(|| value(i))?
            };
            vars.push(var);
        }

        for gate in self.circuit.gates() {
            let (a, b, c) = (vars[gate.a], vars[gate.b], vars[gate.c]);
            let sign = if gate.qm.is_zero() { Fr::one() } else { -Fr::one() };
            let linear = Self::term(lc!(), sign * gate.ql, a);
            let linear = Self::term(linear, sign * gate.qr, b);
            let linear = Self::term(linear, sign * gate.qo, c);
            let linear = Self::term(linear, sign * gate.qc, Variable::One);
            if gate.qm.is_zero() {
                cs.enforce_constraint(linear, lc!() + Variable::One, lc!())?;
            } else {
                cs.enforce_constraint(lc!() + (gate.qm, a), lc!() + b, linear)?;
            }
        }
        Ok(())
    }
}
