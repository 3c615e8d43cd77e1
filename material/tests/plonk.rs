use std::{collections::HashMap, sync::LazyLock};

use ark_bn254::{Bn254, Fr, G1Affine};
use ark_ec::AffineRepr;
use circom_types::{KeyLoader, VerificationError, field, plonk::PlonkProof};
use plonk::{Challenges, PlonkVerifier};
use ruint::aliases::U256;
use zkcheck_material::{MaterialBuilder, PlonkMaterial, ProofGenerator, ProverError};

mod common;

use common::{hidden_product, malformed, powers};

static MATERIAL: LazyLock<PlonkMaterial> = LazyLock::new(|| {
    MaterialBuilder::new()
        .seed(42)
        .circuit(powers())
        .circuit(hidden_product())
        .build_plonk()
        .unwrap()
});

fn prove(circuit_id: &str, inputs: &[(&str, u64)]) -> (PlonkProof<Bn254>, Vec<Fr>) {
    let inputs = inputs
        .iter()
        .map(|(name, value)| (name.to_string(), vec![U256::from(*value)]))
        .collect::<HashMap<_, _>>();
    MATERIAL.prove(circuit_id, &inputs).unwrap()
}

fn words(public: &[Fr]) -> Vec<Vec<u8>> {
    public.iter().map(field::to_be_bytes).collect()
}

#[test]
fn valid_proofs_verify() {
    let cases: [(&str, &[(&str, u64)], u64); 5] = [
        ("Multiplier2", &[("a", 2), ("b", 3)], 6),
        ("Multiplier3", &[("a", 3), ("b", 5), ("c", 7)], 105),
        ("LessThan10", &[("in", 5)], 1),
        ("LessThan10", &[("in", (1 << 32) + 9)], 0),
        ("LessThan10", &[("in", 100)], 0),
    ];
    for (circuit_id, inputs, expected) in cases {
        let (proof, public) = prove(circuit_id, inputs);
        assert_eq!(public, vec![Fr::from(expected)], "{circuit_id}");
        let verifier = MATERIAL.verifier(circuit_id).unwrap();
        assert_eq!(verifier.verify(&proof, &public), Ok(true), "{circuit_id}");
        assert_eq!(
            verifier.verify_encoded(&proof.to_be_bytes(), &words(&public)),
            Ok(true),
            "{circuit_id}"
        );
    }
}

#[test]
fn zeroed_proof_is_rejected() {
    let verifier = MATERIAL.verifier("Multiplier3").unwrap();
    let zero = PlonkProof::<Bn254>::from_parts([G1Affine::zero(); 9], [Fr::from(0u64); 7]);
    assert_eq!(verifier.verify(&zero, &[Fr::from(0u64)]), Ok(false));
    assert_eq!(verifier.verify_encoded(&[0u8; 800], &[[0u8; 32]]), Ok(false));
}

#[test]
fn changed_public_input_is_rejected() {
    let (proof, _) = prove("Multiplier3", &[("a", 3), ("b", 5), ("c", 7)]);
    let verifier = MATERIAL.verifier("Multiplier3").unwrap();
    assert_eq!(verifier.verify(&proof, &[Fr::from(106u64)]), Ok(false));
    assert!(matches!(
        MATERIAL.verify_proof("Multiplier3", &proof, &[Fr::from(106u64)]),
        Err(ProverError::InvalidProof)
    ));
}

#[test]
fn bit_flips_never_verify() {
    let (proof, public) = prove("Multiplier2", &[("a", 2), ("b", 3)]);
    let verifier = MATERIAL.verifier("Multiplier2").unwrap();
    let blob = proof.to_be_bytes();
    let public = words(&public);
    for i in (0..blob.len()).step_by(23) {
        let mut flipped = blob.clone();
        flipped[i] ^= 0x80 >> (i % 8);
        assert_ne!(verifier.verify_encoded(&flipped, &public), Ok(true), "byte {i}");
    }
}

#[test]
fn proofs_are_deterministic() {
    let (proof, public) = prove("LessThan10", &[("in", 100)]);
    let (again, _) = prove("LessThan10", &[("in", 100)]);
    assert_eq!(proof, again);
    assert_eq!(
        Challenges::compute(&proof, &public),
        Challenges::compute(&again, &public)
    );
    let verifier = MATERIAL.verifier("LessThan10").unwrap();
    assert_eq!(verifier.verify(&proof, &public), verifier.verify(&again, &public));
}

#[test]
fn classifies_malformed_requests() {
    let (proof, public) = prove("Multiplier2", &[("a", 2), ("b", 3)]);
    let verifier = MATERIAL.verifier("Multiplier2").unwrap();
    let blob = proof.to_be_bytes();
    assert_eq!(
        verifier.verify(&proof, &[public[0], public[0]]),
        Err(VerificationError::InputLengthMismatch {
            expected: 1,
            actual: 2
        })
    );
    assert_eq!(
        verifier.verify_encoded(&blob, &[[0xffu8; 32]]),
        Err(VerificationError::InvalidFieldElement { index: 0 })
    );
    assert!(matches!(
        verifier.verify_encoded(&blob[..768], &words(&public)),
        Err(VerificationError::MalformedProof(_))
    ));
    let mut bad_eval = blob.clone();
    bad_eval[800 - 32..].fill(0xff);
    assert!(matches!(
        verifier.verify_encoded(&bad_eval, &words(&public)),
        Err(VerificationError::MalformedProof(_))
    ));
}

#[test]
fn snarkjs_json_round_trip() {
    let (proof, public) = prove("LessThan10", &[("in", 5)]);
    let vk_json = serde_json::to_vec(&MATERIAL.verification_key("LessThan10").unwrap()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&vk_json).unwrap();
    assert_eq!(value["protocol"], "plonk");
    assert_eq!(value["nPublic"], 1);
    assert_eq!(value["power"], 7);

    let vk = KeyLoader::new().load_from_bytes(&vk_json).unwrap();
    let verifier = PlonkVerifier::<Bn254>::new(vk).unwrap();
    let proof: PlonkProof<Bn254> =
        serde_json::from_str(&serde_json::to_string(&proof).unwrap()).unwrap();
    assert_eq!(verifier.verify(&proof, &public), Ok(true));
}

#[test]
fn proof_from_wrong_witness_fails() {
    let mut witness = MATERIAL
        .generate_witness("Multiplier2", &[("a", 2u64), ("b", 3)])
        .unwrap();
    witness[1] = Fr::from(7u64);
    assert!(matches!(
        MATERIAL.generate_proof_from_witness("Multiplier2", &witness),
        Err(ProverError::ProofGeneration(_))
    ));
}

#[test]
fn multiple_public_inputs_are_bound_in_order() {
    let (proof, public) = prove("Powers", &[("a", 3)]);
    assert_eq!(public, vec![Fr::from(9u64), Fr::from(27u64)]);
    let verifier = MATERIAL.verifier("Powers").unwrap();
    assert_eq!(verifier.num_public_inputs(), 2);
    assert_eq!(verifier.verify(&proof, &public), Ok(true));
    assert_eq!(
        verifier.verify_encoded(&proof.to_be_bytes(), &words(&public)),
        Ok(true)
    );
    assert_eq!(verifier.verify(&proof, &[public[1], public[0]]), Ok(false));
    assert_eq!(verifier.verify(&proof, &[public[0], Fr::from(28u64)]), Ok(false));
}

#[test]
fn circuit_without_public_inputs() {
    let (proof, public) = prove("HiddenProduct", &[("a", 4), ("b", 5)]);
    assert!(public.is_empty());
    let verifier = MATERIAL.verifier("HiddenProduct").unwrap();
    assert_eq!(verifier.num_public_inputs(), 0);
    assert_eq!(verifier.verify(&proof, &[]), Ok(true));
    assert_eq!(
        verifier.verify(&proof, &[Fr::from(20u64)]),
        Err(VerificationError::InputLengthMismatch {
            expected: 0,
            actual: 1
        })
    );
}

#[test]
fn malformed_circuits_are_rejected_at_setup() {
    for circuit in malformed() {
        assert!(matches!(
            MaterialBuilder::new().circuit(circuit).build_plonk(),
            Err(ProverError::InvalidCircuit { id, .. }) if id == "Bad"
        ));
    }
}
