use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use zkcheck_material::{MaterialBuilder, ProofGenerator};

const INPUTS: [(&str, u64); 3] = [("a", 3), ("b", 5), ("c", 7)];

fn groth16(c: &mut Criterion) {
    let material = MaterialBuilder::new().build_groth16().unwrap();
    let (proof, public) = material
        .prove("Multiplier3", &INPUTS)
        .unwrap();
    let verifier = material.verifier("Multiplier3").unwrap();
    let bytes = proof.to_be_bytes();
    let words = public
        .iter()
        .map(circom_types::field::to_be_bytes)
        .collect::<Vec<_>>();

    let mut group = c.benchmark_group("groth16");
    group.bench_function("verify", |b| {
        b.iter(|| verifier.verify(black_box(&proof), black_box(&public)))
    });
    group.bench_function("verify_encoded", |b| {
        b.iter(|| verifier.verify_encoded(black_box(&bytes), black_box(&words)))
    });
    let batch = vec![(proof, public); 16];
    group.bench_function("verify_batch/16", |b| {
        b.iter(|| verifier.verify_batch(black_box(&batch)))
    });
    group.finish();
}

fn plonk(c: &mut Criterion) {
    let material = MaterialBuilder::new().build_plonk().unwrap();
    let (proof, public) = material
        .prove("Multiplier3", &INPUTS)
        .unwrap();
    let verifier = material.verifier("Multiplier3").unwrap();

    let mut group = c.benchmark_group("plonk");
    group.bench_function("verify", |b| {
        b.iter(|| verifier.verify(black_box(&proof), black_box(&public)))
    });
    group.sample_size(10);
    group.bench_function("prove/LessThan10", |b| {
        b.iter(|| material.prove("LessThan10", black_box(&[("in", 5u64)])))
    });
    group.finish();
}

criterion_group!(benches, groth16, plonk);
criterion_main!(benches);
