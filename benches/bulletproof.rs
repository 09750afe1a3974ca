use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mpt_confidential_proofs::bulletproof;
use mpt_confidential_proofs::group;
use mpt_confidential_proofs::scalar::{random_nonzero, SecretScalar};

fn bench_prove(c: &mut Criterion) {
    let h_base = group::create(&random_nonzero().unwrap()).unwrap();
    let ctx = [11u8; 32];

    let mut group_bench = c.benchmark_group("bulletproof::prove");
    for &m in &[1usize, 2, 4] {
        let values: Vec<u64> = (0..m).map(|i| 1_000 + i as u64).collect();
        let blindings: Vec<SecretScalar> = (0..m).map(|_| SecretScalar::random().unwrap()).collect();
        group_bench.bench_with_input(BenchmarkId::from_parameter(m), &m, |b, _| {
            b.iter(|| bulletproof::prove(black_box(&values), &blindings, &h_base, &ctx).unwrap())
        });
    }
    group_bench.finish();
}

fn bench_verify(c: &mut Criterion) {
    let h_base = group::create(&random_nonzero().unwrap()).unwrap();
    let ctx = [11u8; 32];

    let mut group_bench = c.benchmark_group("bulletproof::verify");
    for &m in &[1usize, 2, 4] {
        let values: Vec<u64> = (0..m).map(|i| 1_000 + i as u64).collect();
        let blindings: Vec<SecretScalar> = (0..m).map(|_| SecretScalar::random().unwrap()).collect();
        let (proof, commitments) = bulletproof::prove(&values, &blindings, &h_base, &ctx).unwrap();
        group_bench.bench_with_input(BenchmarkId::from_parameter(m), &m, |b, _| {
            b.iter(|| bulletproof::verify(black_box(&proof), &commitments, &h_base, &ctx).unwrap())
        });
    }
    group_bench.finish();
}

criterion_group!(benches, bench_prove, bench_verify);
criterion_main!(benches);
