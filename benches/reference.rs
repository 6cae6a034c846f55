//! Benchmarks for the reference expressions and a full oracle pass
//!
//! Run with: cargo bench --bench reference
//!
//! The reference cost bounds how fast any run can go, since every input is
//! evaluated twice (once by the target, once by the reference).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use division_oracle::gold::{reference_div_ext, reference_div_p2, reference_fdiv_p2};
use division_oracle::sampling::boundary::boundary_values;
use division_oracle::sampling::float::powers_of_two;
use division_oracle::{Operation, OracleBuilder, OracleComparator, Strategy};
use std::hint::black_box;

fn bench_integer_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("Integer reference");
    let inputs: Vec<i64> = boundary_values().collect();
    group.throughput(Throughput::Elements(inputs.len() as u64));

    for (name, reference) in [
        ("div_p2", reference_div_p2 as fn(i64) -> i64),
        ("div_ext", reference_div_ext),
    ] {
        group.bench_with_input(BenchmarkId::new(name, "boundary"), &inputs, |b, inputs| {
            b.iter(|| {
                inputs
                    .iter()
                    .fold(0i64, |acc, &n| acc.wrapping_add(reference(black_box(n))))
            });
        });
    }

    group.finish();
}

fn bench_float_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("Float reference");
    let inputs: Vec<f64> = powers_of_two().collect();
    group.throughput(Throughput::Elements(inputs.len() as u64));

    group.bench_function("fdiv_p2/powers_of_two", |b| {
        b.iter(|| {
            inputs
                .iter()
                .map(|&x| reference_fdiv_p2(black_box(x)))
                .filter(|value| value.is_finite())
                .count()
        });
    });

    group.finish();
}

fn bench_oracle_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oracle pass");

    for radius in [1_000i64, 10_000, 100_000] {
        let Ok(strategy) = Strategy::dense_range(-radius, radius) else {
            continue;
        };
        let Ok(orchestrator) = OracleBuilder::new()
            .with_strategies(vec![strategy])
            .build_integer()
        else {
            continue;
        };
        let comparator = OracleComparator::new(Operation::DIV_P2, reference_div_p2);
        group.throughput(Throughput::Elements(2 * radius as u64 + 1));
        group.bench_with_input(
            BenchmarkId::new("dense", radius),
            &comparator,
            |b, comparator| {
                b.iter(|| orchestrator.run(black_box(comparator)).is_ok());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_integer_reference,
    bench_float_reference,
    bench_oracle_pass
);
criterion_main!(benches);
