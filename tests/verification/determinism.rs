//! Determinism of input streams and run verdicts.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use division_oracle::gold::{reference_div_ext, reference_fdiv_p2};
use division_oracle::sampling::float::random_doubles;
use division_oracle::sampling::uniform_random::uniform_samples;
use division_oracle::{run_float_suite, run_integer_suite, InputStrategy, Operation};

use crate::common::{diverges_at, diverges_at_float, tiny_config, tiny_float_config};

#[test]
fn integer_streams_are_identical_across_calls() {
    let config = tiny_config();
    let first: Vec<Vec<i64>> = config
        .integer_strategies()
        .unwrap()
        .iter()
        .map(|strategy| strategy.inputs().collect())
        .collect();
    let second: Vec<Vec<i64>> = config
        .integer_strategies()
        .unwrap()
        .iter()
        .map(|strategy| strategy.inputs().collect())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn float_streams_are_bit_identical_across_calls() {
    let config = tiny_float_config();
    let bits = || -> Vec<u64> {
        config
            .float_strategies()
            .unwrap()
            .iter()
            .flat_map(|strategy| strategy.inputs().map(f64::to_bits).collect::<Vec<_>>())
            .collect()
    };
    assert_eq!(bits(), bits());
}

#[test]
fn shorter_random_phase_is_a_prefix_of_a_longer_one() {
    let short: Vec<i64> = uniform_samples(42, 100).collect();
    let long: Vec<i64> = uniform_samples(42, 1000).collect();
    assert_eq!(short[..], long[..100]);

    let short: Vec<u64> = random_doubles(7, 50).map(f64::to_bits).collect();
    let long: Vec<u64> = random_doubles(7, 500).map(f64::to_bits).collect();
    assert_eq!(short[..], long[..50]);
}

#[test]
fn verdicts_do_not_depend_on_the_subscriber() {
    let config = tiny_config();
    let bad = uniform_samples(config.random_seed, 3).last().unwrap();
    let target = diverges_at(reference_div_ext, bad);

    let silent = run_integer_suite(Operation::DIV_EXT, &target, &config);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    let traced = tracing::subscriber::with_default(subscriber, || {
        run_integer_suite(Operation::DIV_EXT, &target, &config)
    });

    assert_eq!(silent, traced);
    assert_eq!(silent.unwrap_err().as_mismatch().unwrap().index, 2);
}

#[test]
fn float_mismatch_report_is_reproducible() {
    let config = tiny_float_config();
    let bad = random_doubles(config.float_random_seed, 10).last().unwrap();
    let target = diverges_at_float(reference_fdiv_p2, bad);
    let first = run_float_suite(&target, &config).unwrap_err();
    let second = run_float_suite(&target, &config).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}
