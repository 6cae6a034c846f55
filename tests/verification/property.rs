//! Property-based tests for mismatch location.
//!
//! Every property plants exactly one defect and checks that the run reports the
//! first position of that input in the stream, and that nothing after it is tested.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use division_oracle::gold::{reference_div_ext, reference_div_p2, reference_fdiv_p2};
use division_oracle::sampling::boundary::{boundary_values, BOUNDARY_COUNT};
use division_oracle::sampling::float::random_doubles;
use division_oracle::sampling::uniform_random::uniform_samples;
use division_oracle::test_config::proptest_case_count;
use division_oracle::{
    FloatStrategy, Operation, OracleBuilder, OracleComparator, ReportedValue, Strategy,
};
use proptest::prelude::*;

use crate::common::{counting, diverges_at, diverges_at_float};

const RADIUS: i64 = 1000;

fn run_integer<F>(
    strategies: Vec<Strategy>,
    operation: Operation<i64>,
    target: F,
) -> Option<(String, u64, ReportedValue)>
where
    F: Fn(i64) -> i64,
{
    let orchestrator = OracleBuilder::new()
        .with_strategies(strategies)
        .build_integer()
        .unwrap();
    orchestrator
        .run(&OracleComparator::new(operation, target))
        .err()
        .map(|err| {
            let report = err.as_mismatch().unwrap().clone();
            (report.phase, report.index, report.input)
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_case_count(),
        ..ProptestConfig::default()
    })]

    /// Property: a defect inside a dense range is reported at its offset from the low end.
    #[test]
    fn prop_dense_defect_is_located(bad in -RADIUS..=RADIUS) {
        let strategies = vec![Strategy::dense_range(-RADIUS, RADIUS).unwrap()];
        let found = run_integer(strategies, Operation::DIV_P2, diverges_at(reference_div_p2, bad));
        prop_assert_eq!(
            found,
            Some((
                format!("dense_range[-{RADIUS}, {RADIUS}]"),
                (bad + RADIUS) as u64,
                ReportedValue::Int(bad)
            ))
        );
    }

    /// Property: the target is called exactly once per input up to and including the
    /// first mismatch.
    #[test]
    fn prop_run_is_fail_fast(bad in -RADIUS..=RADIUS) {
        let (target, calls) = counting(diverges_at(reference_div_ext, bad));
        let strategies = vec![Strategy::dense_range(-RADIUS, RADIUS).unwrap()];
        let found = run_integer(strategies, Operation::DIV_EXT, target);
        prop_assert!(found.is_some());
        prop_assert_eq!(calls.get(), (bad + RADIUS) as u64 + 1);
    }

    /// Property: a defect at any boundary value is reported at its first occurrence.
    #[test]
    fn prop_boundary_defect_is_located(position in 0..BOUNDARY_COUNT) {
        let bad = boundary_values().nth(position).unwrap();
        let first = boundary_values().position(|value| value == bad).unwrap();
        let target = diverges_at(reference_div_p2, bad);
        let found = run_integer(vec![Strategy::Boundary], Operation::DIV_P2, target);
        prop_assert_eq!(
            found,
            Some(("boundary".to_owned(), first as u64, ReportedValue::Int(bad)))
        );
    }

    /// Property: a defect at a random draw is reported at that draw's index.
    #[test]
    fn prop_random_defect_is_located(seed in any::<u64>(), position in 0usize..64) {
        let bad = uniform_samples(seed, 64).nth(position).unwrap();
        let first = uniform_samples(seed, 64).position(|value| value == bad).unwrap();
        let strategies = vec![Strategy::uniform_random(seed, 64)];
        let found = run_integer(strategies, Operation::DIV_EXT, diverges_at(reference_div_ext, bad));
        prop_assert_eq!(
            found,
            Some((format!("uniform_random(seed={seed})"), first as u64, ReportedValue::Int(bad)))
        );
    }

    /// Property: a float defect at a random draw is reported at that draw's index.
    #[test]
    fn prop_float_defect_is_located(seed in any::<u64>(), position in 0usize..64) {
        let bad = random_doubles(seed, 64).nth(position).unwrap();
        let first = random_doubles(seed, 64)
            .position(|value| value.to_bits() == bad.to_bits())
            .unwrap();
        let orchestrator = OracleBuilder::new()
            .with_float_strategies(vec![FloatStrategy::UniformRandom { seed, count: 64 }])
            .build_float()
            .unwrap();
        let comparator = OracleComparator::new(
            Operation::FDIV_P2,
            diverges_at_float(reference_fdiv_p2, bad),
        );
        let err = orchestrator.run(&comparator).unwrap_err();
        let report = err.as_mismatch().unwrap();
        prop_assert_eq!(report.phase.clone(), format!("float_random(seed={seed})"));
        prop_assert_eq!(report.index, first as u64);
    }
}
