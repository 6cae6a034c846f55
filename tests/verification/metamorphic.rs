//! Metamorphic Testing for the division oracle
//!
//! These tests check relationships between runs instead of specific verdicts:
//!
//! 1. **Odd symmetry**: a target that answers `-f(-n)` is indistinguishable from `f`
//! 2. **Range splitting**: scanning two adjacent halves covers exactly the whole range
//! 3. **Phase reordering**: moving phases around changes where a defect is found, not which

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use division_oracle::gold::{reference_div_ext, reference_div_p2, reference_fdiv_p2};
use division_oracle::{
    run_float_suite, run_integer_suite, InputStrategy, Operation, OracleBuilder,
    OracleComparator, ReportedValue, Strategy,
};

use crate::common::{diverges_at, tiny_config, tiny_float_config};

// ============================================================================
// Odd symmetry
// ============================================================================

#[test]
fn mirrored_integer_target_passes() {
    for operation in Operation::INTEGER {
        let reference = operation.reference;
        // i64::MIN has no negation, so it is answered directly.
        let mirrored = move |n: i64| {
            if n == i64::MIN {
                reference(n)
            } else {
                reference(-n).wrapping_neg()
            }
        };
        assert!(
            run_integer_suite(operation, mirrored, &tiny_config()).is_ok(),
            "{}",
            operation.name
        );
    }
}

#[test]
fn mirrored_float_target_passes() {
    // Both zeros map to +0.0, so they are answered directly.
    let mirrored = |x: f64| {
        if x == 0.0 {
            reference_fdiv_p2(x)
        } else {
            -reference_fdiv_p2(-x)
        }
    };
    assert!(run_float_suite(mirrored, &tiny_float_config()).is_ok());
}

#[test]
fn mirroring_a_defect_mirrors_its_input() {
    let defect = diverges_at(reference_div_ext, 77);
    let mirrored = |n: i64| {
        if n == i64::MIN {
            defect(n)
        } else {
            defect(-n).wrapping_neg()
        }
    };
    let orchestrator = OracleBuilder::new()
        .with_strategies(vec![Strategy::dense_range(-100, 100).unwrap()])
        .build_integer()
        .unwrap();
    let err = orchestrator
        .run(&OracleComparator::new(Operation::DIV_EXT, mirrored))
        .unwrap_err();
    assert_eq!(err.as_mismatch().unwrap().input, ReportedValue::Int(-77));
}

// ============================================================================
// Range splitting
// ============================================================================

#[test]
fn split_dense_range_covers_the_same_inputs() {
    let whole = Strategy::dense_range(-300, 300).unwrap();
    let halves = [
        Strategy::dense_range(-300, 17).unwrap(),
        Strategy::dense_range(18, 300).unwrap(),
    ];

    let joined: Vec<i64> = halves.iter().flat_map(|half| half.inputs()).collect();
    assert_eq!(joined, whole.inputs().collect::<Vec<_>>());
    assert_eq!(
        halves.iter().map(|half| half.input_count().unwrap()).sum::<u64>(),
        whole.input_count().unwrap()
    );
}

#[test]
fn split_dense_range_locates_the_same_input() {
    let comparator = OracleComparator::new(Operation::DIV_P2, diverges_at(reference_div_p2, 150));

    let whole = OracleBuilder::new()
        .with_strategies(vec![Strategy::dense_range(-300, 300).unwrap()])
        .build_integer()
        .unwrap();
    let split = OracleBuilder::new()
        .with_strategies(vec![
            Strategy::dense_range(-300, 17).unwrap(),
            Strategy::dense_range(18, 300).unwrap(),
        ])
        .build_integer()
        .unwrap();

    let whole_report = whole.run(&comparator).unwrap_err();
    let split_report = split.run(&comparator).unwrap_err();
    let (whole_report, split_report) = (
        whole_report.as_mismatch().unwrap(),
        split_report.as_mismatch().unwrap(),
    );

    assert_eq!(whole_report.input, split_report.input);
    assert_eq!(whole_report.index, 450);
    assert_eq!(split_report.phase, "dense_range[18, 300]");
    assert_eq!(split_report.index, 132);
}

// ============================================================================
// Phase reordering
// ============================================================================

#[test]
fn reordering_phases_moves_the_report_not_the_input() {
    let comparator = OracleComparator::new(Operation::DIV_P2, diverges_at(reference_div_p2, 2));
    let dense = Strategy::dense_range(-5, 5).unwrap();

    let boundary_first = OracleBuilder::new()
        .with_strategies(vec![Strategy::Boundary, dense])
        .build_integer()
        .unwrap()
        .run(&comparator)
        .unwrap_err();
    let dense_first = OracleBuilder::new()
        .with_strategies(vec![dense, Strategy::Boundary])
        .build_integer()
        .unwrap()
        .run(&comparator)
        .unwrap_err();

    let (a, b) = (
        boundary_first.as_mismatch().unwrap(),
        dense_first.as_mismatch().unwrap(),
    );
    assert_eq!(a.input, b.input);
    assert_eq!((a.phase.as_str(), a.index), ("boundary", 3));
    assert_eq!((b.phase.as_str(), b.index), ("dense_range[-5, 5]", 7));
}
