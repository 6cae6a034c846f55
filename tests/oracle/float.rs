//! End-to-end float runs.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use division_oracle::gold::reference_fdiv_p2;
use division_oracle::{run_float_suite, FloatStrategy, OracleBuilder, ReportedValue};

use crate::common::{diverges_at_float, locate, reciprocal_weight, tiny_float_config};

#[test]
fn reference_passes_float_suite() {
    let summary = run_float_suite(reference_fdiv_p2, &tiny_float_config()).unwrap();
    assert_eq!(summary.operation, "calculate_fdiv_p2");
    let labels: Vec<&str> = summary
        .phases
        .iter()
        .map(|phase| phase.label.as_str())
        .collect();
    assert_eq!(
        labels,
        ["float_boundary", "powers_of_two", "float_random(seed=181601433)"]
    );
}

#[test]
fn zero_input_yields_positive_zero() {
    // Both signed zeros sum to +0.0 once the negated half is added.
    assert_eq!(reference_fdiv_p2(0.0).to_bits(), 0);
    assert_eq!(reference_fdiv_p2(-0.0).to_bits(), 0);
}

#[test]
fn negative_zero_result_is_a_mismatch() {
    let target = |x: f64| {
        let value = reference_fdiv_p2(x);
        if value == 0.0 {
            -0.0
        } else {
            value
        }
    };
    let err = run_float_suite(target, &tiny_float_config()).unwrap_err();
    let report = err.as_mismatch().unwrap();
    assert_eq!(report.phase, "float_boundary");
    assert_eq!(report.index, 0);
    assert_eq!(report.actual, ReportedValue::Float(-0.0));
    assert_eq!(
        report.to_string(),
        "Wrong value for calculate_fdiv_p2 at 0.0 (phase float_boundary, index 0): expected: 0.0 actual: -0.0"
    );
}

#[test]
fn nan_payload_is_not_part_of_the_contract() {
    let quiet_nan_with_payload = f64::from_bits(0x7ff8_0000_0000_0001);
    let target = move |x: f64| {
        let value = reference_fdiv_p2(x);
        if value.is_nan() {
            quiet_nan_with_payload
        } else {
            value
        }
    };
    assert!(run_float_suite(target, &tiny_float_config()).is_ok());
}

#[test]
fn divergence_is_located_in_every_phase() {
    let config = tiny_float_config();
    let strategies = config.float_strategies().unwrap();
    for bad in [f64::MAX, 2f64.powi(-500), -2f64.powi(77)] {
        let expected = locate(&strategies, bad).unwrap();
        let target = diverges_at_float(reference_fdiv_p2, bad);
        let err = run_float_suite(target, &config).unwrap_err();
        let report = err.as_mismatch().unwrap();
        assert_eq!((report.phase.clone(), report.index), expected, "input {bad:e}");
    }
}

#[test]
fn random_phase_divergence_is_located() {
    let config = tiny_float_config();
    let strategy = FloatStrategy::UniformRandom {
        seed: config.float_random_seed,
        count: config.float_random_count,
    };
    let bad = division_oracle::InputStrategy::inputs(&strategy).last().unwrap();
    let orchestrator = OracleBuilder::new()
        .with_float_strategies(vec![strategy])
        .build_float()
        .unwrap();
    let comparator = division_oracle::OracleComparator::new(
        division_oracle::Operation::FDIV_P2,
        diverges_at_float(reference_fdiv_p2, bad),
    );
    let err = orchestrator.run(&comparator).unwrap_err();
    let report = err.as_mismatch().unwrap();
    assert_eq!(report.input, ReportedValue::Float(bad));
    assert_eq!(report.index, config.float_random_count as u64 - 1);
}

#[test]
fn reciprocal_weight_is_caught_on_subnormal_powers() {
    let err = run_float_suite(reciprocal_weight, &tiny_float_config()).unwrap_err();
    let report = err.as_mismatch().unwrap();
    assert_eq!(report.phase, "powers_of_two");
    // 2^-1031, the first power whose weighted half rounds differently.
    assert_eq!(report.index, 4108);
    assert_eq!(report.input, ReportedValue::Float(f64::from_bits(1 << 43)));
}

#[test]
fn reciprocal_weight_agrees_on_normal_powers() {
    for x in [1.0, 2.0, -4.0, 1024.0, 2f64.powi(-20)] {
        assert_eq!(
            reciprocal_weight(x).to_bits(),
            reference_fdiv_p2(x).to_bits(),
            "{x}"
        );
    }
}
