//! End-to-end integer runs.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use division_oracle::gold::{reference_div_ext, reference_div_p2};
use division_oracle::sampling::uniform_random::uniform_samples;
use division_oracle::telemetry::{CollectingObserver, ViolationKind, ViolationSeverity};
use division_oracle::{
    assert_no_violations, run_integer_suite, InputStrategy, Operation, OracleBuilder,
    OracleComparator, OracleError, ReportedValue, Strategy,
};

use crate::common::{counting, diverges_at, locate, tiny_config};

// ============================================================================
// Passing runs
// ============================================================================

#[test]
fn reference_passes_both_operations() {
    for operation in Operation::INTEGER {
        let summary =
            run_integer_suite(operation, operation.reference, &tiny_config()).unwrap();
        assert_eq!(summary.operation, operation.name);
        assert_eq!(summary.phases.len(), 5);
    }
}

#[test]
fn phase_counts_match_configuration() {
    let config = tiny_config();
    let summary = run_integer_suite(Operation::DIV_P2, reference_div_p2, &config).unwrap();
    let counts: Vec<u64> = summary.phases.iter().map(|phase| phase.inputs).collect();
    let log = config.log_sweep_count as u64;
    assert_eq!(
        counts,
        [
            393,
            log,
            log,
            2 * config.dense_radius as u64 + 1,
            config.random_count as u64
        ]
    );
}

#[test]
fn passing_run_reports_nothing() {
    let observer = Arc::new(CollectingObserver::new());
    let orchestrator = OracleBuilder::new()
        .with_config(tiny_config())
        .with_observer(observer.clone())
        .build_integer()
        .unwrap();
    orchestrator
        .run(&OracleComparator::new(Operation::DIV_EXT, reference_div_ext))
        .unwrap();
    assert_no_violations!(observer);
}

// ============================================================================
// Mismatch location
// ============================================================================

#[test]
fn domain_minimum_divergence_cites_min() {
    let target = diverges_at(reference_div_p2, i64::MIN);
    let err = run_integer_suite(Operation::DIV_P2, target, &tiny_config()).unwrap_err();
    let report = err.as_mismatch().unwrap();

    assert_eq!(report.phase, "boundary");
    assert_eq!(report.index, 5);
    assert_eq!(report.input, ReportedValue::Int(i64::MIN));
    assert_eq!(
        report.to_string(),
        format!(
            "Wrong value for calculate_div_p2 at {} (phase boundary, index 5): expected: {} actual: {}",
            i64::MIN,
            reference_div_p2(i64::MIN),
            reference_div_p2(i64::MIN).wrapping_add(1)
        )
    );
}

#[test]
fn nonzero_result_for_zero_fails_first() {
    let (target, calls) = counting(|n| reference_div_ext(n) | 1);
    let err = run_integer_suite(Operation::DIV_EXT, target, &tiny_config()).unwrap_err();
    let report = err.as_mismatch().unwrap();
    assert_eq!(report.index, 0);
    assert_eq!(report.expected, ReportedValue::Int(0));
    assert_eq!(calls.get(), 1);
}

#[test]
fn wrong_constant_for_one_is_caught() {
    let target = |n: i64| if n == 1 { 8 } else { reference_div_p2(n) };
    let err = run_integer_suite(Operation::DIV_P2, target, &tiny_config()).unwrap_err();
    let report = err.as_mismatch().unwrap();
    assert_eq!(report.index, 1);
    assert_eq!(report.expected, ReportedValue::Int(9));
    assert_eq!(report.actual, ReportedValue::Int(8));
}

#[test]
fn divergence_in_each_phase_is_located_exactly() {
    let config = tiny_config();
    let strategies = config.integer_strategies().unwrap();
    let log_positive: Vec<i64> = strategies[1].inputs().collect();
    let log_negative: Vec<i64> = strategies[2].inputs().collect();
    let random: Vec<i64> = uniform_samples(config.random_seed, config.random_count).collect();

    let candidates = [
        log_positive[log_positive.len() / 2],
        *log_negative.last().unwrap(),
        config.dense_radius - 3,
        random[random.len() - 1],
    ];

    for bad in candidates {
        let expected = locate(&strategies, bad).unwrap();
        let target = diverges_at(reference_div_p2, bad);
        let err = run_integer_suite(Operation::DIV_P2, target, &config).unwrap_err();
        let report = err.as_mismatch().unwrap();
        assert_eq!((report.phase.clone(), report.index), expected, "input {bad}");
        assert_eq!(report.input, ReportedValue::Int(bad));
    }
}

#[test]
fn run_stops_at_first_mismatch() {
    let (target, calls) = counting(diverges_at(reference_div_p2, -2));
    let orchestrator = OracleBuilder::new()
        .with_config(tiny_config())
        .build_integer()
        .unwrap();
    let err = orchestrator
        .run(&OracleComparator::new(Operation::DIV_P2, target))
        .unwrap_err();
    assert_eq!(err.as_mismatch().unwrap().index, 4);
    assert_eq!(calls.get(), 5);
}

#[test]
fn mismatch_is_reported_to_observer() {
    let observer = Arc::new(CollectingObserver::new());
    let orchestrator = OracleBuilder::new()
        .with_strategies(vec![Strategy::dense_range(-10, 10).unwrap()])
        .with_observer(observer.clone())
        .build_integer()
        .unwrap();
    let comparator =
        OracleComparator::new(Operation::DIV_EXT, diverges_at(reference_div_ext, 3));
    assert!(orchestrator.run(&comparator).is_err());

    let violations = observer.violations_of_kind(ViolationKind::Mismatch);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].severity, ViolationSeverity::Critical);
    assert_eq!(violations[0].index, Some(13));
    assert_eq!(
        violations[0].context.get("phase").map(String::as_str),
        Some("dense_range[-10, 10]")
    );
}

// ============================================================================
// Determinism and configuration
// ============================================================================

#[test]
fn repeated_runs_agree() {
    let config = tiny_config();
    let bad = uniform_samples(config.random_seed, 1).next().unwrap();
    let target = diverges_at(reference_div_ext, bad);
    let first = run_integer_suite(Operation::DIV_EXT, &target, &config);
    let second = run_integer_suite(Operation::DIV_EXT, &target, &config);
    assert_eq!(first, second);
    assert!(matches!(first, Err(OracleError::Mismatch(_))));
}

#[test]
fn changing_the_seed_moves_the_random_phase() {
    let config = tiny_config();
    let bad = uniform_samples(config.random_seed, 1).next().unwrap();
    let other_seed = division_oracle::FixtureConfig {
        random_seed: config.random_seed + 1,
        ..config
    };
    // A single 64-bit draw from one seed does not reappear under another.
    let target = diverges_at(reference_div_p2, bad);
    assert!(run_integer_suite(Operation::DIV_P2, &target, &other_seed).is_ok());
    assert!(run_integer_suite(Operation::DIV_P2, &target, &config).is_err());
}

#[test]
fn configuration_errors_never_call_the_target() {
    let (target, calls) = counting(reference_div_p2);
    let config = division_oracle::FixtureConfig {
        dense_radius: -5,
        ..tiny_config()
    };
    let err = run_integer_suite(Operation::DIV_P2, target, &config).unwrap_err();
    assert!(matches!(err, OracleError::InvalidConfig { .. }));
    assert!(err.as_mismatch().is_none());
    assert_eq!(calls.get(), 0);
}

#[test]
fn summary_serializes_to_json() {
    let summary = run_integer_suite(Operation::DIV_P2, reference_div_p2, &tiny_config()).unwrap();
    let value: serde_json::Value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["operation"], "calculate_div_p2");
    assert_eq!(value["phases"][0]["label"], "boundary");
    assert_eq!(value["phases"][0]["inputs"], 393);
    assert!(value["elapsed_ms"].is_f64());
}
