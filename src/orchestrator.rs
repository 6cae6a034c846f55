//! Drives a list of strategies through a comparator, phase by phase.
//!
//! A run visits every strategy in order and checks each input synchronously. The first
//! mismatch stops the run: it is reported to the violation observer and returned as
//! [`OracleError::Mismatch`]. A run that finishes yields a [`RunSummary`].

use std::sync::Arc;

use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use tracing::{debug, info};
use web_time::{Duration, Instant};

use crate::config::FixtureConfig;
use crate::error::OracleError;
use crate::oracle::{DivisionTarget, Operation, OracleComparator};
use crate::strategy::{FloatStrategy, InputStrategy, Strategy};
use crate::telemetry::{
    report_to_observer, OracleViolation, ViolationKind, ViolationObserver, ViolationSeverity,
};

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Statistics for one phase of a passing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSummary {
    /// Label of the strategy.
    pub label: String,
    /// Inputs checked.
    pub inputs: u64,
    /// Wall-clock time spent in the phase.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

/// Statistics for a passing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Symbol name of the operation that was checked.
    pub operation: &'static str,
    /// One entry per strategy, in run order.
    pub phases: SmallVec<[PhaseSummary; 4]>,
    /// Sum of the phases' input counts.
    pub total_inputs: u64,
    /// Wall-clock time of the whole run.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl RunSummary {
    /// Serializes this summary to a JSON string.
    ///
    /// Returns `None` if serialization fails.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

/// Runs strategies against a comparator, stopping at the first mismatch.
///
/// # Example
///
/// ```
/// use division_oracle::{Orchestrator, Operation, OracleComparator, Strategy};
/// use division_oracle::gold::reference_div_p2;
///
/// let orchestrator = Orchestrator::new(vec![
///     Strategy::Boundary,
///     Strategy::dense_range(-100, 100).unwrap(),
/// ]);
/// let comparator = OracleComparator::new(Operation::DIV_P2, reference_div_p2);
///
/// let summary = orchestrator.run(&comparator).unwrap();
/// assert_eq!(summary.total_inputs, 393 + 201);
/// ```
pub struct Orchestrator<S> {
    strategies: Vec<S>,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl<S: InputStrategy> Orchestrator<S> {
    /// Creates an orchestrator over `strategies`, run in the given order.
    #[must_use]
    pub fn new(strategies: Vec<S>) -> Self {
        Self {
            strategies,
            violation_observer: None,
        }
    }

    /// Sends violations to `observer` instead of the tracing observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// The strategies, in run order.
    pub fn strategies(&self) -> &[S] {
        &self.strategies
    }

    /// Checks every input of every strategy.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Mismatch`] for the first input on which the target
    /// disagrees with the reference. Nothing after that input is checked.
    pub fn run<F>(
        &self,
        comparator: &OracleComparator<S::Value, F>,
    ) -> Result<RunSummary, OracleError>
    where
        F: DivisionTarget<S::Value>,
    {
        let operation = comparator.operation().name;
        let run_start = Instant::now();
        let mut phases = SmallVec::new();
        let mut total_inputs = 0u64;

        for strategy in &self.strategies {
            let label = strategy.label();
            let phase_start = Instant::now();
            debug!(
                operation,
                phase = %label,
                expected_inputs = ?strategy.input_count(),
                "phase started"
            );

            let mut inputs = 0u64;
            for input in strategy.inputs() {
                let outcome = comparator.check(input);
                if !outcome.is_pass() {
                    let report = outcome.to_report(operation, &label, inputs);
                    let violation = OracleViolation::new(
                        ViolationSeverity::Critical,
                        ViolationKind::Mismatch,
                        format!("{} disagrees with reference", operation),
                        concat!(file!(), ":", line!()),
                    )
                    .with_index(inputs)
                    .with_context("phase", label.as_str())
                    .with_context("input", report.input.to_string())
                    .with_context("expected", report.expected.to_string())
                    .with_context("actual", report.actual.to_string());
                    report_to_observer(self.violation_observer.as_ref(), &violation);
                    return Err(report.into());
                }
                inputs += 1;
            }

            let elapsed = phase_start.elapsed();
            info!(
                operation,
                phase = %label,
                inputs,
                elapsed_ms = elapsed.as_millis() as u64,
                "phase passed"
            );
            total_inputs += inputs;
            phases.push(PhaseSummary {
                label,
                inputs,
                elapsed,
            });
        }

        Ok(RunSummary {
            operation,
            phases,
            total_inputs,
            elapsed: run_start.elapsed(),
        })
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Orchestrator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("strategies", &self.strategies)
            .field("has_observer", &self.violation_observer.is_some())
            .finish()
    }
}

/// Runs the integer suite of `config` for one operation.
///
/// ```
/// use division_oracle::{run_integer_suite, FixtureConfig, Operation};
///
/// let config = FixtureConfig {
///     log_sweep_count: 100,
///     dense_radius: 100,
///     random_count: 100,
///     ..FixtureConfig::smoke()
/// };
/// let summary = run_integer_suite(Operation::DIV_EXT, Operation::DIV_EXT.reference, &config).unwrap();
/// assert_eq!(summary.phases.len(), 5);
/// ```
///
/// # Errors
///
/// Returns a configuration error if `config` is invalid, or the first mismatch.
pub fn run_integer_suite<F>(
    operation: Operation<i64>,
    target: F,
    config: &FixtureConfig,
) -> Result<RunSummary, OracleError>
where
    F: DivisionTarget<i64>,
{
    let orchestrator: Orchestrator<Strategy> = Orchestrator::new(config.integer_strategies()?);
    orchestrator.run(&OracleComparator::new(operation, target))
}

/// Runs the float suite of `config` for `calculate_fdiv_p2`.
///
/// # Errors
///
/// Returns a configuration error if `config` is invalid, or the first mismatch.
pub fn run_float_suite<F>(target: F, config: &FixtureConfig) -> Result<RunSummary, OracleError>
where
    F: DivisionTarget<f64>,
{
    let orchestrator: Orchestrator<FloatStrategy> = Orchestrator::new(config.float_strategies()?);
    orchestrator.run(&OracleComparator::new(Operation::FDIV_P2, target))
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::gold::{reference_div_p2, reference_fdiv_p2};
    use crate::oracle::ReportedValue;
    use crate::sampling::boundary::BOUNDARY_COUNT;
    use crate::telemetry::CollectingObserver;
    use crate::{assert_no_violations, assert_violation};

    fn tiny_config() -> FixtureConfig {
        FixtureConfig {
            log_sweep_count: 50,
            dense_radius: 50,
            random_count: 50,
            float_random_count: 50,
            ..FixtureConfig::smoke()
        }
    }

    #[test]
    fn reference_passes_its_own_suite() {
        let summary = run_integer_suite(Operation::DIV_P2, reference_div_p2, &tiny_config()).unwrap();
        assert_eq!(summary.operation, "calculate_div_p2");
        assert_eq!(
            summary.phases.iter().map(|p| p.inputs).collect::<Vec<_>>(),
            [BOUNDARY_COUNT as u64, 50, 50, 101, 50]
        );
        assert_eq!(summary.total_inputs, 393 + 50 + 50 + 101 + 50);
    }

    #[test]
    fn float_reference_passes_its_own_suite() {
        let summary = run_float_suite(reference_fdiv_p2, &tiny_config()).unwrap();
        assert_eq!(summary.operation, "calculate_fdiv_p2");
        assert_eq!(summary.total_inputs, 13 + 4196 + 50);
    }

    #[test]
    fn stops_at_first_mismatch_with_phase_and_index() {
        let calls = std::cell::Cell::new(0u64);
        let target = |n: i64| {
            calls.set(calls.get() + 1);
            if n == i64::MIN {
                0
            } else {
                reference_div_p2(n)
            }
        };
        let observer = Arc::new(CollectingObserver::new());
        let orchestrator = Orchestrator::new(tiny_config().integer_strategies().unwrap())
            .with_observer(observer.clone());

        let err = orchestrator
            .run(&OracleComparator::new(Operation::DIV_P2, target))
            .unwrap_err();
        let report = err.as_mismatch().unwrap();

        assert_eq!(report.phase, "boundary");
        assert_eq!(report.index, 5);
        assert_eq!(report.input, ReportedValue::Int(i64::MIN));
        assert_eq!(report.actual, ReportedValue::Int(0));
        assert_eq!(calls.get(), 6);

        assert_violation!(observer, ViolationKind::Mismatch);
        let violation = &observer.violations()[0];
        assert_eq!(violation.severity, ViolationSeverity::Critical);
        assert_eq!(violation.index, Some(5));
        assert_eq!(
            violation.context.get("input"),
            Some(&i64::MIN.to_string())
        );
    }

    #[test]
    fn passing_run_reports_no_violations() {
        let observer = Arc::new(CollectingObserver::new());
        let orchestrator =
            Orchestrator::new(vec![Strategy::Boundary]).with_observer(observer.clone());
        orchestrator
            .run(&OracleComparator::new(Operation::DIV_P2, reference_div_p2))
            .unwrap();
        assert_no_violations!(observer);
    }

    #[test]
    fn empty_strategy_list_passes_trivially() {
        let orchestrator: Orchestrator<Strategy> = Orchestrator::new(Vec::new());
        let summary = orchestrator
            .run(&OracleComparator::new(Operation::DIV_P2, |_: i64| 0))
            .unwrap();
        assert_eq!(summary.total_inputs, 0);
        assert!(summary.phases.is_empty());
    }

    #[test]
    fn repeated_runs_give_the_same_verdict() {
        // 37 is not in the boundary set or either log sweep, so the dense scan finds it.
        let target = |n: i64| {
            if n == 37 {
                n
            } else {
                reference_div_p2(n)
            }
        };
        let orchestrator = Orchestrator::new(tiny_config().integer_strategies().unwrap());
        let comparator = OracleComparator::new(Operation::DIV_P2, target);
        let first = orchestrator.run(&comparator);
        let second = orchestrator.run(&comparator);
        assert_eq!(first, second);

        let err = first.unwrap_err();
        let report = err.as_mismatch().unwrap();
        assert_eq!(report.phase, "dense_range[-50, 50]");
        assert_eq!(report.index, 87);
    }

    #[test]
    fn invalid_config_fails_before_any_call() {
        let config = FixtureConfig {
            log_sweep_count: 0,
            ..tiny_config()
        };
        let err = run_integer_suite(
            Operation::DIV_P2,
            |_: i64| -> i64 { panic!("target must not be called") },
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, OracleError::InvalidConfig { .. }));
    }

    #[test]
    fn summary_serializes_elapsed_as_millis() {
        let summary = RunSummary {
            operation: "calculate_div_p2",
            phases: SmallVec::from_vec(vec![PhaseSummary {
                label: "boundary".to_owned(),
                inputs: 393,
                elapsed: Duration::from_millis(3),
            }]),
            total_inputs: 393,
            elapsed: Duration::from_millis(4),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""elapsed_ms":3.0"#));
        assert!(json.contains(r#""elapsed_ms":4.0"#));
        assert!(json.contains(r#""total_inputs":393"#));
    }
}
