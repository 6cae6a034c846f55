//! # Division Oracle
//!
//! A reference oracle for code generators that lower 64-bit integer (and binary64 float)
//! division by constants into shifts, multiplications and fix-up sequences.
//!
//! The oracle feeds a function under test a deterministic stream of inputs and compares
//! every result with a trusted reference. The stream is made of phases:
//!
//! 1. a fixed set of boundary values (`0`, `±1`, `i64::MIN`, `i64::MAX`, every `±2^k ± 1`),
//! 2. log-uniform magnitude sweeps over both halves of the domain,
//! 3. an exhaustive scan of a dense interval around zero,
//! 4. a seeded uniform sample of the whole domain.
//!
//! The first disagreement stops the run and is reported with the phase and index of the
//! offending input, so it can be reproduced without re-deriving the stream.
//!
//! ```
//! use division_oracle::{run_integer_suite, FixtureConfig, Operation};
//!
//! // A target that is wrong only for i64::MIN.
//! let target = |n: i64| {
//!     if n == i64::MIN { 0 } else { division_oracle::gold::reference_div_p2(n) }
//! };
//!
//! let err = run_integer_suite(Operation::DIV_P2, target, &FixtureConfig::smoke()).unwrap_err();
//! let report = err.as_mismatch().unwrap();
//! assert_eq!(report.phase, "boundary");
//! assert_eq!(report.index, 5);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use builder::OracleBuilder;
pub use config::FixtureConfig;
pub use error::OracleError;
pub use oracle::{
    ComparisonOutcome, DivisionTarget, MismatchReport, Operation, OracleComparator, OracleValue,
    ReportedValue, Status,
};
pub use orchestrator::{run_float_suite, run_integer_suite, Orchestrator, PhaseSummary, RunSummary};
pub use strategy::{FloatInputs, FloatStrategy, InputStrategy, Inputs, Strategy};

pub mod builder;
pub mod config;
pub mod error;
/// Reference implementations of the division expressions.
pub mod gold;
pub mod oracle;
pub mod orchestrator;
/// Deterministic random number generators.
///
/// Provides MT19937-64 and PCG32 without the `rand` crate, so the streams are stable
/// across dependency upgrades. See the module documentation for usage details.
pub mod rng;
pub mod strategy;
pub mod telemetry;
#[doc(hidden)]
pub mod test_config;

/// Input samplers, one module per strategy.
pub mod sampling {
    pub mod boundary;
    pub mod dense_range;
    pub mod float;
    pub mod log_magnitude;
    pub mod uniform_random;
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

    #[test]
    #[cfg_attr(miri, ignore)]
    fn reexports_cover_the_public_surface() {
        let orchestrator = OracleBuilder::new()
            .with_config(FixtureConfig::smoke())
            .build_integer()
            .unwrap();
        let comparator = OracleComparator::new(Operation::DIV_P2, gold::reference_div_p2);
        let summary: RunSummary = orchestrator.run(&comparator).unwrap();
        let phases: &[PhaseSummary] = &summary.phases;
        assert_eq!(phases.len(), 5);
        assert_eq!(
            summary.total_inputs,
            phases.iter().map(|phase| phase.inputs).sum::<u64>()
        );
    }

    #[test]
    fn zero_maps_to_zero_for_every_operation() {
        for operation in Operation::INTEGER {
            let outcome: ComparisonOutcome<i64> =
                OracleComparator::new(operation, |_: i64| 0).check(0);
            assert_eq!(outcome.status, Status::Pass);
        }
        assert!(OracleComparator::new(Operation::FDIV_P2, |_: f64| 0.0)
            .check(0.0)
            .is_pass());
    }
}
