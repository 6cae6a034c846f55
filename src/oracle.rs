//! Comparison of a function under test against its reference.
//!
//! An [`OracleComparator`] pairs an [`Operation`] (a named reference function) with a
//! [`DivisionTarget`] and checks them one input at a time. The comparator never stops a
//! run on its own; it hands back a [`ComparisonOutcome`] and the orchestrator decides.

use std::fmt;

use serde::Serialize;

use crate::gold::{reference_div_ext, reference_div_p2, reference_fdiv_p2};

/// A value the oracle can feed to a target and compare.
pub trait OracleValue: Copy + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Returns `true` if `self` and `other` are the same result.
    fn matches(&self, other: &Self) -> bool;

    /// Converts into the type-erased form carried by reports.
    fn reported(self) -> ReportedValue;
}

impl OracleValue for i64 {
    #[inline]
    fn matches(&self, other: &Self) -> bool {
        self == other
    }

    fn reported(self) -> ReportedValue {
        ReportedValue::Int(self)
    }
}

impl OracleValue for f64 {
    /// Bit-exact comparison, so `0.0` and `-0.0` differ. Any NaN matches any NaN.
    #[inline]
    fn matches(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits() || (self.is_nan() && other.is_nan())
    }

    fn reported(self) -> ReportedValue {
        ReportedValue::Float(self)
    }
}

/// An input or result as it appears in a [`MismatchReport`].
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ReportedValue {
    /// A signed 64-bit integer.
    Int(i64),
    /// A binary64 float.
    Float(f64),
}

impl PartialEq for ReportedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.matches(b),
            (Self::Float(a), Self::Float(b)) => a.matches(b),
            _ => false,
        }
    }
}

impl fmt::Display for ReportedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            // Debug keeps `-0.0` and switches to exponent form for extreme magnitudes.
            Self::Float(value) => write!(f, "{:?}", value),
        }
    }
}

/// The function under test.
///
/// Any `Fn(T) -> T` closure or function pointer is a target, including safe wrappers
/// around foreign `extern "C"` symbols.
pub trait DivisionTarget<T> {
    /// Evaluates the target for one input.
    fn evaluate(&self, input: T) -> T;
}

impl<T, F> DivisionTarget<T> for F
where
    F: Fn(T) -> T,
{
    #[inline]
    fn evaluate(&self, input: T) -> T {
        self(input)
    }
}

/// A named operation together with its reference implementation.
#[derive(Debug, Clone, Copy)]
pub struct Operation<T> {
    /// Unmangled symbol name of the native function implementing this operation.
    pub name: &'static str,
    /// The gold function.
    pub reference: fn(T) -> T,
}

impl Operation<i64> {
    /// Power-of-two divisors.
    pub const DIV_P2: Self = Self {
        name: "calculate_div_p2",
        reference: reference_div_p2,
    };

    /// Larger, partly prime divisors.
    pub const DIV_EXT: Self = Self {
        name: "calculate_div_ext",
        reference: reference_div_ext,
    };

    /// Every integer operation, in suite order.
    pub const INTEGER: [Self; 2] = [Self::DIV_P2, Self::DIV_EXT];
}

impl Operation<f64> {
    /// Float division by constants.
    pub const FDIV_P2: Self = Self {
        name: "calculate_fdiv_p2",
        reference: reference_fdiv_p2,
    };
}

/// Whether a single comparison passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Target and reference agree.
    Pass,
    /// Target and reference disagree. Terminal for the run.
    Mismatch,
}

/// Result of checking one input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonOutcome<T> {
    /// The input both functions were called with.
    pub input: T,
    /// What the reference returned.
    pub expected: T,
    /// What the function under test returned.
    pub actual: T,
    /// Verdict.
    pub status: Status,
}

impl<T: OracleValue> ComparisonOutcome<T> {
    /// Returns `true` if the target agreed with the reference.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }

    /// Builds the report for this outcome at the given position of a run.
    #[must_use]
    pub fn to_report(&self, operation: &'static str, phase: &str, index: u64) -> MismatchReport {
        MismatchReport {
            operation,
            phase: phase.to_owned(),
            index,
            input: self.input.reported(),
            expected: self.expected.reported(),
            actual: self.actual.reported(),
        }
    }
}

/// Everything needed to reproduce a failed comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchReport {
    /// Symbol name of the failing operation.
    pub operation: &'static str,
    /// Label of the strategy that produced the input.
    pub phase: String,
    /// Zero-based position of the input within its phase.
    pub index: u64,
    /// The failing input.
    pub input: ReportedValue,
    /// Reference result.
    pub expected: ReportedValue,
    /// Target result.
    pub actual: ReportedValue,
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrong value for {} at {} (phase {}, index {}): expected: {} actual: {}",
            self.operation, self.input, self.phase, self.index, self.expected, self.actual
        )
    }
}

/// Checks a target against an operation's reference, one input at a time.
///
/// # Example
///
/// ```
/// use division_oracle::oracle::{OracleComparator, Operation, Status};
///
/// let comparator = OracleComparator::new(Operation::DIV_P2, |n: i64| if n == 7 { 0 } else {
///     division_oracle::gold::reference_div_p2(n)
/// });
///
/// assert_eq!(comparator.check(1).status, Status::Pass);
/// assert_eq!(comparator.check(7).status, Status::Mismatch);
/// ```
#[derive(Debug, Clone)]
pub struct OracleComparator<T, F> {
    operation: Operation<T>,
    target: F,
}

impl<T, F> OracleComparator<T, F>
where
    T: OracleValue,
    F: DivisionTarget<T>,
{
    /// Creates a comparator for `target` against `operation`'s reference.
    pub fn new(operation: Operation<T>, target: F) -> Self {
        Self { operation, target }
    }

    /// The operation being checked.
    pub fn operation(&self) -> &Operation<T> {
        &self.operation
    }

    /// Calls the target and the reference with `input` and compares the results.
    #[inline]
    pub fn check(&self, input: T) -> ComparisonOutcome<T> {
        let actual = self.target.evaluate(input);
        let expected = (self.operation.reference)(input);
        let status = if actual.matches(&expected) {
            Status::Pass
        } else {
            Status::Mismatch
        };
        ComparisonOutcome {
            input,
            expected,
            actual,
            status,
        }
    }
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
    fn reference_target_always_passes() {
        let comparator = OracleComparator::new(Operation::DIV_P2, reference_div_p2);
        for n in [0, 1, -1, i64::MIN, i64::MAX] {
            assert!(comparator.check(n).is_pass());
        }
    }

    #[test]
    fn zero_must_map_to_zero() {
        let comparator = OracleComparator::new(Operation::DIV_EXT, |_: i64| 1);
        let outcome = comparator.check(0);
        assert_eq!(outcome.status, Status::Mismatch);
        assert_eq!(outcome.expected, 0);
        assert_eq!(outcome.actual, 1);
    }

    #[test]
    fn outcome_carries_both_results() {
        let comparator = OracleComparator::new(Operation::DIV_P2, |n: i64| n);
        let outcome = comparator.check(1);
        assert_eq!(
            outcome,
            ComparisonOutcome {
                input: 1,
                expected: 9,
                actual: 1,
                status: Status::Mismatch,
            }
        );
    }

    #[test]
    fn float_matching_is_bit_exact() {
        assert!(1.0f64.matches(&1.0));
        assert!(!0.0f64.matches(&-0.0));
        assert!(f64::NAN.matches(&-f64::NAN));
        assert!(!f64::NAN.matches(&0.0));
        assert!(f64::INFINITY.matches(&f64::INFINITY));
    }

    #[test]
    fn float_comparator_flags_signed_zero() {
        let comparator = OracleComparator::new(Operation::FDIV_P2, |x: f64| {
            let value = reference_fdiv_p2(x);
            if value == 0.0 {
                -0.0
            } else {
                value
            }
        });
        assert!(comparator.check(1.0).is_pass());
        assert!(comparator.check(-3.5).is_pass());
        assert_eq!(comparator.check(0.0).status, Status::Mismatch);
        assert_eq!(comparator.check(-0.0).status, Status::Mismatch);

        let abs = OracleComparator::new(Operation::FDIV_P2, |x: f64| reference_fdiv_p2(x).abs());
        assert!(abs.check(-0.0).is_pass());
    }

    #[test]
    fn report_display_format() {
        let comparator = OracleComparator::new(Operation::DIV_P2, |_: i64| 0);
        let report = comparator.check(1).to_report(Operation::DIV_P2.name, "boundary", 1);
        assert_eq!(
            report.to_string(),
            "Wrong value for calculate_div_p2 at 1 (phase boundary, index 1): expected: 9 actual: 0"
        );
    }

    #[test]
    fn float_report_keeps_negative_zero() {
        assert_eq!(ReportedValue::Float(-0.0).to_string(), "-0.0");
        assert_eq!(ReportedValue::Float(1e300).to_string(), "1e300");
        assert_ne!(ReportedValue::Float(0.0), ReportedValue::Float(-0.0));
        assert_ne!(ReportedValue::Int(0), ReportedValue::Float(0.0));
    }

    #[test]
    fn report_serializes_untagged_values() {
        let report = MismatchReport {
            operation: "calculate_div_ext",
            phase: "uniform_random(seed=42)".to_owned(),
            index: 3,
            input: ReportedValue::Int(-5),
            expected: ReportedValue::Int(-55),
            actual: ReportedValue::Int(0),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""input":-5"#));
        assert!(json.contains(r#""index":3"#));
        assert!(json.contains(r#""operation":"calculate_div_ext""#));
    }

    #[test]
    fn integer_operations_are_listed_in_order() {
        let names: Vec<_> = Operation::INTEGER.iter().map(|op| op.name).collect();
        assert_eq!(names, ["calculate_div_p2", "calculate_div_ext"]);
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use crate::test_config::proptest_case_count;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: proptest_case_count(),
            ..ProptestConfig::default()
        })]

        /// Property: a target that only differs at one input fails exactly there.
        #[test]
        fn prop_single_divergence_is_detected(bad in any::<i64>(), input in any::<i64>()) {
            let comparator = OracleComparator::new(Operation::DIV_P2, move |n: i64| {
                let value = reference_div_p2(n);
                if n == bad { value.wrapping_add(1) } else { value }
            });
            prop_assert_eq!(comparator.check(bad).status, Status::Mismatch);
            prop_assert_eq!(comparator.check(input).is_pass(), input != bad);
        }

        /// Property: float matching is reflexive, NaN included.
        #[test]
        fn prop_float_matching_is_reflexive(bits in any::<u64>()) {
            let x = f64::from_bits(bits);
            prop_assert!(x.matches(&x));
        }
    }
}
