//! The error type shared by every fallible operation.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

use crate::oracle::MismatchReport;

/// This enum contains every error the oracle can return. Most API functions return a [`Result<T, OracleError>`].
///
/// [`Result<T, OracleError>`]: std::result::Result
#[derive(Debug, Clone, PartialEq)]
pub enum OracleError {
    /// The function under test disagreed with the reference for some input.
    ///
    /// This is the only runtime failure the oracle models. It is terminal: the run that
    /// produced it stopped at this input and tested nothing after it.
    Mismatch(Box<MismatchReport>),
    /// A magnitude or dense range was constructed with invalid bounds.
    InvalidRange {
        /// Lower (or starting) bound of the rejected range.
        start: i64,
        /// Upper (or ending) bound of the rejected range.
        end: i64,
        /// Requested sample count, if the range is a sampling request.
        count: Option<usize>,
        /// Why the range was rejected.
        reason: &'static str,
    },
    /// The fixture configuration is unusable, e.g. a zero sample count.
    InvalidConfig {
        /// Further specifies why the configuration was invalid.
        info: String,
    },
}

impl OracleError {
    /// Returns the mismatch report if this error is a [`OracleError::Mismatch`].
    #[must_use]
    pub fn as_mismatch(&self) -> Option<&MismatchReport> {
        match self {
            Self::Mismatch(report) => Some(report),
            _ => None,
        }
    }
}

impl Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::Mismatch(report) => write!(f, "{}", report),
            OracleError::InvalidRange {
                start,
                end,
                count,
                reason,
            } => match count {
                Some(count) => write!(
                    f,
                    "Invalid range [{}, {}] with {} samples: {}",
                    start, end, count, reason
                ),
                None => write!(f, "Invalid range [{}, {}]: {}", start, end, reason),
            },
            OracleError::InvalidConfig { info } => {
                write!(f, "Invalid configuration: {}", info)
            }
        }
    }
}

impl Error for OracleError {}

impl From<MismatchReport> for OracleError {
    fn from(report: MismatchReport) -> Self {
        Self::Mismatch(Box::new(report))
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::oracle::ReportedValue;

    #[test]
    fn invalid_range_display_includes_count() {
        let err = OracleError::InvalidRange {
            start: -5,
            end: 10,
            count: Some(3),
            reason: "range crosses zero",
        };
        assert_eq!(
            err.to_string(),
            "Invalid range [-5, 10] with 3 samples: range crosses zero"
        );
    }

    #[test]
    fn invalid_range_display_without_count() {
        let err = OracleError::InvalidRange {
            start: 10,
            end: 1,
            count: None,
            reason: "low exceeds high",
        };
        assert_eq!(err.to_string(), "Invalid range [10, 1]: low exceeds high");
    }

    #[test]
    fn mismatch_converts_from_report() {
        let report = MismatchReport {
            operation: "calculate_div_p2",
            phase: "boundary".to_owned(),
            index: 5,
            input: ReportedValue::Int(i64::MIN),
            expected: ReportedValue::Int(1),
            actual: ReportedValue::Int(2),
        };
        let err = OracleError::from(report.clone());
        assert_eq!(err.as_mismatch(), Some(&report));
        assert!(err.to_string().contains(&i64::MIN.to_string()));
    }

    #[test]
    fn config_error_is_not_a_mismatch() {
        let err = OracleError::InvalidConfig {
            info: "random_count must be positive".to_owned(),
        };
        assert!(err.as_mismatch().is_none());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: random_count must be positive"
        );
    }
}
