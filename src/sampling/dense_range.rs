//! Exhaustive scan of a contiguous interval.

use std::ops::RangeInclusive;

use crate::error::OracleError;
use crate::report_violation;
use crate::telemetry::{ViolationKind, ViolationSeverity};

/// An inclusive interval `[low, high]` scanned value by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DenseRange {
    low: i64,
    high: i64,
}

impl DenseRange {
    /// Creates the interval `[low, high]`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidRange`] if `low > high`.
    pub fn new(low: i64, high: i64) -> Result<Self, OracleError> {
        if low > high {
            report_violation!(
                ViolationSeverity::Error,
                ViolationKind::Configuration,
                "rejected dense range [{}, {}]: low exceeds high",
                low,
                high
            );
            return Err(OracleError::InvalidRange {
                start: low,
                end: high,
                count: None,
                reason: "low exceeds high",
            });
        }
        Ok(Self { low, high })
    }

    /// The interval `[-radius, radius]`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidRange`] if `radius` is negative.
    pub fn centered(radius: i64) -> Result<Self, OracleError> {
        Self::new(radius.saturating_neg(), radius)
    }

    /// Lower bound.
    #[must_use]
    pub fn low(&self) -> i64 {
        self.low
    }

    /// Upper bound.
    #[must_use]
    pub fn high(&self) -> i64 {
        self.high
    }

    /// Number of values in the interval, saturating at `u64::MAX` for the full domain.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.high.abs_diff(self.low).saturating_add(1)
    }

    /// Always `false`: a valid interval holds at least one value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every integer in `[low, high]`, in increasing order.
    ///
    /// ```
    /// use division_oracle::sampling::dense_range::DenseRange;
    ///
    /// let values: Vec<i64> = DenseRange::new(-2, 2).unwrap().iter().collect();
    /// assert_eq!(values, [-2, -1, 0, 1, 2]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> RangeInclusive<i64> {
        self.low..=self.high
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
    fn rejects_inverted_range() {
        let err = DenseRange::new(10, -10).unwrap_err();
        assert_eq!(
            err,
            OracleError::InvalidRange {
                start: 10,
                end: -10,
                count: None,
                reason: "low exceeds high",
            }
        );
    }

    #[test]
    fn single_value_range() {
        let range = DenseRange::new(i64::MIN, i64::MIN).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.iter().collect::<Vec<_>>(), [i64::MIN]);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn default_radius_yields_twenty_million_and_one() {
        let range = DenseRange::centered(10_000_000).unwrap();
        assert_eq!(range.len(), 20_000_001);
        assert_eq!(range.iter().count(), 20_000_001);
        assert_eq!(range.iter().next(), Some(-10_000_000));
        assert_eq!(range.iter().next_back(), Some(10_000_000));
    }

    #[test]
    fn scan_is_gap_free() {
        let values: Vec<i64> = DenseRange::centered(1000).unwrap().iter().collect();
        assert_eq!(values.len(), 2001);
        assert!(values.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn scan_reaches_domain_maximum_without_overflow() {
        let values: Vec<i64> = DenseRange::new(i64::MAX - 2, i64::MAX)
            .unwrap()
            .iter()
            .collect();
        assert_eq!(values, [i64::MAX - 2, i64::MAX - 1, i64::MAX]);
    }

    #[test]
    fn full_domain_length_saturates() {
        let range = DenseRange::new(i64::MIN, i64::MAX).unwrap();
        assert_eq!(range.len(), u64::MAX);
        assert!(!range.is_empty());
    }

    #[test]
    fn negative_radius_is_rejected() {
        assert!(DenseRange::centered(-1).is_err());
    }
}
