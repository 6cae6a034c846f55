//! Log-uniform magnitude sweeps.
//!
//! A sweep visits `count` magnitudes spaced evenly on a logarithmic scale between the
//! smaller and the larger bound of a [`MagnitudeRange`]. Small numbers get as much
//! coverage as huge ones, which a linear sample of the `i64` domain would never give.

use std::iter::FusedIterator;

use crate::error::OracleError;
use crate::report_violation;
use crate::telemetry::{ViolationKind, ViolationSeverity};

/// A validated, sign-homogeneous magnitude range with a sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct MagnitudeRange {
    start: i64,
    end: i64,
    count: usize,
}

impl MagnitudeRange {
    /// Creates a range sweeping from `start` to `end` in `count` steps.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidRange`] if either bound is zero, the bounds have
    /// different signs, or `count` is zero.
    pub fn new(start: i64, end: i64, count: usize) -> Result<Self, OracleError> {
        let reason = if start == 0 || end == 0 {
            Some("bounds must be non-zero")
        } else if (start < 0) != (end < 0) {
            Some("range crosses zero")
        } else if count == 0 {
            Some("count must be positive")
        } else {
            None
        };

        if let Some(reason) = reason {
            report_violation!(
                ViolationSeverity::Error,
                ViolationKind::Configuration,
                "rejected magnitude range [{}, {}] with {} samples: {}",
                start,
                end,
                count,
                reason
            );
            return Err(OracleError::InvalidRange {
                start,
                end,
                count: Some(count),
                reason,
            });
        }

        Ok(Self { start, end, count })
    }

    /// The positive half of the domain, `1..=i64::MAX`.
    pub fn positive(count: usize) -> Result<Self, OracleError> {
        Self::new(1, i64::MAX, count)
    }

    /// The negative half of the domain, `i64::MIN..=-1`.
    pub fn negative(count: usize) -> Result<Self, OracleError> {
        Self::new(i64::MIN, -1, count)
    }

    /// First bound as given.
    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Second bound as given.
    #[must_use]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of values the sweep yields.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if the sweep covers negative numbers.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.start < 0
    }

    /// Smaller and larger magnitude. `|i64::MIN|` is `2^63`.
    #[must_use]
    pub fn magnitudes(&self) -> (u64, u64) {
        let a = self.start.unsigned_abs();
        let b = self.end.unsigned_abs();
        (a.min(b), a.max(b))
    }

    /// Returns a fresh sweep over this range.
    ///
    /// ```
    /// use division_oracle::sampling::log_magnitude::MagnitudeRange;
    ///
    /// let range = MagnitudeRange::new(1, 1_000_000, 7).unwrap();
    /// let values: Vec<i64> = range.iter().collect();
    /// assert_eq!(values.len(), 7);
    /// assert_eq!(values[0], 1);
    /// ```
    #[must_use]
    pub fn iter(&self) -> LogMagnitudeSamples {
        let (lo, hi) = self.magnitudes();
        LogMagnitudeSamples {
            lo,
            hi,
            ln_lo: (lo as f64).ln(),
            ln_hi: (hi as f64).ln(),
            negative: self.is_negative(),
            index: 0,
            count: self.count,
        }
    }
}

impl IntoIterator for &MagnitudeRange {
    type Item = i64;
    type IntoIter = LogMagnitudeSamples;

    fn into_iter(self) -> LogMagnitudeSamples {
        self.iter()
    }
}

/// Lazy sweep produced by [`MagnitudeRange::iter`].
///
/// Magnitudes never decrease from one value to the next and always stay within the
/// range's bounds.
#[derive(Debug, Clone)]
pub struct LogMagnitudeSamples {
    lo: u64,
    hi: u64,
    ln_lo: f64,
    ln_hi: f64,
    negative: bool,
    index: usize,
    count: usize,
}

impl LogMagnitudeSamples {
    fn magnitude_at(&self, index: usize) -> u64 {
        let t = index as f64 / self.count as f64;
        let log = self.ln_lo + t * (self.ln_hi - self.ln_lo);
        // `as` saturates, and float rounding can step just outside the bounds
        (log.exp() as u64).clamp(self.lo, self.hi)
    }
}

impl Iterator for LogMagnitudeSamples {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.index >= self.count {
            return None;
        }
        let magnitude = self.magnitude_at(self.index);
        self.index += 1;

        // 2^63 only occurs in the negative sweep, where it wraps to i64::MIN
        let value = magnitude as i64;
        Some(if self.negative {
            value.wrapping_neg()
        } else {
            value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LogMagnitudeSamples {}

impl FusedIterator for LogMagnitudeSamples {}

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
    fn rejects_zero_bounds() {
        for (start, end) in [(0, 10), (10, 0), (0, 0)] {
            let err = MagnitudeRange::new(start, end, 5).unwrap_err();
            assert!(matches!(
                err,
                OracleError::InvalidRange {
                    reason: "bounds must be non-zero",
                    ..
                }
            ));
        }
    }

    #[test]
    fn rejects_ranges_crossing_zero() {
        let err = MagnitudeRange::new(-5, 10, 3).unwrap_err();
        assert_eq!(
            err,
            OracleError::InvalidRange {
                start: -5,
                end: 10,
                count: Some(3),
                reason: "range crosses zero",
            }
        );
    }

    #[test]
    fn rejects_zero_count() {
        assert!(MagnitudeRange::new(1, 10, 0).is_err());
    }

    #[test]
    fn single_sample_is_the_smaller_magnitude() {
        let values: Vec<i64> = MagnitudeRange::new(1000, 10, 1).unwrap().iter().collect();
        assert_eq!(values, [10]);
    }

    #[test]
    fn equal_bounds_repeat_the_bound() {
        let values: Vec<i64> = MagnitudeRange::new(-7, -7, 4).unwrap().iter().collect();
        assert_eq!(values, [-7, -7, -7, -7]);
    }

    #[test]
    fn positive_sweep_starts_at_one() {
        let range = MagnitudeRange::positive(1000).unwrap();
        let values: Vec<i64> = range.iter().collect();
        assert_eq!(values.len(), 1000);
        assert_eq!(values[0], 1);
        assert!(values.iter().all(|&v| v > 0));
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        // The last step stops one increment short of the upper bound.
        assert!(values[999] > 1 << 62);
    }

    #[test]
    fn negative_sweep_runs_from_minus_one_towards_min() {
        let range = MagnitudeRange::negative(1000).unwrap();
        let values: Vec<i64> = range.iter().collect();
        assert_eq!(values.len(), 1000);
        assert_eq!(values[0], -1);
        assert!(values.iter().all(|&v| v < 0));
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!(values[999] < -(1 << 62));
    }

    #[test]
    fn domain_minimum_is_reachable() {
        // |MIN| = 2^63 does not fit in i64; the sign flip must wrap back to MIN.
        let values: Vec<i64> = MagnitudeRange::new(i64::MIN, i64::MIN, 2)
            .unwrap()
            .iter()
            .collect();
        assert_eq!(values, [i64::MIN, i64::MIN]);
    }

    #[test]
    fn iterator_is_restartable() {
        let range = MagnitudeRange::new(3, 3_000_000, 50).unwrap();
        let first: Vec<i64> = range.iter().collect();
        let second: Vec<i64> = (&range).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn size_hint_tracks_progress() {
        let mut sweep = MagnitudeRange::new(1, 100, 10).unwrap().iter();
        assert_eq!(sweep.len(), 10);
        sweep.next();
        sweep.next();
        assert_eq!(sweep.len(), 8);
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

    fn same_sign_bounds() -> impl Strategy<Value = (i64, i64)> {
        prop_oneof![
            (1i64..=i64::MAX, 1i64..=i64::MAX),
            (i64::MIN..=-1i64, i64::MIN..=-1i64),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: proptest_case_count(),
            ..ProptestConfig::default()
        })]

        /// Property: a sweep yields exactly `count` values within the magnitude bounds,
        /// with non-decreasing magnitudes and the sign of the range.
        #[test]
        fn prop_sweep_respects_bounds((start, end) in same_sign_bounds(), count in 1usize..500) {
            let range = MagnitudeRange::new(start, end, count).unwrap();
            let (lo, hi) = range.magnitudes();
            let values: Vec<i64> = range.iter().collect();

            prop_assert_eq!(values.len(), count);
            for value in &values {
                prop_assert!((lo..=hi).contains(&value.unsigned_abs()));
                prop_assert_eq!(*value < 0, start < 0);
            }
            for pair in values.windows(2) {
                prop_assert!(pair[0].unsigned_abs() <= pair[1].unsigned_abs());
            }
        }

        /// Property: mixed signs are always rejected.
        #[test]
        fn prop_crossing_zero_is_rejected(start in 1i64..=i64::MAX, end in i64::MIN..=-1i64) {
            prop_assert!(MagnitudeRange::new(start, end, 1).is_err());
            prop_assert!(MagnitudeRange::new(end, start, 1).is_err());
        }
    }
}
