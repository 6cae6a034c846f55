//! Seeded uniform sampling over the whole `i64` domain.

use std::iter::FusedIterator;

use crate::rng::{Mt19937_64, Rng, SeedableRng};

/// Seed of the default uniform random sweep.
pub const DEFAULT_SEED: u64 = 42;

/// Returns `count` values drawn uniformly from `[i64::MIN, i64::MAX]`.
///
/// The engine is MT19937-64 seeded once with `seed`; the same seed always yields the
/// same sequence, and it is the sequence `std::uniform_int_distribution<int64_t>`
/// draws from `std::mt19937_64(seed)`.
///
/// ```
/// use division_oracle::sampling::uniform_random::uniform_samples;
///
/// let first: Vec<i64> = uniform_samples(42, 3).collect();
/// let second: Vec<i64> = uniform_samples(42, 3).collect();
/// assert_eq!(first, second);
/// ```
#[must_use]
pub fn uniform_samples(seed: u64, count: usize) -> UniformSamples {
    UniformSamples {
        rng: Mt19937_64::seed_from_u64(seed),
        remaining: count,
    }
}

/// Iterator returned by [`uniform_samples`]. Owns its generator exclusively.
#[derive(Debug, Clone)]
pub struct UniformSamples {
    rng: Mt19937_64,
    remaining: usize,
}

impl Iterator for UniformSamples {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.rng.gen())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for UniformSamples {}

impl FusedIterator for UniformSamples {}

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
    fn default_seed_golden_prefix() {
        let values: Vec<i64> = uniform_samples(DEFAULT_SEED, 5).collect();
        assert_eq!(
            values,
            [
                4_706_788_815_403_344_598,
                2_564_676_540_648_719_016,
                4_651_257_987_612_965_642,
                -6_709_584_717_649_620_146,
                7_438_999_416_573_663_573,
            ]
        );
    }

    #[test]
    fn yields_exactly_count_values() {
        assert_eq!(uniform_samples(7, 0).count(), 0);
        assert_eq!(uniform_samples(7, 1234).count(), 1234);
    }

    #[test]
    fn prefix_does_not_depend_on_count() {
        let short: Vec<i64> = uniform_samples(99, 10).collect();
        let long: Vec<i64> = uniform_samples(99, 100).take(10).collect();
        assert_eq!(short, long);
    }

    #[test]
    fn covers_both_signs() {
        let values: Vec<i64> = uniform_samples(DEFAULT_SEED, 1000).collect();
        assert!(values.iter().any(|&v| v < 0));
        assert!(values.iter().any(|&v| v > 0));
    }

    #[test]
    fn different_seeds_diverge() {
        let a: Vec<i64> = uniform_samples(1, 8).collect();
        let b: Vec<i64> = uniform_samples(2, 8).collect();
        assert_ne!(a, b);
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

        /// Property: identical seeds give bit-for-bit identical streams.
        #[test]
        fn prop_seed_reproducibility(seed in any::<u64>(), count in 0usize..256) {
            let first: Vec<i64> = uniform_samples(seed, count).collect();
            let second: Vec<i64> = uniform_samples(seed, count).collect();
            prop_assert_eq!(first.len(), count);
            prop_assert_eq!(first, second);
        }
    }
}
