//! Inputs for the floating-point division fixture.

use std::iter::FusedIterator;

use crate::rng::{Pcg32, Rng, SeedableRng};

/// Seed of the default random double sweep.
pub const DEFAULT_FLOAT_SEED: u64 = 181_601_433;

/// Special values: signed zeros, unit values, infinities, NaN and the extremes of the
/// normal and subnormal ranges.
pub const FLOAT_BOUNDARY: [f64; 13] = [
    0.0,
    -0.0,
    1.0,
    -1.0,
    f64::INFINITY,
    f64::NEG_INFINITY,
    f64::NAN,
    f64::MAX,
    -f64::MAX,
    f64::MIN_POSITIVE,
    -f64::MIN_POSITIVE,
    SMALLEST_SUBNORMAL,
    -SMALLEST_SUBNORMAL,
];

/// `2^-1074`.
const SMALLEST_SUBNORMAL: f64 = f64::from_bits(1);

/// Largest exponent with a finite power of two.
const MAX_EXPONENT: i32 = f64::MAX_EXP - 1;
/// Smallest exponent with a non-zero power of two.
const MIN_EXPONENT: i32 = f64::MIN_EXP - f64::MANTISSA_DIGITS as i32;

/// Number of values in the power-of-two ladder, negations included.
pub const POWERS_OF_TWO_COUNT: usize = 2 * (MAX_EXPONENT - MIN_EXPONENT + 1) as usize;

/// Exclusive range of decimal exponents used by [`random_doubles`].
const DECIMAL_EXPONENTS: std::ops::Range<i32> = -323..309;

/// Exact `2^exp` for every exponent in `[-1074, 1023]`.
fn exact_power_of_two(exp: i32) -> f64 {
    if exp >= f64::MIN_EXP - 1 {
        // Normal: biased exponent, zero mantissa.
        f64::from_bits(((exp + 1023) as u64) << 52)
    } else {
        // Subnormal: single mantissa bit.
        f64::from_bits(1u64 << (exp - MIN_EXPONENT))
    }
}

/// Every finite power of two, each followed by its negation.
///
/// Runs `2^0, 2^1, ..., 2^1023`, then `2^-1, 2^-2, ..., 2^-1074`.
///
/// ```
/// use division_oracle::sampling::float::{powers_of_two, POWERS_OF_TWO_COUNT};
///
/// let values: Vec<f64> = powers_of_two().collect();
/// assert_eq!(values.len(), POWERS_OF_TWO_COUNT);
/// assert_eq!(&values[..4], &[1.0, -1.0, 2.0, -2.0]);
/// ```
#[must_use]
pub const fn powers_of_two() -> PowersOfTwo {
    PowersOfTwo { position: 0 }
}

/// Iterator returned by [`powers_of_two`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowersOfTwo {
    position: usize,
}

impl PowersOfTwo {
    fn exponent_at(step: usize) -> i32 {
        let step = step as i32;
        if step <= MAX_EXPONENT {
            step
        } else {
            MAX_EXPONENT - step
        }
    }
}

impl Iterator for PowersOfTwo {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.position >= POWERS_OF_TWO_COUNT {
            return None;
        }
        let value = exact_power_of_two(Self::exponent_at(self.position / 2));
        let negate = self.position % 2 == 1;
        self.position += 1;
        Some(if negate { -value } else { value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = POWERS_OF_TWO_COUNT.saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PowersOfTwo {}

impl FusedIterator for PowersOfTwo {}

/// Random doubles spread over the whole decimal range.
///
/// Each draw picks a decimal exponent `e` uniformly in `[-323, 309)` and a uniform
/// `u` in `[0, 1)`, and yields `10^e * (2u - 1)`. Every order of magnitude is hit
/// about equally often, from subnormals up to values near `f64::MAX`.
///
/// The scale uses `powf`: `powi` goes through `1 / 10^|e|`, which collapses to zero
/// once `10^|e|` overflows.
#[must_use]
pub fn random_doubles(seed: u64, count: usize) -> RandomDoubles {
    RandomDoubles {
        rng: Pcg32::seed_from_u64(seed),
        remaining: count,
    }
}

/// Iterator returned by [`random_doubles`].
#[derive(Debug, Clone)]
pub struct RandomDoubles {
    rng: Pcg32,
    remaining: usize,
}

impl Iterator for RandomDoubles {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let exponent = self.rng.gen_range_i32(DECIMAL_EXPONENTS);
        let unit: f64 = self.rng.gen();
        Some(10f64.powf(f64::from(exponent)) * (2.0 * unit - 1.0))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RandomDoubles {}

impl FusedIterator for RandomDoubles {}

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
    fn ladder_has_4196_values() {
        assert_eq!(POWERS_OF_TWO_COUNT, 4196);
        assert_eq!(powers_of_two().count(), 4196);
    }

    #[test]
    fn ladder_covers_extremes_exactly() {
        let values: Vec<f64> = powers_of_two().collect();
        assert_eq!(values[2 * 1023], 2f64.powi(1023));
        assert_eq!(values[2 * 1024], 0.5);
        assert_eq!(values[2 * 1024 + 1], -0.5);
        assert_eq!(values[POWERS_OF_TWO_COUNT - 2].to_bits(), 1);
        assert_eq!(values[POWERS_OF_TWO_COUNT - 1], -SMALLEST_SUBNORMAL);
    }

    #[test]
    fn ladder_values_are_powers_of_two() {
        for value in powers_of_two() {
            assert!(value.is_finite());
            assert_ne!(value, 0.0);
            let bits = value.abs().to_bits();
            let mantissa = bits & ((1 << 52) - 1);
            let exponent = bits >> 52;
            // Normal powers have an empty mantissa; subnormal powers have one bit set.
            if exponent == 0 {
                assert_eq!(mantissa.count_ones(), 1, "{value:e}");
            } else {
                assert_eq!(mantissa, 0, "{value:e}");
            }
        }
    }

    #[test]
    fn exact_power_of_two_matches_powi_in_normal_range() {
        for exp in -1022..=1023 {
            assert_eq!(exact_power_of_two(exp), 2f64.powi(exp), "2^{exp}");
        }
        assert_eq!(exact_power_of_two(-1023), f64::MIN_POSITIVE / 2.0);
    }

    #[test]
    fn boundary_set_contains_signed_zeros_and_nan() {
        assert_eq!(FLOAT_BOUNDARY[0].to_bits(), 0);
        assert!(FLOAT_BOUNDARY[1].is_sign_negative());
        assert!(FLOAT_BOUNDARY.iter().any(|x| x.is_nan()));
        assert_eq!(FLOAT_BOUNDARY[11], 5e-324);
    }

    #[test]
    fn random_doubles_are_reproducible_and_finite() {
        let first: Vec<f64> = random_doubles(DEFAULT_FLOAT_SEED, 2000).collect();
        let second: Vec<f64> = random_doubles(DEFAULT_FLOAT_SEED, 2000).collect();
        assert_eq!(first.len(), 2000);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.to_bits(), b.to_bits());
            assert!(a.is_finite());
        }
    }

    #[test]
    fn random_doubles_span_many_magnitudes() {
        let values: Vec<f64> = random_doubles(DEFAULT_FLOAT_SEED, 2000).collect();
        assert!(values.iter().any(|x| x.abs() > 1e200));
        assert!(values.iter().any(|x| x.abs() < 1e-200 && *x != 0.0));
        assert!(values.iter().any(|x| x.is_sign_negative()));
        assert!(values.iter().any(|x| x.is_sign_positive()));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn random_doubles_reach_subnormals_without_collapsing_to_zero() {
        let count = 100_000;
        let values: Vec<f64> = random_doubles(DEFAULT_FLOAT_SEED, count).collect();
        let zeros = values.iter().filter(|x| **x == 0.0).count();
        let subnormals = values
            .iter()
            .filter(|x| **x != 0.0 && x.abs() < f64::MIN_POSITIVE)
            .count();

        // Only the bottom exponents can still round a small mantissa to zero
        assert!(zeros * 1000 < count, "{zeros} zero draws of {count}");
        assert!(subnormals > 1000, "only {subnormals} subnormal draws of {count}");
        assert!(values.iter().any(|x| *x != 0.0 && x.abs() < 1e-315));
    }

    #[test]
    fn decimal_scale_does_not_underflow_before_the_subnormal_floor() {
        for exponent in DECIMAL_EXPONENTS {
            let scale = 10f64.powf(f64::from(exponent));
            assert!(scale > 0.0, "10^{exponent} collapsed to zero");
            assert!(scale.is_finite(), "10^{exponent} overflowed");
        }
        assert!(10f64.powf(-315.0) > 9e-316);
    }
}
