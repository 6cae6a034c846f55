//! Gold (reference) implementations of the constant-division expressions.
//!
//! Every function here computes the same composite expression the code generator is
//! expected to emit for the matching native symbol:
//!
//! ```text
//! a = Σ n / p            b = Σ n % p
//! c = Σ n / (-p) + n / i64::MIN
//! d = Σ n % (-p) + n % i64::MIN
//! result = a + b + 3 * (c + d) / 7
//! ```
//!
//! Division truncates toward zero and the remainder takes the sign of the dividend.
//! Every operation wraps on overflow: `i64::MIN / -1 == i64::MIN` and
//! `i64::MIN % -1 == 0`, which is what AArch64 `SDIV` followed by `MSUB` produces.
//! The functions are total over the whole `i64` domain and never panic.
//!
//! # Example
//!
//! ```
//! use division_oracle::gold::{reference_div_p2, reference_div_ext};
//!
//! assert_eq!(reference_div_p2(0), 0);
//! assert_eq!(reference_div_p2(1), 9);
//! assert_eq!(reference_div_ext(1), 11);
//!
//! // The domain minimum runs through `MIN / -1` without panicking.
//! let _ = reference_div_p2(i64::MIN);
//! ```

/// Divisors of the primary (`calculate_div_p2`) expression: powers of two.
pub const PRIMARY_DIVISORS: [i64; 7] = [1, 2, 4, 8, 1024, 131_072, 1_048_576];

/// Divisors of the extended (`calculate_div_ext`) expression: larger, partly prime values
/// that force the generator onto its magic-number path instead of shifts.
pub const EXTENDED_DIVISORS: [i64; 8] = [
    3,
    7,
    10,
    1000,
    65_537,
    1_000_000_007,
    4_294_967_311,
    i64::MAX,
];

/// Divisors of the float (`calculate_fdiv_p2`) expression.
///
/// Powers of two (including the fractional ones) have exact reciprocals, so the
/// generator may lower them to a multiplication; `3.0` and `10.0` do not and must stay
/// true divisions.
pub const FLOAT_DIVISORS: [f64; 9] = [1.0, 2.0, 4.0, 8.0, 1024.0, 0.5, 0.0009765625, 3.0, 10.0];

/// Evaluates the composite division expression for an arbitrary set of positive divisors.
///
/// Each divisor `p` contributes `n / p`, `n % p`, `n / -p` and `n % -p`; the
/// `i64::MIN` divisor is always added to the negated terms.
#[must_use]
pub fn reference_with(divisors: &[i64], n: i64) -> i64 {
    debug_assert!(divisors.iter().all(|&p| p > 0), "divisors must be positive");

    let mut a: i64 = 0;
    let mut b: i64 = 0;
    let mut c = n.wrapping_div(i64::MIN);
    let mut d = n.wrapping_rem(i64::MIN);

    for &p in divisors {
        let neg = p.wrapping_neg();
        a = a.wrapping_add(n.wrapping_div(p));
        b = b.wrapping_add(n.wrapping_rem(p));
        c = c.wrapping_add(n.wrapping_div(neg));
        d = d.wrapping_add(n.wrapping_rem(neg));
    }

    let weighted = c.wrapping_add(d).wrapping_mul(3).wrapping_div(7);
    a.wrapping_add(b).wrapping_add(weighted)
}

/// Reference for `calculate_div_p2`.
#[must_use]
pub fn reference_div_p2(n: i64) -> i64 {
    reference_with(&PRIMARY_DIVISORS, n)
}

/// Reference for `calculate_div_ext`.
#[must_use]
pub fn reference_div_ext(n: i64) -> i64 {
    reference_with(&EXTENDED_DIVISORS, n)
}

/// Reference for `calculate_fdiv_p2`.
///
/// Sums are evaluated strictly left to right starting from the first term (not from
/// `0.0`, which would turn a `-0.0` sum into `+0.0`), matching the source expression.
#[must_use]
pub fn reference_fdiv_p2(x: f64) -> f64 {
    let (first, rest) = FLOAT_DIVISORS.split_at(1);
    let head = first[0];

    let a = rest.iter().fold(x / head, |acc, &d| acc + x / d);
    let c = rest.iter().fold(x / -head, |acc, &d| acc + x / -d);

    a + (3.0 * c) / 7.0
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
    fn zero_maps_to_zero() {
        assert_eq!(reference_div_p2(0), 0);
        assert_eq!(reference_div_ext(0), 0);
    }

    #[test]
    fn one_matches_hand_computed_value() {
        // a = 1, b = 6, c = -1, d = 7  =>  1 + 6 + (3 * 6) / 7 = 9
        assert_eq!(reference_div_p2(1), 9);
        assert_eq!(reference_div_p2(-1), -9);
        assert_eq!(reference_div_p2(2), 16);
        assert_eq!(reference_div_p2(-2), -16);
    }

    #[test]
    fn extended_small_values() {
        assert_eq!(reference_div_ext(1), 11);
        assert_eq!(reference_div_ext(-1), -11);
        assert_eq!(reference_div_ext(2), 23);
    }

    #[test]
    fn mid_range_golden_values() {
        assert_eq!(reference_div_p2(1_000_000), 3_047_807);
        assert_eq!(reference_div_p2(-1_000_000), -3_047_807);
        assert_eq!(reference_div_p2(123_456_789), 186_528_564);
        assert_eq!(reference_div_ext(1_000_000), 5_068_327);
        assert_eq!(reference_div_ext(123_456_789), 622_804_009);
    }

    #[test]
    fn domain_extremes_wrap_instead_of_panicking() {
        assert_eq!(reference_div_p2(i64::MIN), 653_620_080_294_232_065);
        assert_eq!(reference_div_p2(i64::MIN + 1), 1_971_244_656_986_084_783);
        assert_eq!(reference_div_p2(i64::MAX), -1_971_244_656_986_084_783);
        assert_eq!(reference_div_p2(i64::MAX - 1), -1_971_244_656_986_084_793);
        assert_eq!(reference_div_ext(i64::MIN), -5_677_411_011_011_429_556);
        assert_eq!(reference_div_ext(i64::MAX), 4_359_786_434_317_890_144);
    }

    #[test]
    fn reference_with_empty_set_only_uses_min_divisor() {
        // c = n / MIN = 0, d = n % MIN = n
        assert_eq!(reference_with(&[], 70), 30);
        // c = MIN / MIN = 1, d = 0, 3 / 7 truncates to 0
        assert_eq!(reference_with(&[], i64::MIN), 0);
    }

    #[test]
    fn float_reference_is_odd_for_finite_inputs() {
        for x in [1.0, 3.5, 1e-300, 1e300, 123_456.789] {
            let pos = reference_fdiv_p2(x);
            let neg = reference_fdiv_p2(-x);
            assert_eq!(pos.to_bits(), (-neg).to_bits(), "asymmetric at {x}");
        }
    }

    #[test]
    fn float_reference_propagates_nan_and_infinity() {
        assert!(reference_fdiv_p2(f64::NAN).is_nan());
        // inf - inf inside the weighted sum
        assert!(reference_fdiv_p2(f64::INFINITY).is_nan());
        assert_eq!(reference_fdiv_p2(0.0), 0.0);
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

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

        /// Property: the reference is a pure function of its input.
        #[test]
        fn prop_reference_is_deterministic(n in any::<i64>()) {
            prop_assert_eq!(reference_div_p2(n), reference_div_p2(n));
            prop_assert_eq!(reference_div_ext(n), reference_div_ext(n));
        }

        /// Property: away from the wrapping region, truncating division makes the
        /// expression an odd function.
        #[test]
        fn prop_reference_is_odd_near_zero(n in -(1i64 << 40)..(1i64 << 40)) {
            prop_assert_eq!(reference_div_p2(-n), reference_div_p2(n).wrapping_neg());
            prop_assert_eq!(reference_div_ext(-n), reference_div_ext(n).wrapping_neg());
        }

        /// Property: the wrapping implementation agrees with exact 128-bit arithmetic
        /// whenever no intermediate value leaves the i64 range.
        #[test]
        fn prop_matches_wide_arithmetic(n in -(1i64 << 50)..(1i64 << 50)) {
            let wide = i128::from(n);
            let mut a = 0i128;
            let mut b = 0i128;
            let mut c = wide / i128::from(i64::MIN);
            let mut d = wide % i128::from(i64::MIN);
            for p in PRIMARY_DIVISORS.map(i128::from) {
                a += wide / p;
                b += wide % p;
                c += wide / -p;
                d += wide % -p;
            }
            let expected = a + b + 3 * (c + d) / 7;
            prop_assert_eq!(i128::from(reference_div_p2(n)), expected);
        }
    }
}
