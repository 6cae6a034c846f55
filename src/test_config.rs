//! Shared test configuration for property-based tests and scaled-down fixtures.
//!
//! Under Miri every input costs orders of magnitude more, so both the proptest case
//! count and the sample counts used by in-crate fixture tests shrink there.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_config::proptest_case_count;
//!
//! proptest! {
//!     #![proptest_config(ProptestConfig {
//!         cases: proptest_case_count(),
//!         ..ProptestConfig::default()
//!     })]
//!     #[test]
//!     fn my_property_test(value in any::<i64>()) {
//!         // test body
//!     }
//! }
//! ```

/// Returns the number of test cases to run for property-based tests.
///
/// When running under Miri, returns a reduced count (5). Otherwise, returns the
/// standard count (256).
#[must_use]
pub const fn proptest_case_count() -> u32 {
    if cfg!(miri) {
        5
    } else {
        256
    }
}

/// Scales a fixture sample count down when running under Miri.
///
/// Never returns zero, so the result is always a valid sampling count.
#[must_use]
pub const fn fixture_samples(count: usize) -> usize {
    let scaled = if cfg!(miri) { count / 1000 } else { count };
    if scaled == 0 {
        1
    } else {
        scaled
    }
}
