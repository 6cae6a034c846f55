//! Fixed edge-case inputs.

use std::iter::FusedIterator;

/// Hand-picked extremes emitted before the power-of-two ladder.
const HEAD: [i64; 9] = [
    0,
    1,
    -1,
    2,
    -2,
    i64::MIN,
    i64::MIN + 1,
    i64::MAX,
    i64::MAX - 1,
];

/// Values emitted per power of two.
const PER_POWER: usize = 6;

/// Number of powers of two visited (`2^0` through `2^63`).
const POWERS: usize = 64;

/// Total number of boundary values, duplicates included.
pub const BOUNDARY_COUNT: usize = HEAD.len() + PER_POWER * POWERS;

/// Returns the boundary inputs in their fixed order.
///
/// After the nine extremes in [`HEAD`] come, for every `k` in `0..64`, the values
/// `2^k, 2^k + 1, 2^k - 1, -2^k, -2^k + 1, -2^k - 1`. Everything is computed with
/// wrapping arithmetic, so `k = 63` contributes `MIN, MIN + 1, MAX, MIN, MIN + 1, MAX`.
///
/// ```
/// use division_oracle::sampling::boundary::{boundary_values, BOUNDARY_COUNT};
///
/// let values: Vec<i64> = boundary_values().collect();
/// assert_eq!(values.len(), BOUNDARY_COUNT);
/// assert_eq!(&values[..5], &[0, 1, -1, 2, -2]);
/// ```
#[must_use]
pub const fn boundary_values() -> BoundaryValues {
    BoundaryValues { position: 0 }
}

/// Value at `position` of the boundary sequence.
fn value_at(position: usize) -> i64 {
    if let Some(&value) = HEAD.get(position) {
        return value;
    }
    let offset = position - HEAD.len();
    let power = 1i64.wrapping_shl((offset / PER_POWER) as u32);
    match offset % PER_POWER {
        0 => power,
        1 => power.wrapping_add(1),
        2 => power.wrapping_sub(1),
        3 => power.wrapping_neg(),
        4 => power.wrapping_neg().wrapping_add(1),
        _ => power.wrapping_neg().wrapping_sub(1),
    }
}

/// Iterator over the boundary inputs. See [`boundary_values`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryValues {
    position: usize,
}

impl Iterator for BoundaryValues {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.position >= BOUNDARY_COUNT {
            return None;
        }
        let value = value_at(self.position);
        self.position += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = BOUNDARY_COUNT.saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BoundaryValues {}

impl FusedIterator for BoundaryValues {}

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
    fn yields_exactly_393_values() {
        assert_eq!(BOUNDARY_COUNT, 393);
        assert_eq!(boundary_values().count(), 393);
        assert_eq!(boundary_values().len(), 393);
    }

    #[test]
    fn head_is_in_fixed_order() {
        let values: Vec<i64> = boundary_values().take(9).collect();
        assert_eq!(values, HEAD);
    }

    #[test]
    fn first_power_group() {
        let values: Vec<i64> = boundary_values().skip(9).take(6).collect();
        assert_eq!(values, [1, 2, 0, -1, 0, -2]);
    }

    #[test]
    fn top_power_group_wraps() {
        let values: Vec<i64> = boundary_values().skip(BOUNDARY_COUNT - 6).collect();
        assert_eq!(
            values,
            [
                i64::MIN,
                i64::MIN + 1,
                i64::MAX,
                i64::MIN,
                i64::MIN + 1,
                i64::MAX
            ]
        );
    }

    #[test]
    fn power_32_group() {
        let start = 9 + 6 * 32;
        let values: Vec<i64> = boundary_values().skip(start).take(6).collect();
        let p = 1i64 << 32;
        assert_eq!(values, [p, p + 1, p - 1, -p, -p + 1, -p - 1]);
    }

    #[test]
    fn order_is_stable_across_iterations() {
        let first: Vec<i64> = boundary_values().collect();
        let second: Vec<i64> = boundary_values().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let mut values = boundary_values();
        values.by_ref().for_each(drop);
        assert_eq!(values.next(), None);
        assert_eq!(values.size_hint(), (0, Some(0)));
    }
}
