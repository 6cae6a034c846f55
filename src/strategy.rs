//! Input strategies: what a phase of a run feeds to the comparator.
//!
//! Each variant of [`Strategy`] (integers) or [`FloatStrategy`] (floats) names one
//! sampler and its parameters. Both implement [`InputStrategy`], which is all the
//! orchestrator needs to drive a phase.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use crate::error::OracleError;
use crate::oracle::OracleValue;
use crate::sampling::boundary::{boundary_values, BoundaryValues};
use crate::sampling::dense_range::DenseRange;
use crate::sampling::float::{
    powers_of_two, random_doubles, PowersOfTwo, RandomDoubles, FLOAT_BOUNDARY,
};
use crate::sampling::log_magnitude::{LogMagnitudeSamples, MagnitudeRange};
use crate::sampling::uniform_random::{uniform_samples, UniformSamples};

/// A finite, restartable source of test inputs.
pub trait InputStrategy {
    /// Type of the inputs produced.
    type Value: OracleValue;
    /// Iterator over one pass of the inputs.
    type Iter: Iterator<Item = Self::Value>;

    /// Starts a fresh pass. Two passes over the same strategy yield the same values.
    fn inputs(&self) -> Self::Iter;

    /// Short name of this strategy, used as the phase label in reports and logs.
    fn label(&self) -> String;

    /// Number of inputs one pass yields, if it fits in a `u64`.
    fn input_count(&self) -> Option<u64>;
}

/// Integer input strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The fixed boundary set.
    Boundary,
    /// A log-uniform magnitude sweep.
    LogMagnitude(MagnitudeRange),
    /// Every integer in an interval.
    DenseRange(DenseRange),
    /// Seeded uniform sample over the whole domain.
    UniformRandom {
        /// Generator seed.
        seed: u64,
        /// Number of draws.
        count: usize,
    },
}

impl Strategy {
    /// Log sweep over `start..end` with `count` samples.
    pub fn log_magnitude(start: i64, end: i64, count: usize) -> Result<Self, OracleError> {
        MagnitudeRange::new(start, end, count).map(Self::LogMagnitude)
    }

    /// Dense scan of `[low, high]`.
    pub fn dense_range(low: i64, high: i64) -> Result<Self, OracleError> {
        DenseRange::new(low, high).map(Self::DenseRange)
    }

    /// Uniform random sample.
    #[must_use]
    pub fn uniform_random(seed: u64, count: usize) -> Self {
        Self::UniformRandom { seed, count }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boundary => write!(f, "boundary"),
            Self::LogMagnitude(range) => {
                write!(f, "log_magnitude[{}, {}]", range.start(), range.end())
            }
            Self::DenseRange(range) => {
                write!(f, "dense_range[{}, {}]", range.low(), range.high())
            }
            Self::UniformRandom { seed, .. } => write!(f, "uniform_random(seed={})", seed),
        }
    }
}

impl InputStrategy for Strategy {
    type Value = i64;
    type Iter = Inputs;

    fn inputs(&self) -> Inputs {
        match self {
            Self::Boundary => Inputs::Boundary(boundary_values()),
            Self::LogMagnitude(range) => Inputs::LogMagnitude(range.iter()),
            Self::DenseRange(range) => Inputs::DenseRange(range.iter()),
            Self::UniformRandom { seed, count } => {
                Inputs::UniformRandom(uniform_samples(*seed, *count))
            }
        }
    }

    fn label(&self) -> String {
        self.to_string()
    }

    fn input_count(&self) -> Option<u64> {
        match self {
            Self::Boundary => Some(crate::sampling::boundary::BOUNDARY_COUNT as u64),
            Self::LogMagnitude(range) => Some(range.count() as u64),
            Self::DenseRange(range) => {
                let len = range.len();
                (len != u64::MAX).then_some(len)
            }
            Self::UniformRandom { count, .. } => Some(*count as u64),
        }
    }
}

/// Iterator over the inputs of one [`Strategy`].
#[derive(Debug, Clone)]
pub enum Inputs {
    /// See [`Strategy::Boundary`].
    Boundary(BoundaryValues),
    /// See [`Strategy::LogMagnitude`].
    LogMagnitude(LogMagnitudeSamples),
    /// See [`Strategy::DenseRange`].
    DenseRange(RangeInclusive<i64>),
    /// See [`Strategy::UniformRandom`].
    UniformRandom(UniformSamples),
}

impl Iterator for Inputs {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<i64> {
        match self {
            Self::Boundary(iter) => iter.next(),
            Self::LogMagnitude(iter) => iter.next(),
            Self::DenseRange(iter) => iter.next(),
            Self::UniformRandom(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Boundary(iter) => iter.size_hint(),
            Self::LogMagnitude(iter) => iter.size_hint(),
            Self::DenseRange(iter) => iter.size_hint(),
            Self::UniformRandom(iter) => iter.size_hint(),
        }
    }
}

impl FusedIterator for Inputs {}

/// Float input strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatStrategy {
    /// Signed zeros, infinities, NaN and range extremes.
    Boundary,
    /// Every finite power of two and its negation.
    PowersOfTwo,
    /// Random doubles with a uniformly chosen decimal exponent.
    UniformRandom {
        /// Generator seed.
        seed: u64,
        /// Number of draws.
        count: usize,
    },
}

impl fmt::Display for FloatStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boundary => write!(f, "float_boundary"),
            Self::PowersOfTwo => write!(f, "powers_of_two"),
            Self::UniformRandom { seed, .. } => write!(f, "float_random(seed={})", seed),
        }
    }
}

impl InputStrategy for FloatStrategy {
    type Value = f64;
    type Iter = FloatInputs;

    fn inputs(&self) -> FloatInputs {
        match self {
            Self::Boundary => FloatInputs::Boundary(FLOAT_BOUNDARY.into_iter()),
            Self::PowersOfTwo => FloatInputs::PowersOfTwo(powers_of_two()),
            Self::UniformRandom { seed, count } => {
                FloatInputs::UniformRandom(random_doubles(*seed, *count))
            }
        }
    }

    fn label(&self) -> String {
        self.to_string()
    }

    fn input_count(&self) -> Option<u64> {
        Some(match self {
            Self::Boundary => FLOAT_BOUNDARY.len() as u64,
            Self::PowersOfTwo => crate::sampling::float::POWERS_OF_TWO_COUNT as u64,
            Self::UniformRandom { count, .. } => *count as u64,
        })
    }
}

/// Iterator over the inputs of one [`FloatStrategy`].
#[derive(Debug, Clone)]
pub enum FloatInputs {
    /// See [`FloatStrategy::Boundary`].
    Boundary(std::array::IntoIter<f64, 13>),
    /// See [`FloatStrategy::PowersOfTwo`].
    PowersOfTwo(PowersOfTwo),
    /// See [`FloatStrategy::UniformRandom`].
    UniformRandom(RandomDoubles),
}

impl Iterator for FloatInputs {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        match self {
            Self::Boundary(iter) => iter.next(),
            Self::PowersOfTwo(iter) => iter.next(),
            Self::UniformRandom(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Boundary(iter) => iter.size_hint(),
            Self::PowersOfTwo(iter) => iter.size_hint(),
            Self::UniformRandom(iter) => iter.size_hint(),
        }
    }
}

impl FusedIterator for FloatInputs {}

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
    fn labels_name_the_sampler() {
        assert_eq!(Strategy::Boundary.label(), "boundary");
        assert_eq!(
            Strategy::log_magnitude(i64::MIN, -1, 10).unwrap().label(),
            "log_magnitude[-9223372036854775808, -1]"
        );
        assert_eq!(
            Strategy::dense_range(-5, 5).unwrap().label(),
            "dense_range[-5, 5]"
        );
        assert_eq!(
            Strategy::uniform_random(42, 10).label(),
            "uniform_random(seed=42)"
        );
        assert_eq!(FloatStrategy::PowersOfTwo.label(), "powers_of_two");
    }

    #[test]
    fn input_count_matches_iteration() {
        let strategies = [
            Strategy::Boundary,
            Strategy::log_magnitude(1, i64::MAX, 100).unwrap(),
            Strategy::dense_range(-50, 50).unwrap(),
            Strategy::uniform_random(3, 77),
        ];
        for strategy in strategies {
            assert_eq!(
                strategy.input_count(),
                Some(strategy.inputs().count() as u64),
                "{strategy}"
            );
        }
        for strategy in [
            FloatStrategy::Boundary,
            FloatStrategy::PowersOfTwo,
            FloatStrategy::UniformRandom { seed: 1, count: 9 },
        ] {
            assert_eq!(
                strategy.input_count(),
                Some(strategy.inputs().count() as u64),
                "{strategy}"
            );
        }
    }

    #[test]
    fn full_domain_dense_range_has_no_count() {
        let strategy = Strategy::dense_range(i64::MIN, i64::MAX).unwrap();
        assert_eq!(strategy.input_count(), None);
    }

    #[test]
    fn passes_are_restartable() {
        let strategy = Strategy::uniform_random(42, 20);
        let first: Vec<i64> = strategy.inputs().collect();
        let second: Vec<i64> = strategy.inputs().collect();
        assert_eq!(first, second);

        let float = FloatStrategy::Boundary;
        let a: Vec<u64> = float.inputs().map(f64::to_bits).collect();
        let b: Vec<u64> = float.inputs().map(f64::to_bits).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn constructors_propagate_range_errors() {
        assert!(Strategy::log_magnitude(-1, 1, 5).is_err());
        assert!(Strategy::dense_range(1, -1).is_err());
    }

    #[test]
    fn strategies_serialize_with_tags() {
        let json = serde_json::to_string(&Strategy::uniform_random(42, 5)).unwrap();
        assert_eq!(json, r#"{"uniform_random":{"seed":42,"count":5}}"#);
        let json = serde_json::to_string(&FloatStrategy::Boundary).unwrap();
        assert_eq!(json, r#""boundary""#);
    }
}
