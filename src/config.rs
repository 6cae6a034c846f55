//! Fixture configuration.
//!
//! [`FixtureConfig`] holds the sample counts and seeds of both suites and turns them
//! into the ordered strategy lists the orchestrator runs. The default is the full
//! fixture; [`FixtureConfig::smoke`] is small enough for every CI run.
//!
//! # Example
//!
//! ```
//! use division_oracle::FixtureConfig;
//!
//! // Same fixture, different random stream
//! let config = FixtureConfig {
//!     random_seed: 7,
//!     ..FixtureConfig::smoke()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.integer_strategies().unwrap().len(), 5);
//! ```

use crate::error::OracleError;
use crate::report_violation;
use crate::sampling::float::DEFAULT_FLOAT_SEED;
use crate::sampling::uniform_random::DEFAULT_SEED;
use crate::strategy::{FloatStrategy, Strategy};
use crate::telemetry::{ViolationKind, ViolationSeverity};

/// Sample counts and seeds for the integer and float suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[must_use = "FixtureConfig has no effect unless passed to OracleBuilder::with_config()"]
pub struct FixtureConfig {
    /// Samples per log-magnitude sweep. Both the positive and the negative sweep use it.
    ///
    /// Default: 10,000,000
    pub log_sweep_count: usize,

    /// The dense scan covers `[-dense_radius, dense_radius]`.
    ///
    /// Default: 10,000,000
    pub dense_radius: i64,

    /// Seed of the integer uniform random sweep.
    ///
    /// Default: 42
    pub random_seed: u64,

    /// Draws in the integer uniform random sweep.
    ///
    /// Default: 10,000,000
    pub random_count: usize,

    /// Seed of the random double sweep.
    ///
    /// Default: 181601433
    pub float_random_seed: u64,

    /// Draws in the random double sweep.
    ///
    /// Default: 100,000
    pub float_random_count: usize,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            log_sweep_count: 10_000_000,
            dense_radius: 10_000_000,
            random_seed: DEFAULT_SEED,
            random_count: 10_000_000,
            float_random_seed: DEFAULT_FLOAT_SEED,
            float_random_count: 100_000,
        }
    }
}

impl FixtureConfig {
    /// Creates a `FixtureConfig` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full fixture. Same as [`Default`].
    pub fn full() -> Self {
        Self::default()
    }

    /// A few hundred thousand inputs in total; seconds instead of minutes.
    pub fn smoke() -> Self {
        Self {
            log_sweep_count: 10_000,
            dense_radius: 10_000,
            random_count: 100_000,
            float_random_count: 10_000,
            ..Self::default()
        }
    }

    /// Ten times the random draws of the full fixture.
    pub fn stress() -> Self {
        Self {
            random_count: 100_000_000,
            float_random_count: 1_000_000,
            ..Self::default()
        }
    }

    /// The full fixture with a different integer random seed.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            random_seed: seed,
            ..Self::default()
        }
    }

    /// Checks every count and the dense radius.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidConfig`] if a count is zero or the radius is negative.
    pub fn validate(&self) -> Result<(), OracleError> {
        let counts = [
            ("log_sweep_count", self.log_sweep_count),
            ("random_count", self.random_count),
            ("float_random_count", self.float_random_count),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(Self::reject(format!("{} must be positive", field)));
            }
        }

        if self.dense_radius < 0 {
            return Err(Self::reject(format!(
                "dense_radius must be non-negative, got {}",
                self.dense_radius
            )));
        }

        Ok(())
    }

    fn reject(info: String) -> OracleError {
        report_violation!(
            ViolationSeverity::Error,
            ViolationKind::Configuration,
            "invalid fixture configuration: {}",
            info
        );
        OracleError::InvalidConfig { info }
    }

    /// The integer suite in run order: boundary set, positive and negative log sweeps,
    /// dense scan, uniform random.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not [`validate`](Self::validate).
    pub fn integer_strategies(&self) -> Result<Vec<Strategy>, OracleError> {
        self.validate()?;
        Ok(vec![
            Strategy::Boundary,
            Strategy::log_magnitude(1, i64::MAX, self.log_sweep_count)?,
            Strategy::log_magnitude(i64::MIN, -1, self.log_sweep_count)?,
            Strategy::dense_range(-self.dense_radius, self.dense_radius)?,
            Strategy::uniform_random(self.random_seed, self.random_count),
        ])
    }

    /// The float suite in run order: boundary set, power-of-two ladder, random doubles.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not [`validate`](Self::validate).
    pub fn float_strategies(&self) -> Result<Vec<FloatStrategy>, OracleError> {
        self.validate()?;
        Ok(vec![
            FloatStrategy::Boundary,
            FloatStrategy::PowersOfTwo,
            FloatStrategy::UniformRandom {
                seed: self.float_random_seed,
                count: self.float_random_count,
            },
        ])
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
    use crate::strategy::InputStrategy;

    #[test]
    fn default_is_the_full_fixture() {
        let config = FixtureConfig::default();
        assert_eq!(config, FixtureConfig::full());
        assert_eq!(config, FixtureConfig::new());
        assert_eq!(config.log_sweep_count, 10_000_000);
        assert_eq!(config.dense_radius, 10_000_000);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.random_count, 10_000_000);
        assert_eq!(config.float_random_seed, 181_601_433);
        assert_eq!(config.float_random_count, 100_000);
    }

    #[test]
    fn presets_are_valid() {
        for config in [
            FixtureConfig::full(),
            FixtureConfig::smoke(),
            FixtureConfig::stress(),
            FixtureConfig::deterministic(9),
        ] {
            assert!(config.validate().is_ok(), "{config:?}");
        }
    }

    #[test]
    fn smoke_is_smaller_than_full() {
        let smoke = FixtureConfig::smoke();
        let full = FixtureConfig::full();
        assert!(smoke.log_sweep_count < full.log_sweep_count);
        assert!(smoke.dense_radius < full.dense_radius);
        assert!(smoke.random_count < full.random_count);
        assert_eq!(smoke.random_seed, full.random_seed);
    }

    #[test]
    fn zero_counts_are_rejected() {
        let config = FixtureConfig {
            random_count: 0,
            ..FixtureConfig::smoke()
        };
        assert_eq!(
            config.validate(),
            Err(OracleError::InvalidConfig {
                info: "random_count must be positive".to_owned()
            })
        );
        assert!(config.integer_strategies().is_err());
        assert!(config.float_strategies().is_err());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let config = FixtureConfig {
            dense_radius: -1,
            ..FixtureConfig::smoke()
        };
        assert!(matches!(
            config.validate(),
            Err(OracleError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn zero_radius_scans_only_zero() {
        let config = FixtureConfig {
            dense_radius: 0,
            ..FixtureConfig::smoke()
        };
        let strategies = config.integer_strategies().unwrap();
        assert_eq!(strategies[3].inputs().collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn integer_strategies_follow_run_order() {
        let labels: Vec<String> = FixtureConfig::smoke()
            .integer_strategies()
            .unwrap()
            .iter()
            .map(|strategy| strategy.label())
            .collect();
        assert_eq!(
            labels,
            [
                "boundary",
                "log_magnitude[1, 9223372036854775807]",
                "log_magnitude[-9223372036854775808, -1]",
                "dense_range[-10000, 10000]",
                "uniform_random(seed=42)",
            ]
        );
    }

    #[test]
    fn float_strategies_follow_run_order() {
        let strategies = FixtureConfig::smoke().float_strategies().unwrap();
        assert_eq!(
            strategies,
            [
                FloatStrategy::Boundary,
                FloatStrategy::PowersOfTwo,
                FloatStrategy::UniformRandom {
                    seed: 181_601_433,
                    count: 10_000
                },
            ]
        );
    }
}
