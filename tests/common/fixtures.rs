//! Scaled-down fixtures and stream helpers.

#![allow(dead_code)]

use division_oracle::test_config::fixture_samples;
use division_oracle::{FixtureConfig, InputStrategy, OracleValue};

/// A fixture small enough to run many times per test.
pub fn tiny_config() -> FixtureConfig {
    FixtureConfig {
        log_sweep_count: fixture_samples(200),
        dense_radius: fixture_samples(500) as i64,
        random_count: fixture_samples(500),
        float_random_count: fixture_samples(500),
        ..FixtureConfig::smoke()
    }
}

/// Float fixture with a short random phase.
pub fn tiny_float_config() -> FixtureConfig {
    FixtureConfig {
        float_random_count: fixture_samples(2000),
        ..tiny_config()
    }
}

/// Phase label and index of the first occurrence of `value` in the concatenated
/// streams of `strategies`.
pub fn locate<S: InputStrategy>(strategies: &[S], value: S::Value) -> Option<(String, u64)> {
    strategies.iter().find_map(|strategy| {
        strategy
            .inputs()
            .position(|input| input.matches(&value))
            .map(|index| (strategy.label(), index as u64))
    })
}
