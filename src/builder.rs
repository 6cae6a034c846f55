//! Validating construction of orchestrators.

use std::sync::Arc;

use crate::{
    config::FixtureConfig,
    error::OracleError,
    orchestrator::Orchestrator,
    strategy::{FloatStrategy, Strategy},
    telemetry::{
        report_to_observer, OracleViolation, ViolationKind, ViolationObserver, ViolationSeverity,
    },
};

/// The [`OracleBuilder`] builds orchestrators for both suites.
///
/// By default the strategy lists come from the [`FixtureConfig`]. Explicit lists set
/// with [`with_strategies`](Self::with_strategies) or
/// [`with_float_strategies`](Self::with_float_strategies) replace them.
///
/// # Example
///
/// ```
/// use division_oracle::{FixtureConfig, Operation, OracleBuilder, OracleComparator};
/// use division_oracle::gold::reference_div_p2;
///
/// let orchestrator = OracleBuilder::new()
///     .with_config(FixtureConfig {
///         log_sweep_count: 10,
///         dense_radius: 10,
///         random_count: 10,
///         ..FixtureConfig::smoke()
///     })
///     .build_integer()
///     .unwrap();
///
/// let comparator = OracleComparator::new(Operation::DIV_P2, reference_div_p2);
/// assert!(orchestrator.run(&comparator).is_ok());
/// ```
#[must_use = "OracleBuilder must be consumed by calling a build_* method"]
#[derive(Default)]
pub struct OracleBuilder {
    config: FixtureConfig,
    strategies: Option<Vec<Strategy>>,
    float_strategies: Option<Vec<FloatStrategy>>,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl OracleBuilder {
    /// Construct a new builder with the full fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the fixture configuration.
    pub fn with_config(mut self, config: FixtureConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs exactly these integer strategies, in this order.
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = Some(strategies);
        self
    }

    /// Runs exactly these float strategies, in this order.
    pub fn with_float_strategies(mut self, strategies: Vec<FloatStrategy>) -> Self {
        self.float_strategies = Some(strategies);
        self
    }

    /// Sets a violation observer for mismatch reports.
    ///
    /// Without one, violations are logged through [`TracingObserver`].
    ///
    /// [`TracingObserver`]: crate::telemetry::TracingObserver
    ///
    /// ```
    /// use division_oracle::{OracleBuilder, telemetry::CollectingObserver};
    /// use std::sync::Arc;
    ///
    /// let observer = Arc::new(CollectingObserver::new());
    /// let orchestrator = OracleBuilder::new()
    ///     .with_strategies(vec![division_oracle::Strategy::Boundary])
    ///     .with_observer(observer.clone())
    ///     .build_integer()
    ///     .unwrap();
    ///
    /// let reference = division_oracle::OracleComparator::new(
    ///     division_oracle::Operation::DIV_EXT,
    ///     division_oracle::gold::reference_div_ext,
    /// );
    /// orchestrator.run(&reference).unwrap();
    /// assert!(observer.is_empty());
    /// ```
    pub fn with_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// The fixture configuration this builder will use.
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Consumes the builder to construct the integer orchestrator.
    ///
    /// # Errors
    /// - Returns [`InvalidConfig`] if the configuration is invalid or an explicit
    ///   strategy list is empty.
    ///
    /// [`InvalidConfig`]: OracleError::InvalidConfig
    pub fn build_integer(self) -> Result<Orchestrator<Strategy>, OracleError> {
        let strategies = match self.strategies {
            Some(strategies) => {
                non_empty(strategies, "integer", self.violation_observer.as_ref())?
            }
            None => self.config.integer_strategies()?,
        };
        Ok(attach(
            Orchestrator::new(strategies),
            self.violation_observer,
        ))
    }

    /// Consumes the builder to construct the float orchestrator.
    ///
    /// # Errors
    /// - Returns [`InvalidConfig`] if the configuration is invalid or an explicit
    ///   strategy list is empty.
    ///
    /// [`InvalidConfig`]: OracleError::InvalidConfig
    pub fn build_float(self) -> Result<Orchestrator<FloatStrategy>, OracleError> {
        let strategies = match self.float_strategies {
            Some(strategies) => {
                non_empty(strategies, "float", self.violation_observer.as_ref())?
            }
            None => self.config.float_strategies()?,
        };
        Ok(attach(
            Orchestrator::new(strategies),
            self.violation_observer,
        ))
    }
}

impl std::fmt::Debug for OracleBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleBuilder")
            .field("config", &self.config)
            .field("strategies", &self.strategies)
            .field("float_strategies", &self.float_strategies)
            .field("has_observer", &self.violation_observer.is_some())
            .finish()
    }
}

fn non_empty<S>(
    strategies: Vec<S>,
    suite: &str,
    observer: Option<&Arc<dyn ViolationObserver>>,
) -> Result<Vec<S>, OracleError> {
    if strategies.is_empty() {
        let info = format!("{} strategy list must not be empty", suite);
        report_to_observer(
            observer,
            &OracleViolation::new(
                ViolationSeverity::Error,
                ViolationKind::Configuration,
                format!("invalid builder configuration: {}", info),
                concat!(file!(), ":", line!()),
            ),
        );
        return Err(OracleError::InvalidConfig { info });
    }
    Ok(strategies)
}

fn attach<S: crate::strategy::InputStrategy>(
    orchestrator: Orchestrator<S>,
    observer: Option<Arc<dyn ViolationObserver>>,
) -> Orchestrator<S> {
    match observer {
        Some(observer) => orchestrator.with_observer(observer),
        None => orchestrator,
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
    use crate::assert_violation;
    use crate::gold::reference_div_ext;
    use crate::oracle::{Operation, OracleComparator};
    use crate::telemetry::CollectingObserver;

    #[test]
    fn default_builder_uses_full_fixture() {
        let builder = OracleBuilder::new();
        assert_eq!(*builder.config(), FixtureConfig::full());
        let orchestrator = builder.build_integer().unwrap();
        assert_eq!(orchestrator.strategies().len(), 5);
    }

    #[test]
    fn explicit_strategies_replace_config() {
        let orchestrator = OracleBuilder::new()
            .with_strategies(vec![Strategy::Boundary])
            .build_integer()
            .unwrap();
        assert_eq!(orchestrator.strategies(), &[Strategy::Boundary]);

        let orchestrator = OracleBuilder::new()
            .with_float_strategies(vec![FloatStrategy::PowersOfTwo])
            .build_float()
            .unwrap();
        assert_eq!(orchestrator.strategies(), &[FloatStrategy::PowersOfTwo]);
    }

    #[test]
    fn empty_strategy_list_is_rejected() {
        let err = OracleBuilder::new()
            .with_strategies(Vec::new())
            .build_integer()
            .unwrap_err();
        assert_eq!(
            err,
            OracleError::InvalidConfig {
                info: "integer strategy list must not be empty".to_owned()
            }
        );
        assert!(OracleBuilder::new()
            .with_float_strategies(Vec::new())
            .build_float()
            .is_err());
    }

    #[test]
    fn empty_strategy_list_is_reported_to_the_observer() {
        let observer = Arc::new(CollectingObserver::new());
        let result = OracleBuilder::new()
            .with_strategies(Vec::new())
            .with_observer(observer.clone())
            .build_integer();
        assert!(matches!(result, Err(OracleError::InvalidConfig { .. })));
        assert_violation!(observer, ViolationKind::Configuration);
        let recorded = observer.violations();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].severity, ViolationSeverity::Error);
        assert!(recorded[0].message.contains("integer strategy list"));
        assert!(recorded[0].location.contains("builder.rs"));

        let observer = Arc::new(CollectingObserver::new());
        let result = OracleBuilder::new()
            .with_float_strategies(Vec::new())
            .with_observer(observer.clone())
            .build_float();
        assert!(result.is_err());
        assert_eq!(
            observer
                .violations_of_kind(ViolationKind::Configuration)
                .len(),
            1
        );
        assert!(observer.violations()[0].message.contains("float strategy list"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = OracleBuilder::new()
            .with_config(FixtureConfig {
                float_random_count: 0,
                ..FixtureConfig::smoke()
            })
            .build_float();
        assert!(matches!(result, Err(OracleError::InvalidConfig { .. })));
    }

    #[test]
    fn observer_is_attached() {
        let observer = Arc::new(CollectingObserver::new());
        let orchestrator = OracleBuilder::new()
            .with_strategies(vec![Strategy::Boundary])
            .with_observer(observer.clone())
            .build_integer()
            .unwrap();

        let comparator = OracleComparator::new(Operation::DIV_EXT, |n: i64| {
            reference_div_ext(n).wrapping_add(i64::from(n == -2))
        });
        assert!(orchestrator.run(&comparator).is_err());
        assert_eq!(observer.violations_of_kind(ViolationKind::Mismatch).len(), 1);
        assert_eq!(observer.violations()[0].index, Some(4));
    }

    #[test]
    fn debug_output_hides_observer() {
        let builder = OracleBuilder::new().with_observer(Arc::new(CollectingObserver::new()));
        let debug = format!("{builder:?}");
        assert!(debug.contains("has_observer: true"));
    }
}
