//! Structured reporting of mismatches and fixture errors.
//!
//! Every failure the oracle detects becomes an [`OracleViolation`] and is handed to a
//! [`ViolationObserver`]. Orchestrators without an observer log through
//! [`TracingObserver`]; tests attach a [`CollectingObserver`] and inspect what was
//! reported, and [`CompositeObserver`] forwards to several observers at once.
//!
//! ```
//! use division_oracle::telemetry::{CollectingObserver, ViolationKind};
//! use division_oracle::{Operation, OracleBuilder, OracleComparator, Strategy};
//! use std::sync::Arc;
//!
//! let observer = Arc::new(CollectingObserver::new());
//! let orchestrator = OracleBuilder::new()
//!     .with_strategies(vec![Strategy::Boundary])
//!     .with_observer(observer.clone())
//!     .build_integer()
//!     .unwrap();
//!
//! let broken = OracleComparator::new(Operation::DIV_P2, |n: i64| n);
//! assert!(orchestrator.run(&broken).is_err());
//! assert!(observer.has_violation(ViolationKind::Mismatch));
//! ```

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// How bad a violation is, from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// Suspicious but harmless.
    Warning,
    /// The requested run cannot start.
    Error,
    /// The function under test produced a wrong result.
    Critical,
}

impl ViolationSeverity {
    /// Lowercase label used in logs and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of failure a violation describes.
///
/// Non-exhaustive: match with a wildcard arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViolationKind {
    /// The function under test disagreed with the reference.
    Mismatch,
    /// A fixture, range or sampling request was rejected before any input was tested.
    Configuration,
}

impl ViolationKind {
    /// Lowercase label used in logs and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mismatch => "mismatch",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported failure.
///
/// ```
/// use division_oracle::telemetry::{OracleViolation, ViolationSeverity, ViolationKind};
///
/// let violation = OracleViolation::new(
///     ViolationSeverity::Critical,
///     ViolationKind::Mismatch,
///     "calculate_div_p2 disagrees with reference",
///     "orchestrator.rs:42",
/// )
/// .with_index(17)
/// .with_context("input", i64::MIN.to_string());
///
/// let json = serde_json::to_string(&violation).unwrap();
/// assert!(json.contains(r#""severity":"critical""#));
/// assert!(json.contains(r#""index":17"#));
/// ```
#[derive(Debug, Clone, serde::Serialize)]
pub struct OracleViolation {
    /// Severity.
    pub severity: ViolationSeverity,
    /// Category.
    pub kind: ViolationKind,
    /// One-line description.
    pub message: String,
    /// `file:line` of the code that raised it.
    pub location: &'static str,
    /// Position of the offending input within its phase, for mismatches.
    pub index: Option<u64>,
    /// Phase label, input, expected and actual values, or rejected parameters.
    pub context: BTreeMap<String, String>,
}

impl OracleViolation {
    /// Creates a violation with no index and an empty context.
    #[must_use]
    pub fn new(
        severity: ViolationSeverity,
        kind: ViolationKind,
        message: impl Into<String>,
        location: &'static str,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            location,
            index: None,
            context: BTreeMap::new(),
        }
    }

    /// Records the input index.
    #[must_use]
    pub fn with_index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    /// Adds one context entry, replacing any previous value for `key`.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Compact JSON form, or `None` if serialization fails.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

impl fmt::Display for OracleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.kind, self.message)?;
        if let Some(index) = self.index {
            write!(f, " at index {index}")?;
        }
        for (key, value) in &self.context {
            write!(f, " {key}={value}")?;
        }
        write!(f, " ({})", self.location)
    }
}

/// Receives violations as they are raised.
///
/// Implementations are shared between the caller and the orchestrator, so they must be
/// `Send + Sync`.
///
/// ```
/// use division_oracle::telemetry::{ViolationObserver, OracleViolation};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct CountingObserver(AtomicUsize);
///
/// impl ViolationObserver for CountingObserver {
///     fn on_violation(&self, _violation: &OracleViolation) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait ViolationObserver: Send + Sync {
    /// Called once per violation.
    fn on_violation(&self, violation: &OracleViolation);
}

/// Logs violations as `tracing` events.
///
/// Warnings become `warn!` events, errors and mismatches become `error!` events. The
/// index and context travel as structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ViolationObserver for TracingObserver {
    fn on_violation(&self, violation: &OracleViolation) {
        let severity = violation.severity.as_str();
        let kind = violation.kind.as_str();
        match violation.severity {
            ViolationSeverity::Warning => tracing::warn!(
                severity,
                kind,
                location = violation.location,
                index = ?violation.index,
                context = ?violation.context,
                "{}",
                violation.message
            ),
            ViolationSeverity::Error | ViolationSeverity::Critical => tracing::error!(
                severity,
                kind,
                location = violation.location,
                index = ?violation.index,
                context = ?violation.context,
                "{}",
                violation.message
            ),
        }
    }
}

/// Keeps every violation in memory.
///
/// ```
/// use division_oracle::telemetry::{
///     CollectingObserver, OracleViolation, ViolationKind, ViolationObserver, ViolationSeverity,
/// };
///
/// let observer = CollectingObserver::new();
/// observer.on_violation(&OracleViolation::new(
///     ViolationSeverity::Error,
///     ViolationKind::Configuration,
///     "count must be positive",
///     "test.rs:1",
/// ));
///
/// assert_eq!(observer.len(), 1);
/// assert!(observer.has_violation(ViolationKind::Configuration));
/// ```
#[derive(Debug, Default)]
pub struct CollectingObserver {
    recorded: Mutex<Vec<OracleViolation>>,
}

impl CollectingObserver {
    /// Creates an empty observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in arrival order.
    #[must_use]
    pub fn violations(&self) -> Vec<OracleViolation> {
        self.recorded.lock().clone()
    }

    /// Number of recorded violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recorded.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recorded.lock().is_empty()
    }

    /// Returns `true` if at least one violation of `kind` was recorded.
    #[must_use]
    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.recorded.lock().iter().any(|recorded| recorded.kind == kind)
    }

    /// The recorded violations of `kind`.
    #[must_use]
    pub fn violations_of_kind(&self, kind: ViolationKind) -> Vec<OracleViolation> {
        self.recorded
            .lock()
            .iter()
            .filter(|recorded| recorded.kind == kind)
            .cloned()
            .collect()
    }
}

impl ViolationObserver for CollectingObserver {
    fn on_violation(&self, violation: &OracleViolation) {
        self.recorded.lock().push(violation.clone());
    }
}

/// Forwards each violation to every child observer, in insertion order.
#[derive(Default)]
pub struct CompositeObserver {
    children: Vec<Arc<dyn ViolationObserver>>,
}

impl CompositeObserver {
    /// Creates a composite with no children.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a child observer.
    #[must_use]
    pub fn with(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.children.push(observer);
        self
    }
}

impl ViolationObserver for CompositeObserver {
    fn on_violation(&self, violation: &OracleViolation) {
        self.children
            .iter()
            .for_each(|child| child.on_violation(violation));
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("children", &self.children.len())
            .finish()
    }
}

/// Hands `violation` to `observer`, or logs it through [`TracingObserver`] if there is none.
pub fn report_to_observer<O: ViolationObserver + ?Sized>(
    observer: Option<&Arc<O>>,
    violation: &OracleViolation,
) {
    match observer {
        Some(observer) => observer.on_violation(violation),
        None => TracingObserver.on_violation(violation),
    }
}

/// Raises a violation at the call site and logs it through [`TracingObserver`].
///
/// ```text
/// report_violation!(severity, kind, "message");
/// report_violation!(severity, kind, "message with {}", args);
/// ```
///
/// [`TracingObserver`]: crate::telemetry::TracingObserver
#[macro_export]
macro_rules! report_violation {
    ($severity:expr, $kind:expr, $msg:literal) => {
        $crate::report_violation!($severity, $kind, $msg,)
    };
    ($severity:expr, $kind:expr, $fmt:literal, $($arg:tt)*) => {{
        let violation = $crate::telemetry::OracleViolation::new(
            $severity,
            $kind,
            format!($fmt, $($arg)*),
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::ViolationObserver::on_violation(
            &$crate::telemetry::TracingObserver,
            &violation,
        );
    }};
}

/// Panics with the recorded list if a [`CollectingObserver`] saw anything.
///
/// [`CollectingObserver`]: crate::telemetry::CollectingObserver
#[macro_export]
macro_rules! assert_no_violations {
    ($observer:expr) => {{
        let violations = $observer.violations();
        assert!(
            violations.is_empty(),
            "expected no violations, found {}:\n{:#?}",
            violations.len(),
            violations
        );
    }};
}

/// Panics if a [`CollectingObserver`] saw no violation of the given kind.
///
/// [`CollectingObserver`]: crate::telemetry::CollectingObserver
#[macro_export]
macro_rules! assert_violation {
    ($observer:expr, $kind:expr) => {{
        assert!(
            $observer.has_violation($kind),
            "expected a {} violation, found:\n{:#?}",
            $kind,
            $observer.violations()
        );
    }};
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn min_mismatch() -> OracleViolation {
        OracleViolation::new(
            ViolationSeverity::Critical,
            ViolationKind::Mismatch,
            "calculate_div_p2 disagrees with reference",
            "test.rs:42",
        )
        .with_index(5)
        .with_context("input", i64::MIN.to_string())
        .with_context("expected", "1")
        .with_context("actual", "2")
    }

    fn bad_count() -> OracleViolation {
        OracleViolation::new(
            ViolationSeverity::Error,
            ViolationKind::Configuration,
            "count must be positive",
            "test.rs:7",
        )
    }

    #[test]
    fn severities_are_ordered() {
        assert!(ViolationSeverity::Warning < ViolationSeverity::Error);
        assert!(ViolationSeverity::Error < ViolationSeverity::Critical);
    }

    #[test]
    fn display_lists_context_in_key_order() {
        assert_eq!(
            min_mismatch().to_string(),
            "critical mismatch: calculate_div_p2 disagrees with reference at index 5 \
             actual=2 expected=1 input=-9223372036854775808 (test.rs:42)"
        );
        assert_eq!(
            bad_count().to_string(),
            "error configuration: count must be positive (test.rs:7)"
        );
    }

    #[test]
    fn missing_index_serializes_as_null() {
        let json = serde_json::to_string(&bad_count()).unwrap();
        assert!(json.contains(r#""index":null"#));
        assert!(json.contains(r#""kind":"configuration""#));
    }

    #[cfg(feature = "json")]
    #[test]
    fn to_json_includes_context() {
        let json = min_mismatch().to_json().unwrap();
        assert!(json.contains(r#""input":"-9223372036854775808""#));
    }

    #[test]
    fn collecting_observer_filters_by_kind() {
        let observer = CollectingObserver::new();
        assert_no_violations!(observer);

        observer.on_violation(&min_mismatch());
        observer.on_violation(&bad_count());

        assert_eq!(observer.len(), 2);
        assert_violation!(observer, ViolationKind::Mismatch);
        let configuration = observer.violations_of_kind(ViolationKind::Configuration);
        assert_eq!(configuration.len(), 1);
        assert_eq!(configuration[0].message, "count must be positive");
    }

    #[test]
    fn composite_observer_reaches_every_child() {
        let first = Arc::new(CollectingObserver::new());
        let second = Arc::new(CollectingObserver::new());
        let composite = CompositeObserver::new()
            .with(first.clone())
            .with(second.clone());

        composite.on_violation(&min_mismatch());

        assert_eq!(first.len(), 1);
        assert_eq!(second.violations()[0].index, Some(5));
        assert_eq!(
            format!("{composite:?}"),
            "CompositeObserver { children: 2 }"
        );
    }

    #[test]
    fn report_to_observer_prefers_the_given_observer() {
        let collecting = Arc::new(CollectingObserver::new());
        report_to_observer(Some(&collecting), &bad_count());
        assert_eq!(collecting.len(), 1);

        // Falls back to tracing.
        report_to_observer::<CollectingObserver>(None, &min_mismatch());
        assert_eq!(collecting.len(), 1);
    }

    #[test]
    fn report_violation_records_call_site() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            report_violation!(
                ViolationSeverity::Warning,
                ViolationKind::Configuration,
                "sweep count {} is unusually small",
                3
            );
            report_violation!(
                ViolationSeverity::Error,
                ViolationKind::Configuration,
                "plain report"
            );
        });
    }
}
