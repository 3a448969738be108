//! Invocation metrics.
//!
//! Metrics are emitted through the `metrics` facade. No recorder or exporter
//! is installed here: the embedding function chooses one (or none, in which
//! case every call is a no-op).
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `hermes_invocations_total` | Counter | `event_type`, `outcome` | Completed invocations |
//! | `hermes_invocation_duration_seconds` | Histogram | `event_type` | Invocation latency |
//! | `hermes_hook_failures_total` | Counter | `phase` | Failed bootstrap/teardown steps |
//! | `hermes_invocations_in_flight` | Gauge | - | Invocations currently running |
//!
//! # Example
//!
//! ```rust
//! use hermes_telemetry::metrics::{record_invocation, Outcome};
//! use std::time::Duration;
//!
//! record_invocation("http", Outcome::Success, Duration::from_millis(12));
//! ```

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::fmt;
use std::time::Duration;

/// Metric names.
pub mod names {
    /// Completed invocations.
    pub const INVOCATIONS_TOTAL: &str = "hermes_invocations_total";
    /// Invocation latency.
    pub const INVOCATION_DURATION_SECONDS: &str = "hermes_invocation_duration_seconds";
    /// Failed lifecycle hook steps.
    pub const HOOK_FAILURES_TOTAL: &str = "hermes_hook_failures_total";
    /// Invocations currently running.
    pub const INVOCATIONS_IN_FLIGHT: &str = "hermes_invocations_in_flight";
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The action's result was delivered.
    Success,
    /// The invocation ended in a failure result or error.
    Failure,
}

impl Outcome {
    /// Returns the label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registers descriptions for all standard metrics.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(
        names::INVOCATIONS_TOTAL,
        "Total number of invocations completed, by event type and outcome"
    );
    describe_histogram!(
        names::INVOCATION_DURATION_SECONDS,
        "Invocation duration in seconds, bootstrap through teardown"
    );
    describe_counter!(
        names::HOOK_FAILURES_TOTAL,
        "Total number of failed bootstrap or teardown steps"
    );
    describe_gauge!(
        names::INVOCATIONS_IN_FLIGHT,
        "Number of invocations currently being processed"
    );
}

/// Records a completed invocation.
pub fn record_invocation(event_type: &'static str, outcome: Outcome, duration: Duration) {
    counter!(
        names::INVOCATIONS_TOTAL,
        "event_type" => event_type,
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(
        names::INVOCATION_DURATION_SECONDS,
        "event_type" => event_type
    )
    .record(duration.as_secs_f64());
}

/// Records a failed bootstrap or teardown step.
pub fn record_hook_failure(phase: &'static str) {
    counter!(names::HOOK_FAILURES_TOTAL, "phase" => phase).increment(1);
}

/// Guard that tracks an in-flight invocation until dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(names::INVOCATIONS_IN_FLIGHT).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(names::INVOCATIONS_IN_FLIGHT).decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Success.as_str(), "success");
        assert_eq!(Outcome::Failure.to_string(), "failure");
    }

    #[test]
    fn test_record_functions_without_recorder() {
        describe_metrics();
        record_invocation("http", Outcome::Success, Duration::from_millis(10));
        record_invocation("generic", Outcome::Failure, Duration::from_millis(3));
        record_hook_failure("bootstrap");
    }

    #[test]
    fn test_in_flight_guard() {
        let guard = InFlightGuard::new();
        drop(guard);
    }
}
