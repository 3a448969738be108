//! Error types for Hermes.
//!
//! This module provides the [`HermesError`] type, the single error type that
//! flows through an invocation and out of the completion callback.
//!
//! # Error kinds
//!
//! | `ErrorKind` | Raised | Surfaced as |
//! |---|---|---|
//! | `Configuration` | adapter construction | construction failure, never at invocation time |
//! | `Bootstrap` | a bootstrap step failed | 500-equivalent result (HTTP) or callback error (generic) |
//! | `HandlerInternal` | adapter glue failed around the handler | same shape as `Bootstrap` |
//! | `Handler` | a generic action took its error exit | callback error |
//! | `Teardown` | a teardown step failed | appended to any prior error |
//! | `Serialization` | an output could not be serialized | same shape as `HandlerInternal` |
//!
//! A malformed request body is not an error: it degrades to a `null` parsed body.

use serde::{Deserialize, Serialize};
use std::any::Any;
use thiserror::Error;

/// Result type alias using [`HermesError`].
pub type HermesResult<T> = Result<T, HermesError>;

/// Classification of a [`HermesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid action contract or options for the selected event type.
    Configuration,
    /// A bootstrap step failed.
    Bootstrap,
    /// The adapter machinery failed while invoking the handler.
    HandlerInternal,
    /// The action itself reported a failure.
    Handler,
    /// A teardown step failed.
    Teardown,
    /// Output serialization failed.
    Serialization,
    /// A prior failure followed by a teardown failure.
    Compound,
}

impl ErrorKind {
    /// Returns the snake-case name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Bootstrap => "bootstrap",
            Self::HandlerInternal => "handler_internal",
            Self::Handler => "handler",
            Self::Teardown => "teardown",
            Self::Serialization => "serialization",
            Self::Compound => "compound",
        }
    }
}

/// Standard error type for Hermes.
///
/// # Example
///
/// ```
/// use hermes_core::{ErrorKind, HermesError};
///
/// let err = HermesError::bootstrap("connect", anyhow::anyhow!("db down"));
/// assert_eq!(err.kind(), ErrorKind::Bootstrap);
/// assert!(err.to_string().contains("db down"));
/// ```
#[derive(Error, Debug)]
pub enum HermesError {
    /// The action cannot be adapted with the given options.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// A bootstrap step failed; the handler was not invoked.
    #[error("Bootstrap step '{step}' failed: {cause:#}")]
    Bootstrap {
        /// Name of the failing step.
        step: String,
        /// The step's own error.
        cause: anyhow::Error,
    },

    /// The adapter failed while running the handler.
    #[error("Handler invocation failed: {message}")]
    HandlerInternal {
        /// Human-readable error message.
        message: String,
    },

    /// The action reported a failure through its error exit.
    #[error("{cause:#}")]
    Handler {
        /// The action's error.
        cause: anyhow::Error,
    },

    /// A teardown step failed.
    #[error("Teardown step '{step}' failed: {cause:#}")]
    Teardown {
        /// Name of the failing step.
        step: String,
        /// The step's own error.
        cause: anyhow::Error,
    },

    /// An output value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A failure followed by a teardown failure. Both details are kept in order.
    #[error("{primary}\n{teardown}")]
    Compound {
        /// The first failure of the invocation.
        primary: Box<HermesError>,
        /// The teardown failure that followed it.
        teardown: Box<HermesError>,
    },
}

impl HermesError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a bootstrap error for the named step.
    pub fn bootstrap(step: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self::Bootstrap {
            step: step.into(),
            cause: cause.into(),
        }
    }

    /// Creates an internal handler-invocation error.
    #[must_use]
    pub fn handler_internal(message: impl Into<String>) -> Self {
        Self::HandlerInternal {
            message: message.into(),
        }
    }

    /// Wraps an action's own failure.
    pub fn handler(cause: impl Into<anyhow::Error>) -> Self {
        Self::Handler {
            cause: cause.into(),
        }
    }

    /// Creates a teardown error for the named step.
    pub fn teardown(step: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self::Teardown {
            step: step.into(),
            cause: cause.into(),
        }
    }

    /// Converts a caught panic payload into a [`HermesError::HandlerInternal`].
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        Self::handler_internal(format!("panic: {}", panic_message(payload)))
    }

    /// Appends a teardown failure to this error.
    ///
    /// The resulting message lists this error's detail first, then the
    /// teardown detail, separated by a newline.
    #[must_use]
    pub fn with_teardown_failure(self, teardown: HermesError) -> Self {
        Self::Compound {
            primary: Box::new(self),
            teardown: Box::new(teardown),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Bootstrap { .. } => ErrorKind::Bootstrap,
            Self::HandlerInternal { .. } => ErrorKind::HandlerInternal,
            Self::Handler { .. } => ErrorKind::Handler,
            Self::Teardown { .. } => ErrorKind::Teardown,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Compound { .. } => ErrorKind::Compound,
        }
    }

    /// Returns `true` for construction-time configuration errors.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Extracts the message from a caught panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Renders an error with its whole cause chain, one cause per line.
///
/// The outermost message comes first, followed by a `Caused by:` line for
/// each source. Backtraces are never included. This is the failure
/// description placed in error bodies.
#[must_use]
pub fn failure_detail(error: &anyhow::Error) -> String {
    error
        .chain()
        .skip(1)
        .fold(error.to_string(), |mut detail, cause| {
            detail.push_str("\nCaused by: ");
            detail.push_str(&cause.to_string());
            detail
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = HermesError::configuration("missing `event` input");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Configuration error: missing `event` input"
        );
    }

    #[test]
    fn test_bootstrap_error_mentions_step_and_cause() {
        let err = HermesError::bootstrap("connect_db", anyhow::anyhow!("db down"));
        let msg = err.to_string();
        assert!(msg.contains("connect_db"));
        assert!(msg.contains("db down"));
    }

    #[test]
    fn test_cause_chain_in_display() {
        let cause = anyhow::anyhow!("socket closed").context("db down");
        let err = HermesError::teardown("close", cause);
        let msg = err.to_string();
        assert!(msg.contains("db down"));
        assert!(msg.contains("socket closed"));
    }

    #[test]
    fn test_compound_keeps_order() {
        let err = HermesError::handler(anyhow::anyhow!("handler blew up"))
            .with_teardown_failure(HermesError::teardown("flush", anyhow::anyhow!("flush failed")));

        assert_eq!(err.kind(), ErrorKind::Compound);
        let msg = err.to_string();
        let first = msg.find("handler blew up").unwrap();
        let second = msg.find("flush failed").unwrap();
        assert!(first < second);
        assert!(msg.contains('\n'));
    }

    #[test]
    fn test_compound_nests_left_to_right() {
        let err = HermesError::handler_internal("a")
            .with_teardown_failure(HermesError::teardown("t1", anyhow::anyhow!("b")))
            .with_teardown_failure(HermesError::teardown("t2", anyhow::anyhow!("c")));
        let lines: Vec<_> = err.to_string().lines().map(str::to_owned).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with('a'));
        assert!(lines[2].ends_with('c'));
    }

    #[test]
    fn test_from_panic_payloads() {
        let err = HermesError::from_panic(&"boom");
        assert!(err.to_string().contains("boom"));

        let err = HermesError::from_panic(&String::from("kaboom"));
        assert!(err.to_string().contains("kaboom"));

        let err = HermesError::from_panic(&42_u8);
        assert_eq!(err.kind(), ErrorKind::HandlerInternal);
    }

    #[test]
    fn test_serialization_from() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HermesError = parse.into();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_failure_detail_includes_causes() {
        let err = anyhow::anyhow!("root cause").context("outer").context("outermost");
        assert_eq!(
            failure_detail(&err),
            "outermost\nCaused by: outer\nCaused by: root cause"
        );
    }

    #[test]
    fn test_failure_detail_single_error() {
        assert_eq!(failure_detail(&anyhow::anyhow!("boom")), "boom");
    }


    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::HandlerInternal.as_str(), "handler_internal");
        let json = serde_json::to_string(&ErrorKind::Teardown).unwrap();
        assert_eq!(json, "\"teardown\"");
    }
}
