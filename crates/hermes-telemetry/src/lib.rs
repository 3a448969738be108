//! Observability for Hermes invocations.
//!
//! - **Logging**: structured `tracing` output (JSON or pretty) via `tracing-subscriber`
//! - **Metrics**: invocation counters and latency via the `metrics` facade
//!
//! The lifecycle emits these fields on its log events:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `request_id` | Platform request id |
//! | `event_type` | `http` or `generic` |
//! | `phase` | `bootstrapping`, `invoking`, `tearing_down`, `done` |
//! | `hook` | Bootstrap or teardown step name |
//! | `status_code` | Encoded status (HTTP adaptation) |
//! | `duration_ms` | Elapsed invocation time |
//! | `error` | Failure detail |
//!
//! # Example
//!
//! ```rust,ignore
//! use hermes_telemetry::{init_logging, metrics::describe_metrics, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! describe_metrics();
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{describe_metrics, record_hook_failure, record_invocation, InFlightGuard, Outcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
