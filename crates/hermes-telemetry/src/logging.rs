//! Structured logging for Hermes invocations.
//!
//! Hermes emits `tracing` events at every lifecycle phase. This module wires
//! them to stdout through `tracing-subscriber`: JSON lines by default (what
//! log collectors on serverless platforms expect), or a pretty format for
//! local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use hermes_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default())?;
//!
//! tracing::info!(request_id = "r-1", phase = "invoking", "Invocation started");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Pretty => f.write_str("pretty"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(TelemetryError::InvalidConfig(format!(
                "unknown log format '{other}' (expected 'json' or 'pretty')"
            ))),
        }
    }
}

/// How invocation logs are written.
///
/// Serverless log streams stamp every line on ingestion, so timestamps are
/// off unless asked for.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Install a subscriber at all.
    pub enabled: bool,

    /// `EnvFilter` directives, e.g. `info` or `hermes_runtime=debug,warn`.
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Prefix each line with a timestamp.
    pub timestamps: bool,

    /// Log span open and close, which marks each invocation boundary.
    pub span_events: bool,

    /// Include the emitting module path.
    pub include_target: bool,

    /// Recorded once when logging starts.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            timestamps: false,
            span_events: false,
            include_target: true,
            service_name: "hermes".to_string(),
        }
    }
}

impl LogConfig {
    /// Pretty, debug-level output with timestamps and span boundaries, for
    /// running an adapter locally.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            timestamps: true,
            span_events: true,
            ..Self::default()
        }
    }

    /// JSON lines at `info`, as deployed.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Sets the filter directives.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Turns timestamps on or off.
    #[must_use]
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer(config: &LogConfig) -> BoxedLayer {
    let base = tracing_subscriber::fmt::layer()
        .with_ansi(config.format == LogFormat::Pretty)
        .with_span_events(config.span_events())
        .with_target(config.include_target);

    match (config.format, config.timestamps) {
        (LogFormat::Json, true) => base.json().with_current_span(true).boxed(),
        (LogFormat::Json, false) => base.json().with_current_span(true).without_time().boxed(),
        (LogFormat::Pretty, true) => base.pretty().boxed(),
        (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter does not parse or a
/// global subscriber is already installed (e.g. on a warm start that calls
/// this twice).
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;
    tracing_subscriber::registry()
        .with(fmt_layer(config).with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(
        service.name = %config.service_name,
        level = %config.level,
        format = %config.format,
        "Logging initialized"
    );
    Ok(())
}

/// Parses filter directives.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` naming the bad directive.
pub fn create_env_filter(directives: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| TelemetryError::LoggingInit(format!("invalid filter '{directives}': {e}")))
}

/// Standard log field names used by the invocation lifecycle.
pub mod fields {
    /// Platform request id.
    pub const REQUEST_ID: &str = "request_id";

    /// Adaptation mode (`http` or `generic`).
    pub const EVENT_TYPE: &str = "event_type";

    /// Lifecycle phase.
    pub const PHASE: &str = "phase";

    /// Bootstrap or teardown step name.
    pub const HOOK: &str = "hook";

    /// Encoded status code.
    pub const STATUS_CODE: &str = "status_code";

    /// Duration field name (in milliseconds).
    pub const DURATION_MS: &str = "duration_ms";

    /// Error field name.
    pub const ERROR: &str = "error";

    /// Service name field name.
    pub const SERVICE_NAME: &str = "service.name";
}
