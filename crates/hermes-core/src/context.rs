//! Invocation context types.
//!
//! The [`InvocationContext`] carries the platform's execution metadata for one
//! invocation. The adapter treats it as opaque pass-through: it is handed to
//! hooks and actions and logged, never modified.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Platform metadata accompanying an event.
///
/// # Example
///
/// ```
/// use hermes_core::InvocationContext;
///
/// let ctx = InvocationContext::new("req-1").with_function_name("orders-api");
/// assert_eq!(ctx.request_id(), "req-1");
/// assert_eq!(ctx.function_name(), Some("orders-api"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    /// Platform request id for this invocation.
    request_id: String,

    /// Deployed function name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_name: Option<String>,

    /// Deployed function version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_version: Option<String>,

    /// ARN used to invoke the function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invoked_function_arn: Option<String>,

    /// Configured memory limit in megabytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memory_limit_mb: Option<u32>,

    /// Execution deadline, milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline_ms: Option<u64>,

    /// X-Ray trace header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xray_trace_id: Option<String>,

    /// Anything else the platform attached (client context, identity, ...).
    #[serde(default, skip_serializing_if = "Value::is_null")]
    extra: Value,
}

impl InvocationContext {
    /// Creates a context for the given request id.
    #[must_use]
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Creates a context with a fresh UUID v7 request id, for tests.
    #[must_use]
    pub fn mock() -> Self {
        Self::new(Uuid::now_v7().to_string()).with_function_name("hermes-test")
    }

    /// Sets the function name.
    #[must_use]
    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    /// Sets the function version.
    #[must_use]
    pub fn with_function_version(mut self, version: impl Into<String>) -> Self {
        self.function_version = Some(version.into());
        self
    }

    /// Sets the invoked function ARN.
    #[must_use]
    pub fn with_invoked_function_arn(mut self, arn: impl Into<String>) -> Self {
        self.invoked_function_arn = Some(arn.into());
        self
    }

    /// Sets the memory limit.
    #[must_use]
    pub fn with_memory_limit_mb(mut self, memory: u32) -> Self {
        self.memory_limit_mb = Some(memory);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    /// Sets the X-Ray trace header.
    #[must_use]
    pub fn with_xray_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.xray_trace_id = Some(trace_id.into());
        self
    }

    /// Attaches additional opaque platform metadata.
    #[must_use]
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = extra;
        self
    }

    /// Returns the request id.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the function name.
    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    /// Returns the function version.
    #[must_use]
    pub fn function_version(&self) -> Option<&str> {
        self.function_version.as_deref()
    }

    /// Returns the invoked function ARN.
    #[must_use]
    pub fn invoked_function_arn(&self) -> Option<&str> {
        self.invoked_function_arn.as_deref()
    }

    /// Returns the memory limit.
    #[must_use]
    pub fn memory_limit_mb(&self) -> Option<u32> {
        self.memory_limit_mb
    }

    /// Returns the deadline.
    #[must_use]
    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Returns the X-Ray trace header.
    #[must_use]
    pub fn xray_trace_id(&self) -> Option<&str> {
        self.xray_trace_id.as_deref()
    }

    /// Returns the additional metadata (`null` when none).
    #[must_use]
    pub fn extra(&self) -> &Value {
        &self.extra
    }

    /// Renders the context as a JSON value, as passed to generic actions.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_has_unique_ids() {
        let a = InvocationContext::mock();
        let b = InvocationContext::mock();
        assert_ne!(a.request_id(), b.request_id());
        assert_eq!(a.function_name(), Some("hermes-test"));
    }

    #[test]
    fn test_to_value_camel_case() {
        let ctx = InvocationContext::new("r-1")
            .with_function_name("fn")
            .with_memory_limit_mb(128)
            .with_deadline_ms(1_700_000_000_000);

        let value = ctx.to_value();
        assert_eq!(value["requestId"], "r-1");
        assert_eq!(value["functionName"], "fn");
        assert_eq!(value["memoryLimitMb"], 128);
        assert!(value.get("xrayTraceId").is_none());
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn test_extra_round_trip() {
        let ctx = InvocationContext::new("r-2").with_extra(json!({"identity": {"id": "x"}}));
        let back: InvocationContext = serde_json::from_value(ctx.to_value()).unwrap();
        assert_eq!(back, ctx);
        assert_eq!(back.extra()["identity"]["id"], "x");
    }
}
