//! In-process adapter invocation.

use hermes_core::{HermesResult, InboundEvent, InvocationContext};
use hermes_runtime::Adapter;

use crate::error::TestError;
use crate::probe::CompletionProbe;
use crate::result::TestResult;

/// Drives an [`Adapter`] without a Lambda runtime.
///
/// # Example
///
/// ```ignore
/// let invoker = TestInvoker::new(adapter);
/// invoker
///     .send(TestEvent::get("/health"))
///     .await?
///     .assert_status(200);
/// ```
#[derive(Debug, Clone)]
pub struct TestInvoker {
    adapter: Adapter,
    context: InvocationContext,
}

impl TestInvoker {
    /// Creates an invoker using a mock invocation context.
    #[must_use]
    pub fn new(adapter: Adapter) -> Self {
        Self {
            adapter,
            context: InvocationContext::mock(),
        }
    }

    /// Sets the invocation context passed on every call.
    #[must_use]
    pub fn with_context(mut self, context: InvocationContext) -> Self {
        self.context = context;
        self
    }

    /// Returns the adapter under test.
    #[must_use]
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Invokes the adapter and returns its raw completion.
    pub async fn call(&self, event: impl Into<InboundEvent>) -> HermesResult<TestResult> {
        self.adapter
            .call(event, self.context.clone())
            .await
            .map(TestResult::new)
    }

    /// Invokes the adapter, treating an adapter error as a test error.
    pub async fn send(&self, event: impl Into<InboundEvent>) -> Result<TestResult, TestError> {
        self.call(event)
            .await
            .map_err(|e| TestError::Invocation(e.to_string()))
    }

    /// Invokes the callback form and returns the probe that recorded it.
    pub async fn invoke(&self, event: impl Into<InboundEvent>) -> CompletionProbe {
        let probe = CompletionProbe::new();
        self.adapter
            .invoke(event, self.context.clone(), probe.callback())
            .await;
        probe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::TestEvent;
    use hermes_runtime::LifecycleOptions;
    use serde_json::json;

    #[tokio::test]
    async fn test_send_http() {
        let adapter = Adapter::new(
            fixtures::json_action("status", json!({"ok": true})),
            LifecycleOptions::new(),
        )
        .unwrap();

        TestInvoker::new(adapter)
            .send(TestEvent::get("/status"))
            .await
            .unwrap()
            .assert_status(200)
            .assert_header("Content-Length", "11");
    }

    #[tokio::test]
    async fn test_send_maps_generic_errors() {
        let adapter = Adapter::new(
            fixtures::failing_generic_action("broken", "queue unavailable"),
            LifecycleOptions::new(),
        )
        .unwrap();
        let invoker = TestInvoker::new(adapter);

        let err = invoker.send(TestEvent::generic(json!({}))).await.unwrap_err();
        assert!(matches!(err, TestError::Invocation(ref msg) if msg.contains("queue unavailable")));

        let probe = invoker.invoke(TestEvent::generic(json!({}))).await;
        assert!(probe.assert_completed_once().is_err());
    }

    #[tokio::test]
    async fn test_custom_context() {
        let adapter = Adapter::new(fixtures::generic_echo_action("echo"), LifecycleOptions::new())
            .unwrap();
        let invoker =
            TestInvoker::new(adapter).with_context(InvocationContext::new("req-custom"));

        let result = invoker.send(TestEvent::generic(json!({"n": 1}))).await.unwrap();
        assert_eq!(result.body()["context"]["requestId"], "req-custom");
        assert_eq!(result.body()["event"], json!({"n": 1}));
    }
}
