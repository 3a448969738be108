//! AWS Lambda runtime bridge.
//!
//! Plugs an [`Adapter`] into `lambda_runtime`: each `LambdaEvent<Value>`
//! becomes one adapter call, and the encoded result is the function reply.
//!
//! ```rust,ignore
//! use hermes_runtime::{lambda, Adapter, LifecycleOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     let adapter = Adapter::new(my_action(), LifecycleOptions::new())?;
//!     lambda::run(adapter).await
//! }
//! ```

use hermes_core::{InboundEvent, InvocationContext};
use hermes_middleware::EncodedResult;
use lambda_runtime::{service_fn, Context, LambdaEvent};
use serde_json::Value;

use crate::adapter::Adapter;

/// Converts the platform context into an [`InvocationContext`].
#[must_use]
pub fn invocation_context(ctx: &Context) -> InvocationContext {
    let mut context = InvocationContext::new(ctx.request_id.clone())
        .with_invoked_function_arn(ctx.invoked_function_arn.clone())
        .with_deadline_ms(ctx.deadline)
        .with_function_name(ctx.env_config.function_name.clone())
        .with_function_version(ctx.env_config.version.clone());

    if let Ok(memory) = u32::try_from(ctx.env_config.memory) {
        context = context.with_memory_limit_mb(memory);
    }
    if let Some(trace_id) = &ctx.xray_trace_id {
        context = context.with_xray_trace_id(trace_id.clone());
    }
    context
}

/// Handles one Lambda event with the adapter.
///
/// # Errors
///
/// Returns the adapter's error under generic adaptation.
pub async fn handle(
    adapter: &Adapter,
    event: LambdaEvent<Value>,
) -> Result<EncodedResult, lambda_runtime::Error> {
    let LambdaEvent { payload, context } = event;
    adapter
        .call(InboundEvent::new(payload), invocation_context(&context))
        .await
        .map_err(Into::into)
}

/// Runs the Lambda event loop until the runtime shuts down.
///
/// # Errors
///
/// Returns an error if the runtime API cannot be reached.
pub async fn run(adapter: Adapter) -> Result<(), lambda_runtime::Error> {
    tracing::info!(
        action = %adapter.contract().name(),
        event_type = %adapter.event_type(),
        "Starting Lambda event loop"
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let adapter = adapter.clone();
        async move { handle(&adapter, event).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdaptableAction, LifecycleOptions};
    use hermes_core::{ActionContract, FnGenericAction};
    use serde_json::json;

    fn lambda_context() -> Context {
        let mut ctx = Context::default();
        ctx.request_id = "req-9".to_string();
        ctx.invoked_function_arn = "arn:aws:lambda:eu-west-1:123:function:orders".to_string();
        ctx.deadline = 1_700_000_000_000;
        ctx
    }

    #[test]
    fn test_invocation_context() {
        let context = invocation_context(&lambda_context());
        assert_eq!(context.request_id(), "req-9");
        assert_eq!(context.deadline_ms(), Some(1_700_000_000_000));
        assert_eq!(
            context.invoked_function_arn(),
            Some("arn:aws:lambda:eu-west-1:123:function:orders")
        );
    }

    #[tokio::test]
    async fn test_handle_generic_event() {
        let action = AdaptableAction::generic(FnGenericAction::new(
            ActionContract::builder("echo-request-id").event_and_context().build(),
            |inputs| async move { Ok(json!({ "id": inputs.context["requestId"], "event": inputs.event })) },
        ));
        let adapter = Adapter::new(action, LifecycleOptions::new()).unwrap();

        let result = handle(&adapter, LambdaEvent::new(json!({"a": 1}), lambda_context()))
            .await
            .unwrap();

        assert_eq!(result.as_raw(), Some(&json!({"id": "req-9", "event": {"a": 1}})));
    }

    #[tokio::test]
    async fn test_handle_generic_failure_is_an_error() {
        let action = AdaptableAction::generic(FnGenericAction::new(
            ActionContract::builder("fails").event_and_context().build(),
            |_inputs| async { Err(anyhow::anyhow!("queue unavailable")) },
        ));
        let adapter = Adapter::new(action, LifecycleOptions::new()).unwrap();

        let err = handle(&adapter, LambdaEvent::new(json!({}), lambda_context()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("queue unavailable"));
    }
}
