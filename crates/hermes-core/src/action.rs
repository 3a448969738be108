//! Generic-event actions.
//!
//! A [`GenericAction`] receives the raw event and context as its `event` and
//! `context` inputs and produces its own outcome: `Ok(output)` for the success
//! exit, `Err(error)` for the error exit. Request/response actions live in
//! `hermes-extract`.

use crate::contract::ActionContract;
use crate::di::ServiceContainer;
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Inputs handed to a generic action.
#[derive(Debug, Clone)]
pub struct GenericInputs {
    /// The raw inbound event.
    pub event: Value,
    /// The invocation context rendered as JSON.
    pub context: Value,
    /// Services registered by bootstrap hooks for this invocation.
    pub services: ServiceContainer,
}

/// An action adapted to generic (non-HTTP) events.
///
/// # Example
///
/// ```
/// use hermes_core::{ActionContract, GenericAction, GenericInputs};
/// use serde_json::{json, Value};
///
/// struct CountRecords {
///     contract: ActionContract,
/// }
///
/// impl GenericAction for CountRecords {
///     fn contract(&self) -> &ActionContract {
///         &self.contract
///     }
///
///     async fn run(&self, inputs: GenericInputs) -> anyhow::Result<Value> {
///         let n = inputs.event["Records"].as_array().map_or(0, Vec::len);
///         Ok(json!({ "processed": n }))
///     }
/// }
/// ```
pub trait GenericAction: Send + Sync + 'static {
    /// Returns the declared input contract.
    fn contract(&self) -> &ActionContract;

    /// Runs the action.
    fn run(&self, inputs: GenericInputs) -> impl Future<Output = anyhow::Result<Value>> + Send;
}

/// Object-safe form of [`GenericAction`], used to store actions behind `Arc<dyn _>`.
pub trait ErasedGenericAction: Send + Sync + 'static {
    /// Returns the declared input contract.
    fn contract(&self) -> &ActionContract;

    /// Runs the action, boxing the future.
    fn run_boxed(&self, inputs: GenericInputs) -> BoxFuture<'_, anyhow::Result<Value>>;
}

impl<A: GenericAction> ErasedGenericAction for A {
    fn contract(&self) -> &ActionContract {
        GenericAction::contract(self)
    }

    fn run_boxed(&self, inputs: GenericInputs) -> BoxFuture<'_, anyhow::Result<Value>> {
        Box::pin(self.run(inputs))
    }
}

/// A closure-based generic action.
///
/// # Example
///
/// ```
/// use hermes_core::{ActionContract, FnGenericAction};
///
/// let action = FnGenericAction::new(
///     ActionContract::builder("echo").event_and_context().build(),
///     |inputs| async move { Ok(inputs.event) },
/// );
/// ```
pub struct FnGenericAction<F> {
    contract: ActionContract,
    func: F,
}

impl<F, Fut> FnGenericAction<F>
where
    F: Fn(GenericInputs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    /// Creates a generic action from a contract and a closure.
    #[must_use]
    pub const fn new(contract: ActionContract, func: F) -> Self {
        Self { contract, func }
    }
}

impl<F> fmt::Debug for FnGenericAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGenericAction")
            .field("contract", &self.contract.name())
            .finish_non_exhaustive()
    }
}

impl<F, Fut> GenericAction for FnGenericAction<F>
where
    F: Fn(GenericInputs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    fn contract(&self) -> &ActionContract {
        &self.contract
    }

    fn run(&self, inputs: GenericInputs) -> impl Future<Output = anyhow::Result<Value>> + Send {
        (self.func)(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn inputs(event: Value) -> GenericInputs {
        GenericInputs {
            event,
            context: json!({"requestId": "r-1"}),
            services: ServiceContainer::new(),
        }
    }

    #[tokio::test]
    async fn test_fn_action_success() {
        let action = FnGenericAction::new(
            ActionContract::builder("echo").event_and_context().build(),
            |inputs: GenericInputs| async move { Ok(json!({ "echo": inputs.event })) },
        );

        let out = action.run(inputs(json!({"n": 1}))).await.unwrap();
        assert_eq!(out, json!({"echo": {"n": 1}}));
    }

    #[tokio::test]
    async fn test_fn_action_error_exit() {
        let action = FnGenericAction::new(
            ActionContract::builder("fail").event_and_context().build(),
            |_inputs: GenericInputs| async move { Err(anyhow::anyhow!("queue unavailable")) },
        );

        let err = action.run(inputs(Value::Null)).await.unwrap_err();
        assert_eq!(err.to_string(), "queue unavailable");
    }

    #[tokio::test]
    async fn test_erased_action() {
        let action: Arc<dyn ErasedGenericAction> = Arc::new(FnGenericAction::new(
            ActionContract::builder("ctx").event_and_context().build(),
            |inputs: GenericInputs| async move { Ok(inputs.context) },
        ));

        assert_eq!(action.contract().name(), "ctx");
        let out = action.run_boxed(inputs(Value::Null)).await.unwrap();
        assert_eq!(out["requestId"], "r-1");
    }

    #[test]
    fn test_debug_names_contract() {
        let action = FnGenericAction::new(
            ActionContract::builder("named").build(),
            |_inputs: GenericInputs| async move { Ok(Value::Null) },
        );
        assert!(format!("{action:?}").contains("named"));
    }
}
