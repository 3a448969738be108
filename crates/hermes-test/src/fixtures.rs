//! Ready-made actions and hooks for adapter tests.

use std::future::{ready, Ready};
use std::sync::{Arc, Mutex};

use hermes_core::{ActionContract, FnGenericAction, InputDef};
use hermes_extract::{FnHttpAction, RequestView, Responder};
use hermes_runtime::{AdaptableAction, InvocationScope};
use serde_json::{json, Value};

/// An HTTP action that answers every request with `body` as JSON.
#[must_use]
pub fn json_action(name: &str, body: Value) -> AdaptableAction {
    AdaptableAction::http(FnHttpAction::new(
        ActionContract::builder(name).build(),
        move |_req: RequestView, res: Responder| {
            let body = body.clone();
            async move { res.json(&body) }
        },
    ))
}

/// An HTTP action that declares `inputs` and answers with the resolved values.
///
/// Each value is reported with the source it resolved from, so tests can
/// check path, body and query precedence.
#[must_use]
pub fn echo_params_action(name: &str, inputs: &[&str]) -> AdaptableAction {
    let contract = inputs
        .iter()
        .fold(ActionContract::builder(name), |builder, input| {
            builder.input(InputDef::new(*input, json!("")))
        })
        .build();
    let declared = contract.clone();

    AdaptableAction::http(FnHttpAction::new(
        contract,
        move |req: RequestView, res: Responder| {
            let params = req.params_for(&declared);
            let sources: serde_json::Map<String, Value> = params
                .keys()
                .filter_map(|key| {
                    req.param_source(key)
                        .map(|source| (key.clone(), json!(source.as_str())))
                })
                .collect();
            async move { res.json(&json!({ "params": params, "sources": sources })) }
        },
    ))
}

/// A generic action that returns `{"event": .., "context": ..}`.
#[must_use]
pub fn generic_echo_action(name: &str) -> AdaptableAction {
    AdaptableAction::generic(FnGenericAction::new(
        ActionContract::builder(name).event_and_context().build(),
        |inputs| async move { Ok(json!({ "event": inputs.event, "context": inputs.context })) },
    ))
}

/// A generic action that always fails with `message`.
#[must_use]
pub fn failing_generic_action(name: &str, message: &str) -> AdaptableAction {
    let message = message.to_string();
    AdaptableAction::generic(FnGenericAction::new(
        ActionContract::builder(name).event_and_context().build(),
        move |_inputs| {
            let message = message.clone();
            async move { Err(anyhow::anyhow!(message)) }
        },
    ))
}

/// Records the order lifecycle hooks run in.
///
/// # Example
///
/// ```ignore
/// let recorder = HookRecorder::new();
/// let options = LifecycleOptions::new()
///     .bootstrap_named("db", recorder.hook("bootstrap:db"))
///     .teardown_named("db", recorder.failing("teardown:db", "close failed"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HookRecorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl HookRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a hook that records `label` and succeeds.
    pub fn hook(
        &self,
        label: &str,
    ) -> impl Fn(&mut InvocationScope) -> Ready<anyhow::Result<()>> + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        let label = label.to_string();
        move |_scope| {
            calls.lock().expect("recorder lock poisoned").push(label.clone());
            ready(Ok(()))
        }
    }

    /// Returns a hook that records `label` and fails with `message`.
    pub fn failing(
        &self,
        label: &str,
        message: &str,
    ) -> impl Fn(&mut InvocationScope) -> Ready<anyhow::Result<()>> + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        let label = label.to_string();
        let message = message.to_string();
        move |_scope| {
            calls.lock().expect("recorder lock poisoned").push(label.clone());
            ready(Err(anyhow::anyhow!(message.clone())))
        }
    }

    /// Records `label` directly, for use inside actions.
    pub fn record(&self, label: &str) {
        self.calls
            .lock()
            .expect("recorder lock poisoned")
            .push(label.to_string());
    }

    /// Returns the recorded labels in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("recorder lock poisoned").clone()
    }
}
