//! The invocation orchestrator.
//!
//! An [`Adapter`] owns one action and its options. Each call runs:
//!
//! ```text
//! INIT -> BOOTSTRAPPING -> INVOKING -> TEARING_DOWN -> DONE
//!              |                            ^
//!              +----- (bootstrap failed) ---+
//! ```
//!
//! Teardown hooks run after every invocation, including one whose bootstrap
//! or action failed. A teardown failure is appended to any earlier failure.
//!
//! How failures reach the caller depends on the event type:
//!
//! | Event type | Action result | Failure |
//! |------------|---------------|---------|
//! | `http` | `Ok(envelope)` or `Ok(raw body)` | `Ok` 500 result carrying `{event, error}` |
//! | `generic` | `Ok(raw output)` | `Err(error)` |

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use hermes_config::HermesConfig;
use hermes_core::{
    ActionContract, EventType, GenericInputs, HermesError, HermesResult, InboundEvent,
    InvocationContext,
};
use hermes_extract::{RequestView, Responder, ServerErrorHook};
use hermes_middleware::{EncodedResult, ResponseEncoder};
use hermes_telemetry::{record_invocation, InFlightGuard, Outcome};
use tracing::Instrument;

use crate::dispatch::AdaptableAction;
use crate::lifecycle::{HookSequence, InvocationScope, Phase};
use crate::options::LifecycleOptions;

/// Adapts one action to the serverless invocation contract.
///
/// Cloning is cheap; clones share the action and hooks.
///
/// # Example
///
/// ```rust
/// use hermes_core::{ActionContract, InboundEvent, InvocationContext};
/// use hermes_extract::{FnHttpAction, RequestView, Responder};
/// use hermes_runtime::{AdaptableAction, Adapter, LifecycleOptions};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let action = AdaptableAction::http(FnHttpAction::new(
///     ActionContract::builder("health").build(),
///     |_req: RequestView, res: Responder| async move { res.json(&json!({"ok": true})) },
/// ));
/// let adapter = Adapter::new(action, LifecycleOptions::new()).unwrap();
///
/// let result = adapter
///     .call(InboundEvent::new(json!({"path": "/health"})), InvocationContext::new("r-1"))
///     .await
///     .unwrap();
///
/// assert_eq!(result.status_code(), Some(200));
/// # });
/// ```
#[derive(Clone)]
pub struct Adapter {
    inner: Arc<AdapterInner>,
}

struct AdapterInner {
    action: AdaptableAction,
    event_type: EventType,
    no_envelope: bool,
    encoder: ResponseEncoder,
    bootstrap: HookSequence,
    teardown: HookSequence,
    server_error: Option<ServerErrorHook>,
    config: Arc<HermesConfig>,
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("action", &self.inner.action)
            .field("event_type", &self.inner.event_type)
            .field("no_envelope", &self.inner.no_envelope)
            .field("bootstrap", &self.inner.bootstrap)
            .field("teardown", &self.inner.teardown)
            .finish_non_exhaustive()
    }
}

impl Adapter {
    /// Builds an adapter, resolving the event type and validating the
    /// action's contract.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::Configuration`] if the action cannot be adapted
    /// with these options. No adapter is returned in that case.
    pub fn new(action: impl Into<AdaptableAction>, options: LifecycleOptions) -> HermesResult<Self> {
        let action = action.into();
        let parts = options.into_parts();
        let event_type = action.resolve(parts.event_type)?;

        tracing::debug!(
            action = %action.contract().name(),
            event_type = %event_type,
            bootstrap_hooks = parts.bootstrap.len(),
            teardown_hooks = parts.teardown.len(),
            no_envelope = parts.no_envelope,
            "Adapter built"
        );

        Ok(Self {
            inner: Arc::new(AdapterInner {
                action,
                event_type,
                no_envelope: parts.no_envelope,
                encoder: ResponseEncoder::new(parts.cors, parts.no_envelope),
                bootstrap: parts.bootstrap,
                teardown: parts.teardown,
                server_error: parts.server_error,
                config: parts.config,
            }),
        })
    }

    /// Returns the resolved event type.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.inner.event_type
    }

    /// Returns the adapted action's contract.
    #[must_use]
    pub fn contract(&self) -> &ActionContract {
        self.inner.action.contract()
    }

    /// Returns the configuration handed to hooks and actions.
    #[must_use]
    pub fn config(&self) -> &HermesConfig {
        &self.inner.config
    }

    /// Runs one invocation and returns its completion result.
    ///
    /// # Errors
    ///
    /// Under generic adaptation, returns the bootstrap, action or teardown
    /// failure. Under HTTP adaptation failures are encoded into the `Ok`
    /// result and this never errors.
    pub async fn call(
        &self,
        event: impl Into<InboundEvent>,
        context: InvocationContext,
    ) -> HermesResult<EncodedResult> {
        let _in_flight = InFlightGuard::new();
        let started = Instant::now();
        let span = tracing::info_span!(
            "hermes.invoke",
            request_id = %context.request_id(),
            event_type = %self.inner.event_type,
            action = %self.inner.action.contract().name(),
        );

        let (result, outcome) = self
            .run(event.into(), context)
            .instrument(span.clone())
            .await;

        let elapsed = started.elapsed();
        record_invocation(self.inner.event_type.as_str(), outcome, elapsed);
        span.in_scope(|| {
            tracing::info!(
                phase = %Phase::Done,
                outcome = %outcome,
                status_code = ?result.as_ref().ok().and_then(EncodedResult::status_code),
                duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "Invocation completed"
            );
        });

        result
    }

    /// Runs one invocation and hands its result to `callback`.
    ///
    /// The callback is called exactly once, after teardown.
    pub async fn invoke<F>(&self, event: impl Into<InboundEvent>, context: InvocationContext, callback: F)
    where
        F: FnOnce(HermesResult<EncodedResult>) + Send,
    {
        let result = self.call(event, context).await;
        callback(result);
    }

    async fn run(
        &self,
        event: InboundEvent,
        context: InvocationContext,
    ) -> (HermesResult<EncodedResult>, Outcome) {
        let inner = &*self.inner;
        let mut scope = InvocationScope::new(
            Arc::clone(&inner.config),
            Arc::new(context),
            Arc::new(event),
        );
        scope.register(Arc::clone(&inner.config));

        let primary = match inner.bootstrap.run(&mut scope).await {
            Ok(()) => self.invoke_action(&mut scope).await,
            Err(error) => {
                tracing::warn!(phase = %Phase::Bootstrapping, "Bootstrap failed, skipping action");
                Err(error)
            }
        };

        let completed = match (primary, inner.teardown.run(&mut scope).await) {
            (Ok(result), Ok(())) => Ok(result),
            (Ok(_), Err(teardown)) => Err(teardown),
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(teardown)) => Err(error.with_teardown_failure(teardown)),
        };
        scope.set_phase(Phase::Done);

        match completed {
            Ok(result) => (Ok(result), Outcome::Success),
            Err(error) => {
                tracing::error!(
                    error = %error,
                    kind = error.kind().as_str(),
                    "Invocation failed"
                );
                match inner.event_type {
                    EventType::Http => (
                        Ok(inner.encoder.failure(scope.event(), &error)),
                        Outcome::Failure,
                    ),
                    EventType::Generic => (Err(error), Outcome::Failure),
                }
            }
        }
    }

    async fn invoke_action(&self, scope: &mut InvocationScope) -> HermesResult<EncodedResult> {
        let inner = &*self.inner;
        scope.set_phase(Phase::Invoking);
        tracing::debug!(phase = %Phase::Invoking, "Invoking action");

        match &inner.action {
            AdaptableAction::Http(action) => {
                let req = RequestView::new(scope.shared_event(), scope.shared_context())
                    .with_services(scope.services().clone());
                let res = Responder::new(inner.no_envelope)
                    .with_server_error_hook(inner.server_error.clone());

                let sent = guarded(async { action.handle_boxed(req, res).await }).await??;
                tracing::debug!(status_code = sent.status_code(), "Action responded");

                Ok(inner.encoder.encode(sent, scope.event()))
            }
            AdaptableAction::Generic(action) => {
                let inputs = GenericInputs {
                    event: scope.event().as_value().clone(),
                    context: scope.context().to_value(),
                    services: scope.services().clone(),
                };

                let output = guarded(async { action.run_boxed(inputs).await })
                    .await?
                    .map_err(HermesError::handler)?;

                Ok(EncodedResult::Raw(output))
            }
        }
    }
}

/// Runs a future, turning a panic into [`HermesError::HandlerInternal`].
async fn guarded<T>(future: impl Future<Output = T>) -> HermesResult<T> {
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|payload| HermesError::from_panic(&*payload))
}
