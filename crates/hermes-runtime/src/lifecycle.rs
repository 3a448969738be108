//! Bootstrap and teardown hooks around one invocation.
//!
//! Hooks receive a mutable [`InvocationScope`] holding the configuration,
//! the raw event and context, and the per-invocation service container.
//! Services registered by a bootstrap hook are visible to the action and to
//! every teardown hook of the same invocation.
//!
//! # Example
//!
//! ```rust
//! use hermes_runtime::{HookSequence, InvocationScope, HookKind};
//! use std::sync::Arc;
//!
//! struct Pool(&'static str);
//!
//! let bootstrap = HookSequence::new(HookKind::Bootstrap)
//!     .push_boxed("connect", |scope: &mut InvocationScope| {
//!         Box::pin(async move {
//!             scope.register(Arc::new(Pool("postgres")));
//!             Ok(())
//!         })
//!     });
//!
//! assert_eq!(bootstrap.len(), 1);
//! ```
//!
//! # Execution Order
//!
//! Both bootstrap and teardown hooks run one at a time in registration order.
//! The first failing hook stops its sequence; later hooks do not run.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use hermes_config::HermesConfig;
use hermes_core::di::{InjectionError, ServiceContainer};
use hermes_core::{panic_message, HermesError, HermesResult, InboundEvent, InvocationContext};
use hermes_telemetry::record_hook_failure;

/// Invocation phases, in order.
///
/// `Bootstrapping` is followed by `TearingDown` directly when a bootstrap
/// hook fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing has run yet.
    Init,
    /// Bootstrap hooks are running.
    Bootstrapping,
    /// The action is running.
    Invoking,
    /// Teardown hooks are running.
    TearingDown,
    /// The completion result is final.
    Done,
}

impl Phase {
    /// Returns the phase name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Bootstrapping => "bootstrapping",
            Self::Invoking => "invoking",
            Self::TearingDown => "tearing_down",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared by the hooks and the action of one invocation.
pub struct InvocationScope {
    config: Arc<HermesConfig>,
    context: Arc<InvocationContext>,
    event: Arc<InboundEvent>,
    services: ServiceContainer,
    phase: Phase,
}

impl InvocationScope {
    /// Creates a scope with an empty service container.
    #[must_use]
    pub fn new(
        config: Arc<HermesConfig>,
        context: Arc<InvocationContext>,
        event: Arc<InboundEvent>,
    ) -> Self {
        Self {
            config,
            context,
            event,
            services: ServiceContainer::new(),
            phase: Phase::Init,
        }
    }

    /// Returns the adapter configuration.
    #[must_use]
    pub fn config(&self) -> &HermesConfig {
        &self.config
    }

    /// Returns the invocation context.
    #[must_use]
    pub fn context(&self) -> &InvocationContext {
        &self.context
    }

    /// Returns the inbound event.
    #[must_use]
    pub fn event(&self) -> &InboundEvent {
        &self.event
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Registers a service for the rest of this invocation.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.services.register(service);
    }

    /// Resolves a service registered earlier in this invocation.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        self.services.resolve_required::<T>()
    }

    /// Returns the service container.
    #[must_use]
    pub fn services(&self) -> &ServiceContainer {
        &self.services
    }

    /// Returns the service container mutably.
    pub fn services_mut(&mut self) -> &mut ServiceContainer {
        &mut self.services
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn shared_event(&self) -> Arc<InboundEvent> {
        Arc::clone(&self.event)
    }

    pub(crate) fn shared_context(&self) -> Arc<InvocationContext> {
        Arc::clone(&self.context)
    }
}

impl fmt::Debug for InvocationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationScope")
            .field("request_id", &self.context.request_id())
            .field("phase", &self.phase)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

/// A bootstrap or teardown hook.
///
/// Takes the invocation scope and returns a future that borrows it.
pub type LifecycleHook = Arc<
    dyn for<'a> Fn(&'a mut InvocationScope) -> BoxFuture<'a, anyhow::Result<()>> + Send + Sync,
>;

/// Which sequence a hook belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Runs before the action.
    Bootstrap,
    /// Runs after the action.
    Teardown,
}

impl HookKind {
    /// Returns the label used in hook names, logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Teardown => "teardown",
        }
    }

    const fn phase(self) -> Phase {
        match self {
            Self::Bootstrap => Phase::Bootstrapping,
            Self::Teardown => Phase::TearingDown,
        }
    }

    fn error(self, step: &str, cause: anyhow::Error) -> HermesError {
        match self {
            Self::Bootstrap => HermesError::bootstrap(step, cause),
            Self::Teardown => HermesError::teardown(step, cause),
        }
    }
}

/// An ordered list of named hooks.
#[derive(Clone)]
#[must_use]
pub struct HookSequence {
    kind: HookKind,
    hooks: Vec<(String, LifecycleHook)>,
}

impl fmt::Debug for HookSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSequence")
            .field("kind", &self.kind)
            .field("hooks", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl HookSequence {
    /// Creates an empty sequence.
    pub const fn new(kind: HookKind) -> Self {
        Self {
            kind,
            hooks: Vec::new(),
        }
    }

    /// Appends a hook whose future does not borrow the scope.
    ///
    /// The hook is named `bootstrap_<n>` or `teardown_<n>`.
    pub fn push<F, Fut>(self, hook: F) -> Self
    where
        F: Fn(&mut InvocationScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let name = format!("{}_{}", self.kind.as_str(), self.hooks.len());
        self.push_named(name, hook)
    }

    /// Appends a named hook whose future does not borrow the scope.
    pub fn push_named<F, Fut>(self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut InvocationScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let hook: LifecycleHook = Arc::new(move |scope| Box::pin(hook(scope)));
        self.push_hook(name, hook)
    }

    /// Appends a named hook whose future may hold the scope across awaits.
    pub fn push_boxed<F>(self, name: impl Into<String>, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut InvocationScope) -> BoxFuture<'a, anyhow::Result<()>>
            + Send
            + Sync
            + 'static,
    {
        self.push_hook(name, Arc::new(hook))
    }

    /// Appends an already-erased hook.
    pub fn push_hook(mut self, name: impl Into<String>, hook: LifecycleHook) -> Self {
        self.hooks.push((name.into(), hook));
        self
    }

    /// Returns the sequence kind.
    #[must_use]
    pub const fn kind(&self) -> HookKind {
        self.kind
    }

    /// Returns the number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns `true` if no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns the hook names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|(name, _)| name.as_str())
    }

    /// Runs the hooks in order, stopping at the first failure.
    ///
    /// A panicking hook counts as a failed hook.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::Bootstrap`] or [`HermesError::Teardown`] naming
    /// the failed hook.
    pub async fn run(&self, scope: &mut InvocationScope) -> HermesResult<()> {
        scope.set_phase(self.kind.phase());

        for (name, hook) in &self.hooks {
            tracing::debug!(hook = %name, phase = %scope.phase(), "Running lifecycle hook");

            let outcome = AssertUnwindSafe(async { hook(scope).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(anyhow::anyhow!("panic: {}", panic_message(&*payload)))
                });

            match outcome {
                Ok(()) => {
                    tracing::debug!(hook = %name, "Lifecycle hook completed");
                }
                Err(e) => {
                    tracing::error!(hook = %name, phase = %scope.phase(), error = %format!("{e:#}"), "Lifecycle hook failed");
                    record_hook_failure(self.kind.as_str());
                    return Err(self.kind.error(name, e));
                }
            }
        }
        Ok(())
    }
}
