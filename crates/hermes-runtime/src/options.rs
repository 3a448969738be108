//! Adapter options.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use hermes_config::{AdapterSettings, ConfigError, HermesConfig};
use hermes_core::EventType;
use hermes_extract::{Sent, ServerErrorContinuation, ServerErrorHook};
use hermes_middleware::CorsPolicy;

use crate::lifecycle::{HookKind, HookSequence, InvocationScope, LifecycleHook};

/// Options for building an [`Adapter`](crate::Adapter).
///
/// | Option | Default |
/// |--------|---------|
/// | `event_type` | inferred from the action |
/// | `cors` | none |
/// | `no_envelope` | `false` |
/// | `bootstrap` / `teardown` | no hooks |
/// | `on_server_error` | none |
/// | `config` | [`HermesConfig::default`] |
///
/// # Example
///
/// ```rust
/// use hermes_core::EventType;
/// use hermes_middleware::CorsPolicy;
/// use hermes_runtime::LifecycleOptions;
///
/// let options = LifecycleOptions::new()
///     .event_type(EventType::Http)
///     .cors(CorsPolicy::any_origin())
///     .bootstrap_named("warm", |_scope| async { Ok(()) })
///     .teardown(|_scope| async { Ok(()) });
///
/// assert_eq!(options.bootstrap_hooks().len(), 1);
/// ```
#[must_use]
pub struct LifecycleOptions {
    event_type: Option<EventType>,
    cors: Option<CorsPolicy>,
    no_envelope: bool,
    bootstrap: HookSequence,
    teardown: HookSequence,
    server_error: Option<ServerErrorHook>,
    config: Arc<HermesConfig>,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LifecycleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleOptions")
            .field("event_type", &self.event_type)
            .field("cors", &self.cors)
            .field("no_envelope", &self.no_envelope)
            .field("bootstrap", &self.bootstrap)
            .field("teardown", &self.teardown)
            .field("server_error", &self.server_error.is_some())
            .finish_non_exhaustive()
    }
}

impl LifecycleOptions {
    /// Creates options with every default.
    pub fn new() -> Self {
        Self {
            event_type: None,
            cors: None,
            no_envelope: false,
            bootstrap: HookSequence::new(HookKind::Bootstrap),
            teardown: HookSequence::new(HookKind::Teardown),
            server_error: None,
            config: Arc::new(HermesConfig::default()),
        }
    }

    /// Creates options from a loaded configuration.
    ///
    /// The `adapter` section seeds the event type, envelope mode and CORS
    /// policy, and the configuration is passed on to hooks and actions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSection`] if the `adapter` section is malformed.
    pub fn from_config(config: HermesConfig) -> Result<Self, ConfigError> {
        let settings = config.adapter_settings()?;
        Ok(Self::new().settings(&settings).config(config))
    }

    /// Applies adapter settings. Absent settings keep their current value.
    pub fn settings(mut self, settings: &AdapterSettings) -> Self {
        if let Some(event_type) = settings.event_type {
            self.event_type = Some(event_type);
        }
        if let Some(cors) = &settings.cors {
            self.cors = Some(cors.clone());
        }
        self.no_envelope = settings.no_envelope;
        self
    }

    /// Selects the adaptation mode explicitly.
    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Sets the CORS policy.
    pub fn cors(mut self, policy: CorsPolicy) -> Self {
        self.cors = Some(policy);
        self
    }

    /// Returns raw bodies instead of envelopes.
    pub fn no_envelope(mut self, no_envelope: bool) -> Self {
        self.no_envelope = no_envelope;
        self
    }

    /// Sets the configuration passed to hooks and actions.
    pub fn config(mut self, config: HermesConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Appends a bootstrap hook.
    pub fn bootstrap<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&mut InvocationScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.bootstrap = self.bootstrap.push(hook);
        self
    }

    /// Appends a named bootstrap hook.
    pub fn bootstrap_named<F, Fut>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut InvocationScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.bootstrap = self.bootstrap.push_named(name, hook);
        self
    }

    /// Appends a named bootstrap hook whose future holds the scope, for
    /// hooks that register services after awaiting.
    pub fn bootstrap_boxed<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut InvocationScope) -> BoxFuture<'a, anyhow::Result<()>>
            + Send
            + Sync
            + 'static,
    {
        self.bootstrap = self.bootstrap.push_boxed(name, hook);
        self
    }

    /// Appends several erased bootstrap hooks, in order.
    pub fn bootstrap_all<I, S>(mut self, hooks: I) -> Self
    where
        I: IntoIterator<Item = (S, LifecycleHook)>,
        S: Into<String>,
    {
        for (name, hook) in hooks {
            self.bootstrap = self.bootstrap.push_hook(name, hook);
        }
        self
    }

    /// Appends a teardown hook.
    pub fn teardown<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&mut InvocationScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.teardown = self.teardown.push(hook);
        self
    }

    /// Appends a named teardown hook.
    pub fn teardown_named<F, Fut>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut InvocationScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.teardown = self.teardown.push_named(name, hook);
        self
    }

    /// Appends a named teardown hook whose future holds the scope.
    pub fn teardown_boxed<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut InvocationScope) -> BoxFuture<'a, anyhow::Result<()>>
            + Send
            + Sync
            + 'static,
    {
        self.teardown = self.teardown.push_boxed(name, hook);
        self
    }

    /// Appends several erased teardown hooks, in order.
    pub fn teardown_all<I, S>(mut self, hooks: I) -> Self
    where
        I: IntoIterator<Item = (S, LifecycleHook)>,
        S: Into<String>,
    {
        for (name, hook) in hooks {
            self.teardown = self.teardown.push_hook(name, hook);
        }
        self
    }

    /// Installs the server-error hook used by
    /// [`Responder::server_error`](hermes_extract::Responder::server_error).
    ///
    /// The hook receives the error and a continuation that performs the
    /// default `500` JSON response.
    pub fn on_server_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(anyhow::Error, ServerErrorContinuation) -> anyhow::Result<Sent>
            + Send
            + Sync
            + 'static,
    {
        self.server_error = Some(Arc::new(hook));
        self
    }

    /// Returns the explicit event type, if any.
    #[must_use]
    pub fn event_type_override(&self) -> Option<EventType> {
        self.event_type
    }

    /// Returns the CORS policy.
    #[must_use]
    pub fn cors_policy(&self) -> Option<&CorsPolicy> {
        self.cors.as_ref()
    }

    /// Returns `true` if envelopes are disabled.
    #[must_use]
    pub fn is_no_envelope(&self) -> bool {
        self.no_envelope
    }

    /// Returns the bootstrap hooks.
    pub fn bootstrap_hooks(&self) -> &HookSequence {
        &self.bootstrap
    }

    /// Returns the teardown hooks.
    pub fn teardown_hooks(&self) -> &HookSequence {
        &self.teardown
    }

    /// Returns the configuration.
    #[must_use]
    pub fn configuration(&self) -> &HermesConfig {
        &self.config
    }

    pub(crate) fn into_parts(self) -> OptionParts {
        OptionParts {
            event_type: self.event_type,
            cors: self.cors,
            no_envelope: self.no_envelope,
            bootstrap: self.bootstrap,
            teardown: self.teardown,
            server_error: self.server_error,
            config: self.config,
        }
    }
}

pub(crate) struct OptionParts {
    pub(crate) event_type: Option<EventType>,
    pub(crate) cors: Option<CorsPolicy>,
    pub(crate) no_envelope: bool,
    pub(crate) bootstrap: HookSequence,
    pub(crate) teardown: HookSequence,
    pub(crate) server_error: Option<ServerErrorHook>,
    pub(crate) config: Arc<HermesConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = LifecycleOptions::default();
        assert_eq!(options.event_type_override(), None);
        assert!(options.cors_policy().is_none());
        assert!(!options.is_no_envelope());
        assert!(options.bootstrap_hooks().is_empty());
        assert!(options.teardown_hooks().is_empty());
    }

    #[test]
    fn test_hook_registration_order_and_names() {
        let options = LifecycleOptions::new()
            .bootstrap(|_| async { Ok(()) })
            .bootstrap_named("connect", |_| async { Ok(()) })
            .teardown_named("disconnect", |_| async { Ok(()) });

        let names: Vec<_> = options.bootstrap_hooks().names().collect();
        assert_eq!(names, vec!["bootstrap_0", "connect"]);
        assert_eq!(options.teardown_hooks().names().next(), Some("disconnect"));
    }

    #[test]
    fn test_hook_lists() {
        let hook: LifecycleHook = Arc::new(|_scope| Box::pin(async { Ok::<(), anyhow::Error>(()) }));
        let options = LifecycleOptions::new()
            .bootstrap_all([("a", Arc::clone(&hook)), ("b", Arc::clone(&hook))])
            .teardown_all([("c", hook)]);

        assert_eq!(options.bootstrap_hooks().len(), 2);
        assert_eq!(options.teardown_hooks().len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = HermesConfig::from_value(json!({
            "adapter": {
                "eventType": "generic",
                "noEnvelope": true,
                "cors": {"origin": "*"}
            },
            "datastores": {"default": {"url": "postgres://db"}}
        }));

        let options = LifecycleOptions::from_config(config).unwrap();
        assert_eq!(options.event_type_override(), Some(EventType::Generic));
        assert!(options.is_no_envelope());
        assert_eq!(options.cors_policy().unwrap().origin(), "*");
        assert_eq!(
            options.configuration().get("datastores.default.url"),
            Some(&json!("postgres://db"))
        );
    }

    #[test]
    fn test_from_config_rejects_bad_section() {
        let config = HermesConfig::from_value(json!({"adapter": {"eventType": 3}}));
        assert!(LifecycleOptions::from_config(config).is_err());
    }

    #[test]
    fn test_settings_keep_explicit_values_when_absent() {
        let options = LifecycleOptions::new()
            .event_type(EventType::Http)
            .cors(CorsPolicy::new("https://a.test"))
            .settings(&AdapterSettings::default());

        assert_eq!(options.event_type_override(), Some(EventType::Http));
        assert_eq!(options.cors_policy().unwrap().origin(), "https://a.test");
    }

    #[test]
    fn test_debug_hides_hooks() {
        let options = LifecycleOptions::new()
            .on_server_error(|_error, next: ServerErrorContinuation| Ok(next.respond()));
        let debug = format!("{options:?}");
        assert!(debug.contains("server_error: true"));
    }
}
