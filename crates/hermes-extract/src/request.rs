//! Read-only request view over an inbound event.
//!
//! A [`RequestView`] is derived once per invocation from the raw event. It
//! never fails to build: a malformed body degrades to `null` and missing
//! mappings behave as empty.
//!
//! # Parameter Resolution
//!
//! [`RequestView::param`] looks a key up in a fixed order and returns the
//! first present (non-null) value:
//!
//! | Order | Source | Event field |
//! |-------|--------|-------------|
//! | 1 | [`ParamSource::Path`] | `pathParameters` |
//! | 2 | [`ParamSource::Body`] | parsed `body` |
//! | 3 | [`ParamSource::Query`] | `queryStringParameters` |

use crate::body::parse_body;
use crate::header::HeaderIndex;
use hermes_core::di::{InjectionError, ServiceContainer};
use hermes_core::{ActionContract, InboundEvent, InvocationContext};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Where a resolved parameter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// Path parameters.
    Path,
    /// A top-level field of the parsed body.
    Body,
    /// Query string parameters.
    Query,
}

impl ParamSource {
    /// All sources in resolution order.
    pub const ORDER: [Self; 3] = [Self::Path, Self::Body, Self::Query];

    /// Returns the source name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Body => "body",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request abstraction handed to HTTP actions.
///
/// # Example
///
/// ```
/// use hermes_core::{InboundEvent, InvocationContext};
/// use hermes_extract::RequestView;
/// use serde_json::json;
///
/// let event = InboundEvent::new(json!({
///     "httpMethod": "POST",
///     "path": "/orders/42",
///     "pathParameters": {"id": "42"},
///     "queryStringParameters": {"id": "7", "verbose": "1"},
///     "body": "{\"id\": 9, \"qty\": 3}",
///     "headers": {"Content-Type": "application/json"}
/// }));
/// let req = RequestView::new(event, InvocationContext::new("r-1"));
///
/// assert_eq!(req.param("id"), Some(&json!("42")));
/// assert_eq!(req.param("qty"), Some(&json!(3)));
/// assert_eq!(req.param("verbose"), Some(&json!("1")));
/// assert_eq!(req.param("missing"), None);
/// assert_eq!(req.get("content-type", "text/plain"), "application/json");
/// ```
#[derive(Clone)]
pub struct RequestView {
    event: Arc<InboundEvent>,
    context: Arc<InvocationContext>,
    body: Value,
    headers: HeaderIndex,
    services: ServiceContainer,
}

impl RequestView {
    /// Builds the view, parsing the body and indexing headers.
    #[must_use]
    pub fn new(event: impl Into<Arc<InboundEvent>>, context: impl Into<Arc<InvocationContext>>) -> Self {
        let event = event.into();
        let body = parse_body(&event);
        let headers = HeaderIndex::from_map(event.headers());
        Self {
            event,
            context: context.into(),
            body,
            headers,
            services: ServiceContainer::new(),
        }
    }

    /// Attaches the services registered for this invocation.
    #[must_use]
    pub fn with_services(mut self, services: ServiceContainer) -> Self {
        self.services = services;
        self
    }

    /// Resolves a parameter: path, then body, then query.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.lookup(key).map(|(value, _)| value)
    }

    /// Resolves a parameter and reports which source supplied it.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<(&Value, ParamSource)> {
        ParamSource::ORDER.into_iter().find_map(|source| {
            self.source_map(source)
                .and_then(|map| map.get(key))
                .filter(|value| !value.is_null())
                .map(|value| (value, source))
        })
    }

    /// Returns the source a parameter resolves from.
    #[must_use]
    pub fn param_source(&self, key: &str) -> Option<ParamSource> {
        self.lookup(key).map(|(_, source)| source)
    }

    /// Resolves a parameter as a string slice, if it is a string.
    #[must_use]
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.param(key).and_then(Value::as_str)
    }

    /// Resolves every input the contract declares, in declaration order.
    ///
    /// Inputs that resolve nowhere are omitted from the returned map.
    #[must_use]
    pub fn params_for(&self, contract: &ActionContract) -> Map<String, Value> {
        contract
            .input_names()
            .filter_map(|name| self.param(name).map(|v| (name.to_string(), v.clone())))
            .collect()
    }

    fn source_map(&self, source: ParamSource) -> Option<&Map<String, Value>> {
        match source {
            ParamSource::Path => self.event.path_parameters(),
            ParamSource::Body => self.body.as_object(),
            ParamSource::Query => self.event.query_string_parameters(),
        }
    }

    /// Returns the query string parameters.
    #[must_use]
    pub fn query(&self) -> Option<&Map<String, Value>> {
        self.event.query_string_parameters()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.event.http_method()
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.event.path()
    }

    /// Returns the headers with their original casing.
    #[must_use]
    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.event.headers()
    }

    /// Looks up a header by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Looks up a header by name, ignoring case, with a fallback.
    #[must_use]
    pub fn get<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.header(name).unwrap_or(default)
    }

    /// Returns the authorizer token (custom authorizer events).
    #[must_use]
    pub fn authorization_token(&self) -> Option<&str> {
        self.event.authorization_token()
    }

    /// Returns the resolved authorizer claims, if present.
    #[must_use]
    pub fn auth(&self) -> Option<&Value> {
        self.event.authorizer()
    }

    /// Returns the parsed body (`null` when absent or malformed).
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the raw inbound event.
    #[must_use]
    pub fn event(&self) -> &InboundEvent {
        &self.event
    }

    /// Returns the invocation context.
    #[must_use]
    pub fn context(&self) -> &InvocationContext {
        &self.context
    }

    /// Returns the services registered for this invocation.
    #[must_use]
    pub fn services(&self) -> &ServiceContainer {
        &self.services
    }

    /// Resolves a registered service by type.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        self.services.resolve_required()
    }
}

impl fmt::Debug for RequestView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestView")
            .field("method", &self.method())
            .field("path", &self.path())
            .field("request_id", &self.context.request_id())
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}
