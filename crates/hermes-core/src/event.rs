//! Inbound platform events.
//!
//! [`InboundEvent`] wraps the JSON record delivered by the serverless platform.
//! It is never mutated; accessors read the API Gateway proxy fields leniently,
//! so a field with an unexpected type reads as absent.

use crate::error::HermesError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Field names of the proxy event shape.
pub mod fields {
    /// Raw request body.
    pub const BODY: &str = "body";
    /// Whether `body` is base64 encoded.
    pub const IS_BASE64_ENCODED: &str = "isBase64Encoded";
    /// HTTP method.
    pub const HTTP_METHOD: &str = "httpMethod";
    /// Request path.
    pub const PATH: &str = "path";
    /// Path parameters mapping.
    pub const PATH_PARAMETERS: &str = "pathParameters";
    /// Query string parameters mapping.
    pub const QUERY_STRING_PARAMETERS: &str = "queryStringParameters";
    /// Request headers mapping.
    pub const HEADERS: &str = "headers";
    /// Token passed to custom authorizers.
    pub const AUTHORIZATION_TOKEN: &str = "authorizationToken";
    /// Request context record.
    pub const REQUEST_CONTEXT: &str = "requestContext";
    /// Authorizer claims inside the request context.
    pub const AUTHORIZER: &str = "authorizer";
}

/// How events are adapted for the action.
///
/// # Example
///
/// ```
/// use hermes_core::EventType;
///
/// assert_eq!(EventType::default(), EventType::Http);
/// assert_eq!("generic".parse::<EventType>().unwrap(), EventType::Generic);
/// assert_eq!(EventType::Http.to_string(), "http");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// HTTP-shaped events, adapted to a request view and responder.
    #[default]
    Http,
    /// Any other event, passed to the action as raw `event`/`context` inputs.
    Generic,
}

impl EventType {
    /// Returns the configuration name of the event type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = HermesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Self::Http),
            "generic" => Ok(Self::Generic),
            other => Err(HermesError::configuration(format!(
                "unknown event type '{other}' (expected 'http' or 'generic')"
            ))),
        }
    }
}

/// The opaque event delivered with one invocation.
///
/// # Example
///
/// ```
/// use hermes_core::InboundEvent;
/// use serde_json::json;
///
/// let event = InboundEvent::new(json!({
///     "httpMethod": "GET",
///     "path": "/users/7",
///     "pathParameters": {"id": "7"}
/// }));
///
/// assert_eq!(event.http_method(), Some("GET"));
/// assert_eq!(event.path_parameters().unwrap()["id"], "7");
/// assert!(event.body().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InboundEvent(Value);

impl InboundEvent {
    /// Wraps a raw event value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the raw event value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the event and returns the raw value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns the raw body, if it is a string.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.str_field(fields::BODY)
    }

    /// Returns `true` if the platform marked the body as base64 encoded.
    #[must_use]
    pub fn is_base64_encoded(&self) -> bool {
        self.0
            .get(fields::IS_BASE64_ENCODED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn http_method(&self) -> Option<&str> {
        self.str_field(fields::HTTP_METHOD)
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.str_field(fields::PATH)
    }

    /// Returns the path parameters mapping.
    #[must_use]
    pub fn path_parameters(&self) -> Option<&Map<String, Value>> {
        self.map_field(fields::PATH_PARAMETERS)
    }

    /// Returns the query string parameters mapping.
    #[must_use]
    pub fn query_string_parameters(&self) -> Option<&Map<String, Value>> {
        self.map_field(fields::QUERY_STRING_PARAMETERS)
    }

    /// Returns the headers mapping, with the casing the platform delivered.
    #[must_use]
    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.map_field(fields::HEADERS)
    }

    /// Returns the custom-authorizer token.
    #[must_use]
    pub fn authorization_token(&self) -> Option<&str> {
        self.str_field(fields::AUTHORIZATION_TOKEN)
    }

    /// Returns `requestContext.authorizer`, if present.
    #[must_use]
    pub fn authorizer(&self) -> Option<&Value> {
        self.0
            .get(fields::REQUEST_CONTEXT)
            .and_then(|ctx| ctx.get(fields::AUTHORIZER))
            .filter(|value| !value.is_null())
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    fn map_field(&self, name: &str) -> Option<&Map<String, Value>> {
        self.0.get(name).and_then(Value::as_object)
    }
}

impl From<Value> for InboundEvent {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<InboundEvent> for Value {
    fn from(event: InboundEvent) -> Self {
        event.0
    }
}
