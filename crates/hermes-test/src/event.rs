//! Test event building.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hermes_core::event::fields;
use hermes_core::InboundEvent;
use serde::Serialize;
use serde_json::{Map, Value};

/// Entry points for building API Gateway proxy-shaped events.
pub struct TestEvent;

impl TestEvent {
    /// Creates a GET event.
    pub fn get(path: impl Into<String>) -> TestEventBuilder {
        TestEventBuilder::new("GET", path)
    }

    /// Creates a POST event.
    pub fn post(path: impl Into<String>) -> TestEventBuilder {
        TestEventBuilder::new("POST", path)
    }

    /// Creates a PUT event.
    pub fn put(path: impl Into<String>) -> TestEventBuilder {
        TestEventBuilder::new("PUT", path)
    }

    /// Creates a PATCH event.
    pub fn patch(path: impl Into<String>) -> TestEventBuilder {
        TestEventBuilder::new("PATCH", path)
    }

    /// Creates a DELETE event.
    pub fn delete(path: impl Into<String>) -> TestEventBuilder {
        TestEventBuilder::new("DELETE", path)
    }

    /// Creates an OPTIONS event.
    pub fn options(path: impl Into<String>) -> TestEventBuilder {
        TestEventBuilder::new("OPTIONS", path)
    }

    /// Wraps an arbitrary value, for generic actions.
    #[must_use]
    pub fn generic(value: Value) -> InboundEvent {
        InboundEvent::new(value)
    }
}

/// Builder for test events.
#[must_use]
#[derive(Debug, Clone)]
pub struct TestEventBuilder {
    method: String,
    path: String,
    path_parameters: Map<String, Value>,
    query: Map<String, Value>,
    headers: Map<String, Value>,
    body: Option<String>,
    is_base64_encoded: bool,
    authorization_token: Option<String>,
    authorizer: Option<Value>,
}

impl TestEventBuilder {
    /// Creates a new event builder.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            path_parameters: Map::new(),
            query: Map::new(),
            headers: Map::new(),
            body: None,
            is_base64_encoded: false,
            authorization_token: None,
            authorizer: None,
        }
    }

    /// Sets a path parameter.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .insert(name.into(), Value::String(value.into()));
        self
    }

    /// Sets a query string parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Sets a header, keeping the given casing.
    ///
    /// # Example
    ///
    /// ```
    /// use hermes_test::TestEvent;
    ///
    /// let event = TestEvent::get("/orders")
    ///     .header("Origin", "https://shop.test")
    ///     .build();
    ///
    /// assert_eq!(event.headers().unwrap()["Origin"], "https://shop.test");
    /// ```
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Sets the `Origin` header.
    pub fn origin(self, origin: impl Into<String>) -> Self {
        self.header("Origin", origin)
    }

    /// Sets the raw body text.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Sets the body to the JSON text of `value`.
    ///
    /// This also sets the `Content-Type` header to `application/json`.
    pub fn json<T: Serialize>(self, value: &T) -> Self {
        let text = serde_json::to_string(value).expect("JSON serialization should succeed");
        self.body(text).header("Content-Type", "application/json")
    }

    /// Sets a base64-encoded body and the `isBase64Encoded` flag.
    pub fn base64_body(mut self, raw: impl AsRef<[u8]>) -> Self {
        self.body = Some(STANDARD.encode(raw));
        self.is_base64_encoded = true;
        self
    }

    /// Sets the authorizer token.
    pub fn authorization_token(mut self, token: impl Into<String>) -> Self {
        self.authorization_token = Some(token.into());
        self
    }

    /// Sets `requestContext.authorizer`.
    pub fn authorizer(mut self, claims: Value) -> Self {
        self.authorizer = Some(claims);
        self
    }

    /// Builds the event.
    pub fn build(self) -> InboundEvent {
        let mut event = Map::new();
        event.insert(fields::HTTP_METHOD.into(), Value::String(self.method));
        event.insert(fields::PATH.into(), Value::String(self.path));
        event.insert(
            fields::PATH_PARAMETERS.into(),
            Value::Object(self.path_parameters),
        );
        event.insert(
            fields::QUERY_STRING_PARAMETERS.into(),
            Value::Object(self.query),
        );
        event.insert(fields::HEADERS.into(), Value::Object(self.headers));
        event.insert(
            fields::BODY.into(),
            self.body.map_or(Value::Null, Value::String),
        );
        event.insert(
            fields::IS_BASE64_ENCODED.into(),
            Value::Bool(self.is_base64_encoded),
        );

        if let Some(token) = self.authorization_token {
            event.insert(fields::AUTHORIZATION_TOKEN.into(), Value::String(token));
        }
        if let Some(claims) = self.authorizer {
            let mut request_context = Map::new();
            request_context.insert(fields::AUTHORIZER.into(), claims);
            event.insert(
                fields::REQUEST_CONTEXT.into(),
                Value::Object(request_context),
            );
        }

        InboundEvent::new(Value::Object(event))
    }
}

impl From<TestEventBuilder> for InboundEvent {
    fn from(builder: TestEventBuilder) -> Self {
        builder.build()
    }
}
