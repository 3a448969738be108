//! Response accumulation and terminal send operations.
//!
//! A [`Responder`] accumulates status, headers and a response context through
//! chainable setters. Every terminal operation consumes it and returns a
//! [`Sent`], so a response can be sent at most once and nothing can mutate it
//! afterwards.
//!
//! # Terminal Operations
//!
//! | Operation | Content-Type | Body |
//! |-----------|--------------|------|
//! | [`Responder::json`] | `application/json` | JSON text (raw value without envelope) |
//! | [`Responder::send`] | depends on value | numbers, booleans and `null` unchanged; strings as-is (`text/html`); other values as JSON |
//! | [`Responder::send_status`] | none | standard reason phrase |
//! | [`Responder::server_error`] | `application/json` | hook output, or the error rendered as JSON |
//! | [`Responder::bad_request`] / [`forbidden`](Responder::forbidden) / [`not_found`](Responder::not_found) | none | reason phrase for 400 / 403 / 404 |
//!
//! # Example
//!
//! ```
//! use hermes_extract::response::Responder;
//! use serde_json::json;
//!
//! let sent = Responder::new(false)
//!     .status(201)
//!     .set("Location", "/orders/42")
//!     .json(&json!({"id": 42}))
//!     .unwrap();
//!
//! assert_eq!(sent.status_code(), 201);
//! assert_eq!(sent.header("content-type"), Some("application/json"));
//! assert_eq!(sent.body(), &json!("{\"id\":42}"));
//! ```

use hermes_core::{failure_detail, HermesError};
use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Media types set by the terminal operations.
pub mod media {
    /// Structured-data media type.
    pub const JSON: &str = "application/json";
    /// Text media type used for string bodies.
    pub const TEXT: &str = "text/html";
}

/// Header names written by the adapter.
pub mod header_names {
    /// `Content-Type`.
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// `Content-Length`.
    pub const CONTENT_LENGTH: &str = "Content-Length";
}

/// Result of an HTTP action: the sent response, or an adapter-level failure.
pub type ResponseResult = Result<Sent, HermesError>;

/// Hook that takes over [`Responder::server_error`].
///
/// The hook receives the error and a [`ServerErrorContinuation`] that performs
/// the default behavior. If the hook returns an error or panics, the response
/// falls back to a 500 whose body is the original error's failure detail.
pub type ServerErrorHook =
    Arc<dyn Fn(anyhow::Error, ServerErrorContinuation) -> anyhow::Result<Sent> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
struct ResponseState {
    status_code: u16,
    headers: HashMap<String, String>,
    context: Value,
}

impl Default for ResponseState {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: HashMap::new(),
            context: Value::Object(Map::new()),
        }
    }
}

/// Response builder owned by one invocation.
///
/// A responder cannot be cloned, so each invocation sends exactly one
/// response built through it.
///
/// ```compile_fail
/// use hermes_extract::response::Responder;
///
/// let responder = Responder::new(false);
/// let copy = responder.clone();
/// ```
pub struct Responder {
    state: ResponseState,
    no_envelope: bool,
    server_error_hook: Option<ServerErrorHook>,
}

impl Responder {
    /// Creates a responder with status 200, no headers and an empty context.
    ///
    /// With `no_envelope` set, structured bodies are kept as raw values
    /// instead of being serialized to JSON text.
    #[must_use]
    pub fn new(no_envelope: bool) -> Self {
        Self {
            state: ResponseState::default(),
            no_envelope,
            server_error_hook: None,
        }
    }

    /// Installs a server-error hook.
    #[must_use]
    pub fn with_server_error_hook(mut self, hook: Option<ServerErrorHook>) -> Self {
        self.server_error_hook = hook;
        self
    }

    /// Sets a header. Names are stored exactly as given.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.state.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the status code.
    #[must_use]
    pub fn status(mut self, code: u16) -> Self {
        self.state.status_code = code;
        self
    }

    /// Attaches a response context (authorizer-style outputs).
    #[must_use]
    pub fn context(mut self, context: Value) -> Self {
        self.state.context = context;
        self
    }

    /// Returns the status code set so far.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.state.status_code
    }

    /// Returns a header set so far, by exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.state.headers.get(name).map(String::as_str)
    }

    /// Returns `true` if structured bodies are passed through unserialized.
    #[must_use]
    pub fn is_no_envelope(&self) -> bool {
        self.no_envelope
    }

    /// Sends `output` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::Serialization`] if `output` cannot be
    /// represented as JSON.
    pub fn json<T: Serialize + ?Sized>(self, output: &T) -> ResponseResult {
        let value = serde_json::to_value(output)?;
        Ok(self.finish_json(value))
    }

    /// Sends `output`, choosing the content type from its shape.
    #[must_use]
    pub fn send(self, output: impl Into<Value>) -> Sent {
        match output.into() {
            passthrough @ (Value::Null | Value::Bool(_) | Value::Number(_)) => {
                self.finish(passthrough)
            }
            Value::String(text) => self
                .set(header_names::CONTENT_TYPE, media::TEXT)
                .finish(Value::String(text)),
            structured => self.finish_json(structured),
        }
    }

    /// Sends the standard reason phrase for `code`.
    ///
    /// Codes without a standard phrase use the numeric code as the text. No
    /// `Content-Type` is set beyond what the caller already set.
    #[must_use]
    pub fn send_status(self, code: u16) -> Sent {
        let reason = reason_phrase(code);
        self.status(code).finish(Value::String(reason))
    }

    /// Sends `400 Bad Request`.
    #[must_use]
    pub fn bad_request(self) -> Sent {
        self.send_status(400)
    }

    /// Sends `403 Forbidden`.
    #[must_use]
    pub fn forbidden(self) -> Sent {
        self.send_status(403)
    }

    /// Sends `404 Not Found`.
    #[must_use]
    pub fn not_found(self) -> Sent {
        self.send_status(404)
    }

    /// Sends a 500 for `error`, through the server-error hook if one is set.
    #[must_use]
    pub fn server_error(self, error: impl Into<anyhow::Error>) -> Sent {
        let error = error.into();
        let detail = failure_detail(&error);
        let mut responder = self.status(500);
        let Some(hook) = responder.server_error_hook.take() else {
            return ServerErrorContinuation {
                responder,
                error: detail,
            }
            .respond();
        };

        let fallback = responder.detached();
        let continuation = ServerErrorContinuation {
            responder,
            error: detail.clone(),
        };

        match catch_unwind(AssertUnwindSafe(|| hook(error, continuation))) {
            Ok(Ok(sent)) => sent,
            Ok(Err(hook_error)) => {
                tracing::warn!(error = %hook_error, "server error hook failed; using default response");
                fallback.status(500).finish_json(Value::String(detail))
            }
            Err(_) => {
                tracing::warn!("server error hook panicked; using default response");
                fallback.status(500).finish_json(Value::String(detail))
            }
        }
    }

    fn detached(&self) -> Self {
        Self {
            state: self.state.clone(),
            no_envelope: self.no_envelope,
            server_error_hook: None,
        }
    }

    fn finish_json(self, value: Value) -> Sent {
        let body = if self.no_envelope {
            value
        } else {
            Value::String(value.to_string())
        };
        self.set(header_names::CONTENT_TYPE, media::JSON).finish(body)
    }

    fn finish(self, body: Value) -> Sent {
        Sent {
            status_code: self.state.status_code,
            headers: self.state.headers,
            body,
            context: self.state.context,
        }
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder")
            .field("status_code", &self.state.status_code)
            .field("headers", &self.state.headers)
            .field("no_envelope", &self.no_envelope)
            .field("server_error_hook", &self.server_error_hook.is_some())
            .finish()
    }
}

/// Default behavior handed to a [`ServerErrorHook`].
pub struct ServerErrorContinuation {
    responder: Responder,
    error: String,
}

impl ServerErrorContinuation {
    /// Performs the default response: status 500 with the error message as JSON.
    #[must_use]
    pub fn respond(self) -> Sent {
        let Self { responder, error } = self;
        responder.status(500).finish_json(Value::String(error))
    }

    /// Returns the error message the default response would send.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.error
    }

    /// Takes back the responder (status already 500) to send a custom body.
    #[must_use]
    pub fn into_responder(self) -> Responder {
        self.responder
    }
}

impl fmt::Debug for ServerErrorContinuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerErrorContinuation")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// A finalized response.
#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    status_code: u16,
    headers: HashMap<String, String>,
    body: Value,
    context: Value,
}

/// The parts of a [`Sent`] response.
#[derive(Debug, Clone, PartialEq)]
pub struct SentParts {
    /// Status code.
    pub status_code: u16,
    /// Headers as set, original casing.
    pub headers: HashMap<String, String>,
    /// Finalized body.
    pub body: Value,
    /// Response context.
    pub context: Value,
}

impl Sent {
    /// Returns the status code.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns all headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Looks up a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the finalized body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the body as text: strings verbatim, anything else as JSON.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        match &self.body {
            Value::String(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Returns the response context.
    #[must_use]
    pub fn context(&self) -> &Value {
        &self.context
    }

    /// Splits the response into its parts.
    #[must_use]
    pub fn into_parts(self) -> SentParts {
        SentParts {
            status_code: self.status_code,
            headers: self.headers,
            body: self.body,
            context: self.context,
        }
    }
}

fn reason_phrase(code: u16) -> String {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map_or_else(|| code.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_enveloped() {
        let sent = Responder::new(false).json(&json!({"ok": true})).unwrap();
        assert_eq!(sent.status_code(), 200);
        assert_eq!(sent.header(header_names::CONTENT_TYPE), Some(media::JSON));
        assert_eq!(sent.body(), &json!(r#"{"ok":true}"#));
        assert_eq!(sent.context(), &json!({}));
    }

    #[test]
    fn test_json_no_envelope_keeps_raw_value() {
        let sent = Responder::new(true)
            .status(403)
            .json(&json!({"reason": "denied"}))
            .unwrap();
        assert_eq!(sent.status_code(), 403);
        assert_eq!(sent.body(), &json!({"reason": "denied"}));
    }

    #[test]
    fn test_json_serialization_failure() {
        let mut bad = std::collections::BTreeMap::new();
        bad.insert(vec![1u8], "non-string key");
        let err = Responder::new(false).json(&bad).unwrap_err();
        assert!(matches!(err, HermesError::Serialization(_)));
    }

    #[test]
    fn test_send_scalars_pass_through() {
        let sent = Responder::new(false).send(204);
        assert_eq!(sent.body(), &json!(204));
        assert_eq!(sent.header("content-type"), None);

        let sent = Responder::new(false).send(true);
        assert_eq!(sent.body(), &json!(true));

        let sent = Responder::new(false).send(Value::Null);
        assert!(sent.body().is_null());
    }

    #[test]
    fn test_send_string_is_text() {
        let sent = Responder::new(false).send("<p>hi</p>");
        assert_eq!(sent.header("Content-Type"), Some(media::TEXT));
        assert_eq!(sent.body(), &json!("<p>hi</p>"));
    }

    #[test]
    fn test_send_object_is_json() {
        let sent = Responder::new(false).send(json!({"a": [1, 2]}));
        assert_eq!(sent.header("Content-Type"), Some(media::JSON));
        assert_eq!(sent.body(), &json!(r#"{"a":[1,2]}"#));

        let raw = Responder::new(true).send(json!({"a": 1}));
        assert_eq!(raw.body(), &json!({"a": 1}));
    }

    #[test]
    fn test_send_status_reason() {
        let sent = Responder::new(false).send_status(418);
        assert_eq!(sent.status_code(), 418);
        assert_eq!(sent.body(), &json!("I'm a teapot"));
        assert_eq!(sent.header(header_names::CONTENT_TYPE), None);

        let typed = Responder::new(false)
            .set("Content-Type", "text/plain")
            .send_status(202);
        assert_eq!(typed.header("content-type"), Some("text/plain"));

        let unknown = Responder::new(false).send_status(599);
        assert_eq!(unknown.body(), &json!("599"));
    }

    #[test]
    fn test_convenience_statuses() {
        assert_eq!(Responder::new(false).bad_request().body(), &json!("Bad Request"));
        assert_eq!(Responder::new(false).forbidden().status_code(), 403);
        assert_eq!(Responder::new(false).not_found().body(), &json!("Not Found"));
        assert!(Responder::new(false).bad_request().headers().is_empty());
    }

    #[test]
    fn test_setters_chain_and_context() {
        let sent = Responder::new(false)
            .set("X-Trace", "t-1")
            .status(202)
            .context(json!({"principalId": "u-1"}))
            .send("queued");
        assert_eq!(sent.header("x-trace"), Some("t-1"));
        assert_eq!(sent.status_code(), 202);
        assert_eq!(sent.context()["principalId"], "u-1");
    }

    #[test]
    fn test_server_error_default() {
        let sent = Responder::new(false).server_error(anyhow::anyhow!("boom"));
        assert_eq!(sent.status_code(), 500);
        assert_eq!(sent.body(), &json!("\"boom\""));
    }

    #[test]
    fn test_server_error_hook_uses_continuation() {
        let hook: ServerErrorHook = Arc::new(|err: anyhow::Error, cont: ServerErrorContinuation| {
            assert_eq!(err.to_string(), "boom");
            Ok(cont.respond())
        });
        let sent = Responder::new(false)
            .with_server_error_hook(Some(hook))
            .server_error(anyhow::anyhow!("boom"));
        assert_eq!(sent.status_code(), 500);
        assert_eq!(sent.body(), &json!("\"boom\""));
    }

    #[test]
    fn test_server_error_hook_custom_body() {
        let hook: ServerErrorHook = Arc::new(|_err: anyhow::Error, cont: ServerErrorContinuation| {
            Ok(cont.into_responder().json(&json!({"code": "E_INTERNAL"}))?)
        });
        let sent = Responder::new(false)
            .with_server_error_hook(Some(hook))
            .server_error(anyhow::anyhow!("boom"));
        assert_eq!(sent.status_code(), 500);
        assert_eq!(sent.body(), &json!(r#"{"code":"E_INTERNAL"}"#));
    }

    #[test]
    fn test_server_error_hook_failure_falls_back() {
        let hook: ServerErrorHook =
            Arc::new(|_err: anyhow::Error, _cont: ServerErrorContinuation| {
                Err(anyhow::anyhow!("hook broke"))
            });
        let sent = Responder::new(false)
            .status(200)
            .with_server_error_hook(Some(hook))
            .server_error(anyhow::anyhow!("boom").context("saving order"));

        assert_eq!(sent.status_code(), 500);
        let text = sent.body_text();
        assert!(text.contains("saving order"));
        assert!(text.contains("boom"));
        assert!(!text.contains("hook broke"));
    }

    #[test]
    fn test_server_error_body_same_with_failed_hook() {
        let chained = || anyhow::anyhow!("root cause").context("outer failure");
        let hook: ServerErrorHook =
            Arc::new(|_err: anyhow::Error, _cont: ServerErrorContinuation| {
                Err(anyhow::anyhow!("hook broke"))
            });

        let plain = Responder::new(false).server_error(chained());
        let fallen_back = Responder::new(false)
            .with_server_error_hook(Some(hook))
            .server_error(chained());

        assert_eq!(plain, fallen_back);
        assert_eq!(
            plain.body(),
            &json!(r#""outer failure\nCaused by: root cause""#)
        );
    }

    #[test]
    fn test_server_error_continuation_message_has_causes() {
        let hook: ServerErrorHook = Arc::new(|_err: anyhow::Error, cont: ServerErrorContinuation| {
            assert_eq!(cont.message(), "outer failure\nCaused by: root cause");
            Ok(cont.respond())
        });
        let sent = Responder::new(true)
            .with_server_error_hook(Some(hook))
            .server_error(anyhow::anyhow!("root cause").context("outer failure"));
        assert_eq!(sent.body(), &json!("outer failure\nCaused by: root cause"));
    }

    #[test]
    fn test_server_error_fallback_keeps_headers() {
        let hook: ServerErrorHook =
            Arc::new(|_err: anyhow::Error, _cont: ServerErrorContinuation| {
                Err(anyhow::anyhow!("hook broke"))
            });
        let sent = Responder::new(true)
            .set("X-Trace", "t-1")
            .with_server_error_hook(Some(hook))
            .server_error(anyhow::anyhow!("boom"));
        assert_eq!(sent.header("X-Trace"), Some("t-1"));
        assert_eq!(sent.header(header_names::CONTENT_TYPE), Some(media::JSON));
        assert_eq!(sent.body(), &json!("boom"));
    }

    #[test]
    fn test_server_error_hook_panic_falls_back() {
        let hook: ServerErrorHook = Arc::new(
            |_err: anyhow::Error, _cont: ServerErrorContinuation| -> anyhow::Result<Sent> {
                panic!("hook panicked")
            },
        );
        let sent = Responder::new(true)
            .with_server_error_hook(Some(hook))
            .server_error(anyhow::anyhow!("boom"));
        assert_eq!(sent.status_code(), 500);
        assert!(sent.body().as_str().unwrap().contains("boom"));
    }

    #[test]
    fn test_body_text() {
        assert_eq!(Responder::new(false).send("abc").body_text(), "abc");
        assert_eq!(Responder::new(false).send(12).body_text(), "12");
        assert_eq!(Responder::new(true).send(json!([1])).body_text(), "[1]");
    }

    #[test]
    fn test_into_parts() {
        let parts = Responder::new(false).set("A", "1").send("x").into_parts();
        assert_eq!(parts.status_code, 200);
        assert_eq!(parts.headers["A"], "1");
        assert_eq!(parts.body, json!("x"));
    }
}
