//! Response encoding.
//!
//! The [`ResponseEncoder`] turns a finalized [`Sent`] response into the
//! platform reply:
//!
//! 1. Inject `Content-Length` (UTF-8 byte length of the body text) unless the
//!    action set one under any casing.
//! 2. Apply the CORS policy against the inbound headers.
//! 3. Build the `{statusCode, headers, body, context}` envelope, or return the
//!    raw body alone when enveloping is disabled.
//!
//! Failures (bootstrap errors, adapter errors, teardown errors) are encoded
//! by [`ResponseEncoder::failure`] as a 500 envelope whose body is the JSON
//! text of `{event, error}`, or that object itself without an envelope.

use crate::cors::CorsPolicy;
use hermes_core::{HermesError, InboundEvent};
use hermes_extract::response::header_names;
use hermes_extract::{HeaderIndex, Sent};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Structured reply for HTTP-proxy style invocations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Value,
    /// Response context attached by the action.
    pub context: Value,
}

impl Envelope {
    /// Looks up a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The result handed to the completion callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EncodedResult {
    /// Structured envelope.
    Envelope(Envelope),
    /// Raw body value.
    Raw(Value),
}

impl EncodedResult {
    /// Returns the envelope, if this is one.
    #[must_use]
    pub fn as_envelope(&self) -> Option<&Envelope> {
        match self {
            Self::Envelope(envelope) => Some(envelope),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw value, if this is one.
    #[must_use]
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Envelope(_) => None,
            Self::Raw(value) => Some(value),
        }
    }

    /// Returns the status code (envelopes only).
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.as_envelope().map(|e| e.status_code)
    }

    /// Renders the result as the JSON value sent to the platform.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Envelope(envelope) => json!({
                "statusCode": envelope.status_code,
                "headers": envelope.headers,
                "body": envelope.body,
                "context": envelope.context,
            }),
            Self::Raw(value) => value,
        }
    }
}

/// Encodes finalized responses and failures.
#[derive(Debug, Clone, Default)]
pub struct ResponseEncoder {
    cors: Option<CorsPolicy>,
    no_envelope: bool,
}

impl ResponseEncoder {
    /// Creates an encoder.
    #[must_use]
    pub fn new(cors: Option<CorsPolicy>, no_envelope: bool) -> Self {
        Self { cors, no_envelope }
    }

    /// Returns `true` if results are raw bodies.
    #[must_use]
    pub fn is_no_envelope(&self) -> bool {
        self.no_envelope
    }

    /// Returns the CORS policy.
    #[must_use]
    pub fn cors(&self) -> Option<&CorsPolicy> {
        self.cors.as_ref()
    }

    /// Encodes a sent response.
    #[must_use]
    pub fn encode(&self, sent: Sent, event: &InboundEvent) -> EncodedResult {
        let content_length = sent.body_text().len();
        let parts = sent.into_parts();

        if self.no_envelope {
            return EncodedResult::Raw(parts.body);
        }

        let mut headers = parts.headers;
        if !headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case(header_names::CONTENT_LENGTH))
        {
            headers.insert(
                header_names::CONTENT_LENGTH.to_string(),
                content_length.to_string(),
            );
        }

        if let Some(cors) = &self.cors {
            let inbound = HeaderIndex::from_map(event.headers());
            let applied = cors.apply(&inbound, &mut headers);
            tracing::debug!(origin = cors.origin(), applied, "cors policy evaluated");
        }

        EncodedResult::Envelope(Envelope {
            status_code: parts.status_code,
            headers,
            body: parts.body,
            context: parts.context,
        })
    }

    /// Encodes a failure as a 500 result carrying the event and the error.
    #[must_use]
    pub fn failure(&self, event: &InboundEvent, error: &HermesError) -> EncodedResult {
        let payload = json!({
            "event": event.as_value(),
            "error": error.to_string(),
        });

        if self.no_envelope {
            return EncodedResult::Raw(payload);
        }

        EncodedResult::Envelope(Envelope {
            status_code: 500,
            headers: HashMap::new(),
            body: Value::String(payload.to_string()),
            context: Value::Object(Map::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_extract::Responder;
    use proptest::prelude::*;

    fn event(headers: Value) -> InboundEvent {
        InboundEvent::new(json!({ "headers": headers }))
    }

    #[test]
    fn test_json_envelope() {
        let sent = Responder::new(false).json(&json!({"ok": true})).unwrap();
        let result = ResponseEncoder::default().encode(sent, &event(json!({})));

        let envelope = result.as_envelope().unwrap();
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body, json!(r#"{"ok":true}"#));
        assert_eq!(envelope.header("content-type"), Some("application/json"));
        assert_eq!(envelope.header("Content-Length"), Some("11"));
        assert_eq!(envelope.context, json!({}));
    }

    #[test]
    fn test_explicit_content_length_kept() {
        let sent = Responder::new(false).set("content-length", "99").send("abc");
        let result = ResponseEncoder::default().encode(sent, &event(json!({})));

        let envelope = result.as_envelope().unwrap();
        assert_eq!(envelope.headers.len(), 2);
        assert_eq!(envelope.header("Content-Length"), Some("99"));
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let sent = Responder::new(false).send("héllo");
        let result = ResponseEncoder::default().encode(sent, &event(json!({})));
        assert_eq!(result.as_envelope().unwrap().header("Content-Length"), Some("6"));
    }

    #[test]
    fn test_no_envelope_returns_raw_body() {
        let sent = Responder::new(true)
            .status(403)
            .json(&json!({"reason": "denied"}))
            .unwrap();
        let encoder = ResponseEncoder::new(Some(CorsPolicy::any_origin()), true);
        let result = encoder.encode(sent, &event(json!({})));

        assert_eq!(result.status_code(), None);
        assert_eq!(result.as_raw(), Some(&json!({"reason": "denied"})));
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"reason":"denied"}"#
        );
    }

    #[test]
    fn test_cors_applied_on_match() {
        let encoder = ResponseEncoder::new(Some(CorsPolicy::new("https://a.test")), false);

        let hit = encoder.encode(
            Responder::new(false).send("x"),
            &event(json!({"Origin": "https://a.test"})),
        );
        assert_eq!(
            hit.as_envelope().unwrap().header("Access-Control-Allow-Origin"),
            Some("https://a.test")
        );

        let miss = encoder.encode(
            Responder::new(false).send("x"),
            &event(json!({"Origin": "https://b.test"})),
        );
        assert_eq!(
            miss.as_envelope().unwrap().header("Access-Control-Allow-Origin"),
            None
        );
    }

    #[test]
    fn test_context_carried() {
        let sent = Responder::new(false)
            .context(json!({"tenant": "acme"}))
            .send(json!({"allowed": true}));
        let value = ResponseEncoder::default()
            .encode(sent, &event(json!({})))
            .into_value();
        assert_eq!(value["context"]["tenant"], "acme");
        assert_eq!(value["statusCode"], 200);
    }

    #[test]
    fn test_failure_envelope() {
        let ev = InboundEvent::new(json!({"path": "/x"}));
        let error = HermesError::bootstrap("connect", anyhow::anyhow!("db down"));
        let result = ResponseEncoder::default().failure(&ev, &error);

        let envelope = result.as_envelope().unwrap();
        assert_eq!(envelope.status_code, 500);
        assert!(envelope.headers.is_empty());

        let body: Value = serde_json::from_str(envelope.body.as_str().unwrap()).unwrap();
        assert_eq!(body["event"]["path"], "/x");
        assert!(body["error"].as_str().unwrap().contains("db down"));
    }

    #[test]
    fn test_failure_raw() {
        let ev = InboundEvent::new(json!({"type": "TOKEN"}));
        let error = HermesError::handler_internal("adapter exploded");
        let result = ResponseEncoder::new(None, true).failure(&ev, &error);

        let raw = result.as_raw().unwrap();
        assert_eq!(raw["event"]["type"], "TOKEN");
        assert!(raw["error"].as_str().unwrap().contains("adapter exploded"));
    }

    proptest! {
        #[test]
        fn prop_content_length_matches_body(text in ".{0,64}") {
            let sent = Responder::new(false).send(text.clone());
            let result = ResponseEncoder::default().encode(sent, &event(json!({})));
            let expected = text.len().to_string();
            prop_assert_eq!(
                result.as_envelope().unwrap().header("Content-Length"),
                Some(expected.as_str())
            );
        }

        #[test]
        fn prop_json_content_length_matches_text(n in any::<i64>(), s in "[a-z]{0,16}") {
            let sent = Responder::new(false).json(&json!({"n": n, "s": s})).unwrap();
            let result = ResponseEncoder::default().encode(sent, &event(json!({})));
            let envelope = result.as_envelope().unwrap();
            let body_len = envelope.body.as_str().unwrap().len().to_string();
            prop_assert_eq!(envelope.header("Content-Length"), Some(body_len.as_str()));
        }
    }
}
