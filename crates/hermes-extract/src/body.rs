//! Request body parsing.
//!
//! The body is parsed as JSON once per invocation. Parsing never fails: an
//! absent, undecodable or malformed body yields `null`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hermes_core::InboundEvent;
use serde_json::Value;

/// Parses the event body as JSON, degrading to `Value::Null`.
///
/// Bodies flagged `isBase64Encoded` are decoded first.
///
/// # Example
///
/// ```
/// use hermes_core::InboundEvent;
/// use hermes_extract::parse_body;
/// use serde_json::json;
///
/// let ok = InboundEvent::new(json!({"body": "{\"name\":\"ada\"}"}));
/// assert_eq!(parse_body(&ok)["name"], "ada");
///
/// let broken = InboundEvent::new(json!({"body": "{not json"}));
/// assert!(parse_body(&broken).is_null());
/// ```
#[must_use]
pub fn parse_body(event: &InboundEvent) -> Value {
    let Some(raw) = event.body() else {
        return Value::Null;
    };

    let parsed = if event.is_base64_encoded() {
        STANDARD
            .decode(raw)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|text| serde_json::from_str(&text).ok())
    } else {
        serde_json::from_str(raw).ok()
    };

    parsed.unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_body() {
        assert!(parse_body(&InboundEvent::new(json!({}))).is_null());
    }

    #[test]
    fn test_empty_body() {
        assert!(parse_body(&InboundEvent::new(json!({"body": ""}))).is_null());
    }

    #[test]
    fn test_scalar_json_body() {
        let event = InboundEvent::new(json!({"body": "42"}));
        assert_eq!(parse_body(&event), json!(42));
    }

    #[test]
    fn test_base64_body() {
        let encoded = STANDARD.encode(r#"{"id":7}"#);
        let event = InboundEvent::new(json!({"body": encoded, "isBase64Encoded": true}));
        assert_eq!(parse_body(&event)["id"], 7);
    }

    #[test]
    fn test_bad_base64_body() {
        let event = InboundEvent::new(json!({"body": "!!!", "isBase64Encoded": true}));
        assert!(parse_body(&event).is_null());
    }
}
