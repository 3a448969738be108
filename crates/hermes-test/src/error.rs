//! Test error types.

use std::fmt;

/// Errors raised by test helpers.
#[derive(Debug)]
pub enum TestError {
    /// The result was raw where an envelope was expected.
    NotAnEnvelope,
    /// The body was not the expected shape.
    Body(String),
    /// JSON deserialization failed
    Json(serde_json::Error),
    /// The adapter returned an error instead of a result.
    Invocation(String),
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnEnvelope => write!(f, "Expected an envelope, got a raw result"),
            Self::Body(msg) => write!(f, "Body error: {msg}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Invocation(msg) => write!(f, "Invocation error: {msg}"),
        }
    }
}

impl std::error::Error for TestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display() {
        assert!(TestError::NotAnEnvelope.to_string().contains("envelope"));
        assert_eq!(TestError::Body("empty".into()).to_string(), "Body error: empty");
    }

    #[test]
    fn test_json_source() {
        let json_err = serde_json::from_str::<u8>("x").unwrap_err();
        let err = TestError::from(json_err);
        assert!(err.source().is_some());
        assert!(TestError::Invocation("x".into()).source().is_none());
    }
}
