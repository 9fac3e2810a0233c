pub mod error;

pub use error::{
    ErrorCategory, ErrorClassifier, LlmError, PlannerError, Result, ValidationError,
    ValidationErrorKind,
};

// =============================================================================
// Domain Newtypes
// =============================================================================

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Provider API credential
///
/// Wraps the key in a `SecretString` so it never shows up in logs, debug
/// output, or serialized configuration.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into().trim().to_string()))
    }

    /// Returns `None` for absent or blank keys
    pub fn from_optional(key: Option<String>) -> Option<Self> {
        key.map(Self::new).filter(|c| !c.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Raw key, only for building the outbound request
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Type-safe wrapper for provider model identifiers
///
/// Provider listings use the `models/<id>` resource form; the identifier is
/// stored without that prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl AsRef<str>) -> Self {
        let id = id.as_ref().trim();
        Self(id.strip_prefix("models/").unwrap_or(id).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("AIza-secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_blank_credential_is_absent() {
        assert!(Credential::from_optional(Some("   ".to_string())).is_none());
        assert!(Credential::from_optional(None).is_none());
        assert!(Credential::from_optional(Some("key".to_string())).is_some());
    }

    #[test]
    fn test_model_id_strips_resource_prefix() {
        assert_eq!(ModelId::new("models/gemini-2.5-flash").as_str(), "gemini-2.5-flash");
        assert_eq!(ModelId::new("gemini-2.5-pro").as_str(), "gemini-2.5-pro");
    }
}
