//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Provider failures are classified once, at the generation boundary, into
//! the small set of outcomes the user can act on.
//!
//! ## Error Categories
//!
//! - **RateLimit**: quota exhausted (wait, then re-run)
//! - **NotFound**: model identifier rejected (pick another model)
//! - **Auth**: credential rejected
//! - **Network**: connectivity issues
//! - **BadRequest**: malformed request
//! - **Transient**: server side trouble
//! - **Unknown**: anything else

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Provider error categories used for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exhausted
    RateLimit,
    /// Requested model (or endpoint) does not exist
    NotFound,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues
    Network,
    /// Invalid request
    BadRequest,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Structured provider error with category and raw status details
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for classification
    pub category: ErrorCategory,
    /// Detailed error message (raw provider detail)
    pub message: String,
    /// HTTP status code, when the provider returned one
    pub status: Option<u16>,
    /// Provider status string (e.g. `RESOURCE_EXHAUSTED`)
    pub code: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}:{}] {}", self.category, status, self.message),
            None => write!(f, "[{}] {}", self.category, self.message),
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    /// Create a new LLM error
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            status: None,
            code: None,
        }
    }

    /// Attach the HTTP status code
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Error classifier for provider failures
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify a provider failure.
    ///
    /// The HTTP status wins when present, then the provider status string,
    /// then message patterns.
    pub fn classify(status: Option<u16>, code: Option<&str>, message: &str) -> LlmError {
        let category = status
            .and_then(Self::category_for_status)
            .or_else(|| code.and_then(Self::category_for_code))
            .unwrap_or_else(|| Self::category_for_message(message));

        let mut err = LlmError::new(category, message);
        err.status = status;
        err.code = code.map(str::to_string);
        err
    }

    /// Classify HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str) -> LlmError {
        Self::classify(Some(status), None, message)
    }

    fn category_for_status(status: u16) -> Option<ErrorCategory> {
        match status {
            429 => Some(ErrorCategory::RateLimit),
            404 => Some(ErrorCategory::NotFound),
            401 | 403 => Some(ErrorCategory::Auth),
            400 => Some(ErrorCategory::BadRequest),
            500 | 502 | 503 | 504 => Some(ErrorCategory::Transient),
            _ => None,
        }
    }

    fn category_for_code(code: &str) -> Option<ErrorCategory> {
        match code.to_ascii_uppercase().as_str() {
            "RESOURCE_EXHAUSTED" | "429" => Some(ErrorCategory::RateLimit),
            "NOT_FOUND" | "404" => Some(ErrorCategory::NotFound),
            "UNAUTHENTICATED" | "PERMISSION_DENIED" => Some(ErrorCategory::Auth),
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" => Some(ErrorCategory::BadRequest),
            "UNAVAILABLE" | "INTERNAL" | "DEADLINE_EXCEEDED" => Some(ErrorCategory::Transient),
            _ => None,
        }
    }

    fn category_for_message(message: &str) -> ErrorCategory {
        let lower = message.to_lowercase();

        if lower.contains("429")
            || lower.contains("rate limit")
            || lower.contains("resource exhausted")
            || lower.contains("resource_exhausted")
            || lower.contains("quota")
            || lower.contains("too many requests")
        {
            return ErrorCategory::RateLimit;
        }

        if lower.contains("404") || lower.contains("not found") || lower.contains("not_found") {
            return ErrorCategory::NotFound;
        }

        if lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("permission denied")
        {
            return ErrorCategory::Auth;
        }

        if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("unreachable")
        {
            return ErrorCategory::Network;
        }

        if lower.contains("503")
            || lower.contains("502")
            || lower.contains("500")
            || lower.contains("overloaded")
            || lower.contains("unavailable")
        {
            return ErrorCategory::Transient;
        }

        if lower.contains("400") || lower.contains("bad request") || lower.contains("invalid") {
            return ErrorCategory::BadRequest;
        }

        ErrorCategory::Unknown
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "Invalid '{}': {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Required field is empty
    pub fn missing(field: &str, message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MissingField, message).with_field(field)
    }

    /// Value outside its allowed range
    pub fn out_of_range(field: &str, message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::Range, message).with_field(field)
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required field missing
    MissingField,
    /// Value out of range
    Range,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum PlannerError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Generation Outcomes
    // -------------------------------------------------------------------------
    #[error("Rate limit reached. Wait a minute, then try again (a shorter route also helps).")]
    RateLimited,

    #[error("Model '{identifier}' was not found. Choose another model with --model (see 'tripbrief models').")]
    ModelNotFound { identifier: String },

    #[error("System error: {message}")]
    Transient { message: String },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<ValidationError> for PlannerError {
    fn from(err: ValidationError) -> Self {
        PlannerError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;

// =============================================================================
// Tests
// =============================================================================
