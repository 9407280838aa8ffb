//! Error types for wren operations.
//!
//! Every fallible operation outside the pattern filter returns [`WrenResult`].
//! Errors carry a structured [`ErrorCode`] so callers can branch without
//! inspecting message strings.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for wren operations.
pub type WrenResult<T> = Result<T, WrenError>;

/// Main error type for all wren operations.
#[derive(Error, Debug)]
pub enum WrenError {
    /// Authentication with the memory backend failed.
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// Memory not found.
    #[error("Memory not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        memory_id: Option<String>,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        code: ErrorCode,
        retry_after: Option<u64>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network or backend API error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (AUTH_xxx)
    AuthInvalidKey,
    AuthMissingCredentials,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidMemoryType,

    // Memory (MEM_xxx)
    MemNotFound,

    // Rate Limit (RATE_xxx)
    RateLimitExceeded,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,
    NetBadStatus,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Configuration and local IO
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthInvalidKey => "AUTH_001",
            ErrorCode::AuthMissingCredentials => "AUTH_003",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidMemoryType => "VAL_004",
            ErrorCode::MemNotFound => "MEM_001",
            ErrorCode::RateLimitExceeded => "RATE_001",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::NetBadStatus => "NET_003",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl WrenError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create an error for a memory type outside the accepted set.
    pub fn invalid_memory_type(given: &str, valid: &[&str]) -> Self {
        let mut details = HashMap::new();
        details.insert("memory_type".to_string(), given.to_string());
        Self::Validation {
            message: format!(
                "Invalid memory type. Must be one of: {}",
                valid.join(", ")
            ),
            code: ErrorCode::ValInvalidMemoryType,
            details,
            suggestion: None,
        }
    }

    /// Create a not found error.
    pub fn not_found(memory_id: impl Into<String>) -> Self {
        let id = memory_id.into();
        Self::NotFound {
            message: format!("Memory with id '{}' not found", id),
            code: ErrorCode::MemNotFound,
            memory_id: Some(id),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create an API error that keeps the underlying transport error.
    pub fn api_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: Some(Box::new(source)),
        }
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetTimeout,
            source: None,
        }
    }

    /// Create a missing credentials error.
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::AuthMissingCredentials,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Authentication { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::RateLimit { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Configuration(_) | Self::Io(_) => ErrorCode::Internal,
        }
    }

    /// The error's message without its category prefix.
    ///
    /// This is the text callers of the tools see; [`Display`](std::fmt::Display)
    /// adds the category and is meant for logs.
    pub fn message(&self) -> String {
        match self {
            Self::Authentication { message, .. }
            | Self::Validation { message, .. }
            | Self::NotFound { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Network { message, .. }
            | Self::Parse { message, .. } => message.clone(),
            Self::Configuration(message) => message.clone(),
            Self::Io(e) => e.to_string(),
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Authentication { .. } => Some("Please check MEM0_API_KEY and the organization/project IDs"),
            Self::RateLimit { .. } => Some("Please wait before making more requests"),
            Self::NotFound { .. } => Some("Please check the memory ID and ensure it exists"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Network { .. } => Some("Please check the backend base URL and network connectivity"),
            _ => None,
        }
    }

    /// Convert from an HTTP status code returned by the memory backend.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            400 | 422 => Self::Validation {
                message: body.to_string(),
                code: ErrorCode::ValInvalidInput,
                details: HashMap::new(),
                suggestion: Some("Please check your request parameters".to_string()),
            },
            401 | 403 => Self::Authentication {
                message: body.to_string(),
                code: ErrorCode::AuthInvalidKey,
                source: None,
            },
            404 => Self::NotFound {
                message: body.to_string(),
                code: ErrorCode::MemNotFound,
                memory_id: None,
            },
            429 => Self::RateLimit {
                message: body.to_string(),
                code: ErrorCode::RateLimitExceeded,
                retry_after: None,
            },
            _ => Self::Network {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::NetBadStatus,
                source: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = WrenError::validation("Invalid input");
        assert_eq!(err.code(), ErrorCode::ValInvalidInput);
        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_not_found_error() {
        let err = WrenError::not_found("test-id");
        assert_eq!(err.code(), ErrorCode::MemNotFound);
        assert!(err.suggestion().is_some());
        assert!(err.to_string().contains("test-id"));
    }

    #[test]
    fn test_invalid_memory_type_lists_choices() {
        let err = WrenError::invalid_memory_type("dream", &["conversation", "working"]);
        assert_eq!(err.code(), ErrorCode::ValInvalidMemoryType);
        assert!(err
            .to_string()
            .contains("Must be one of: conversation, working"));
    }

    #[test]
    fn test_message_omits_category() {
        let err = WrenError::invalid_memory_type("dream", &["conversation", "working"]);
        assert_eq!(
            err.message(),
            "Invalid memory type. Must be one of: conversation, working"
        );
        assert!(err.to_string().starts_with("Validation error: "));

        let err = WrenError::from_http_status(401, "Invalid API key");
        assert_eq!(err.message(), "Invalid API key");
        assert_eq!(err.to_string(), "Authentication error: Invalid API key");

        let err = WrenError::Configuration("bad url".to_string());
        assert_eq!(err.message(), "bad url");
        assert_eq!(err.code(), ErrorCode::Internal);
    }

    #[test]
    fn test_suggestion_by_category() {
        assert!(WrenError::validation("x").suggestion().is_none());
        assert_eq!(
            WrenError::from_http_status(422, "bad field").suggestion(),
            Some("Please check your request parameters")
        );
        assert!(WrenError::timeout("slow").suggestion().is_some());
        assert!(WrenError::Configuration("x".to_string()).suggestion().is_none());
    }

    #[test]
    fn test_from_http_status() {
        assert_eq!(
            WrenError::from_http_status(401, "bad key").code(),
            ErrorCode::AuthInvalidKey
        );
        assert_eq!(
            WrenError::from_http_status(404, "").code(),
            ErrorCode::MemNotFound
        );
        assert_eq!(
            WrenError::from_http_status(429, "slow down").code(),
            ErrorCode::RateLimitExceeded
        );
        let err = WrenError::from_http_status(502, "upstream");
        assert_eq!(err.code(), ErrorCode::NetBadStatus);
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::AuthInvalidKey.as_str(), "AUTH_001");
        assert_eq!(ErrorCode::MemNotFound.as_str(), "MEM_001");
        assert_eq!(ErrorCode::NetBadStatus.as_str(), "NET_003");
    }
}
