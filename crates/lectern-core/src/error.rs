//! Error types for lectern operations.
//!
//! Retrieval is an advisory subsystem: most failures degrade to partial or
//! empty results inside the tier chain instead of surfacing here. The
//! variants below are the errors that cross component boundaries, with
//! structured error codes for programmatic handling.

use thiserror::Error;

/// Result type alias for lectern operations.
pub type LecternResult<T> = Result<T, LecternError>;

/// Main error type for all lectern operations.
#[derive(Error, Debug)]
pub enum LecternError {
    /// Embedding provider failed or is unavailable.
    #[error("Embedding error: {message}")]
    Embedding {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request validation failed (malformed query or scope).
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Document store operation failed.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A store call exceeded its tier deadline.
    #[error("Timeout after {elapsed_ms}ms: {message}")]
    Timeout { message: String, elapsed_ms: u64 },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Embedding (EMB_xxx)
    EmbConnectionFailed,
    EmbGenerationFailed,

    // Validation (VAL_xxx)
    ValInvalidQuery,
    ValInvalidScope,

    // Storage (STO_xxx)
    StoConnectionFailed,
    StoQueryFailed,

    // Timeout (TMO_xxx)
    TmoTierDeadline,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmbConnectionFailed => "EMB_001",
            ErrorCode::EmbGenerationFailed => "EMB_002",
            ErrorCode::ValInvalidQuery => "VAL_001",
            ErrorCode::ValInvalidScope => "VAL_002",
            ErrorCode::StoConnectionFailed => "STO_001",
            ErrorCode::StoQueryFailed => "STO_002",
            ErrorCode::TmoTierDeadline => "TMO_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl LecternError {
    /// Create an embedding provider error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
            code: ErrorCode::EmbGenerationFailed,
            source: None,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidQuery,
            suggestion: None,
        }
    }

    /// Create a validation error with a resolution suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidQuery,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoQueryFailed,
            source: None,
        }
    }

    /// Create a storage connection error.
    ///
    /// Connection-level failures happen outside the tier chain and
    /// propagate to the caller instead of degrading.
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoConnectionFailed,
            source: None,
        }
    }

    /// Create a tier timeout error.
    pub fn timeout(message: impl Into<String>, elapsed_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            elapsed_ms,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Embedding { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::Timeout { .. } => ErrorCode::TmoTierDeadline,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this error is local to a single retrieval tier.
    ///
    /// Tier-local errors are swallowed by the fallback chain (the tier
    /// behaves as if it returned zero results). Anything else propagates.
    pub fn is_tier_local(&self) -> bool {
        match self {
            Self::Embedding { .. } | Self::Timeout { .. } => true,
            Self::Storage { code, .. } => *code != ErrorCode::StoConnectionFailed,
            _ => false,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Embedding { .. } => Some("Please check your embedding provider configuration"),
            Self::Storage { .. } => Some("Please check your document store connection settings"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = LecternError::validation("empty query");
        assert_eq!(err.code(), ErrorCode::ValInvalidQuery);
        assert!(err.to_string().contains("empty query"));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::EmbGenerationFailed.as_str(), "EMB_002");
        assert_eq!(ErrorCode::StoQueryFailed.as_str(), "STO_002");
    }

    #[test]
    fn test_tier_local_classification() {
        assert!(LecternError::storage("fts query failed").is_tier_local());
        assert!(LecternError::embedding("provider down").is_tier_local());
        assert!(LecternError::timeout("vector search", 10_000).is_tier_local());
        assert!(!LecternError::storage_unavailable("no connection").is_tier_local());
        assert!(!LecternError::Configuration("bad ttl".into()).is_tier_local());
    }

    #[test]
    fn test_suggestions() {
        let err = LecternError::validation_with_suggestion("bad scope", "narrow the scope");
        assert_eq!(err.suggestion(), Some("narrow the scope"));
        assert!(LecternError::storage("x").suggestion().is_some());
    }
}
