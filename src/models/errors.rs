//! Centralized Error Handling Module
//!
//! Every failure carries a unique, stable error code so that logs and API
//! responses can be correlated without parsing messages.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - ADDR_xxx: per-address classification failures
//! - LOOKUP_xxx: chain REST lookup failures (never fatal on their own)
//! - API_xxx: request-level API errors
//! - CFG_xxx: configuration errors

use serde::{Serialize, Serializer};
use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ============================================
    // Address Errors
    // ============================================
    /// Address failed the syntactic format gate
    AddressInvalidFormat,
    /// Every lookup for the address failed at the transport level
    AddressRemoteUnavailable,
    /// Remote reported a relationship without naming the other side
    AddressMalformedRemoteRecord,
    /// Unexpected fault while resolving one address
    AddressInternal,

    // ============================================
    // Lookup Errors
    // ============================================
    LookupTimeout,
    /// Chain REST answered HTTP 429
    LookupRateLimited,
    LookupHttpStatus,
    LookupConnectionFailed,
    LookupInvalidResponse,

    // ============================================
    // API Errors
    // ============================================
    /// Neither an address nor an address list was supplied
    ApiBadRequest,
    ApiEmptyBatch,
    /// Batch larger than the caller's tier allows
    ApiBatchTooLarge,
    ApiUnauthorized,
    ApiRateLimited,
    ApiPayloadTooLarge,

    // ============================================
    // Configuration Errors
    // ============================================
    ConfigInvalidValue,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddressInvalidFormat => "ADDR_INVALID_FORMAT",
            Self::AddressRemoteUnavailable => "ADDR_REMOTE_UNAVAILABLE",
            Self::AddressMalformedRemoteRecord => "ADDR_MALFORMED_REMOTE_RECORD",
            Self::AddressInternal => "ADDR_INTERNAL",

            Self::LookupTimeout => "LOOKUP_TIMEOUT",
            Self::LookupRateLimited => "LOOKUP_RATE_LIMITED",
            Self::LookupHttpStatus => "LOOKUP_HTTP_STATUS",
            Self::LookupConnectionFailed => "LOOKUP_CONNECTION_FAILED",
            Self::LookupInvalidResponse => "LOOKUP_INVALID_RESPONSE",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiEmptyBatch => "API_EMPTY_BATCH",
            Self::ApiBatchTooLarge => "API_BATCH_TOO_LARGE",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiPayloadTooLarge => "API_PAYLOAD_TOO_LARGE",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::AddressInvalidFormat
            | Self::ApiBadRequest
            | Self::ApiEmptyBatch
            | Self::ConfigInvalidValue => 400,
            Self::ApiUnauthorized => 401,
            Self::ApiBatchTooLarge | Self::ApiPayloadTooLarge => 413,
            Self::ApiRateLimited => 429,
            Self::AddressRemoteUnavailable => 503,
            _ => 500,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn invalid_address(address: &str) -> Self {
        Self::new(
            ErrorCode::AddressInvalidFormat,
            format!("Invalid address format: {}", address),
        )
    }

    pub fn remote_unavailable(address: &str) -> Self {
        Self::new(
            ErrorCode::AddressRemoteUnavailable,
            format!("Chain REST service unavailable while resolving {}", address),
        )
    }

    pub fn malformed_record(address: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::AddressMalformedRemoteRecord,
            format!("Malformed pointer record for {}: {}", address, detail),
        )
    }

    pub fn internal(address: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::AddressInternal,
            format!("Failed to determine properties for {}: {}", address, detail),
        )
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    pub fn empty_batch() -> Self {
        Self::new(ErrorCode::ApiEmptyBatch, "addresses array cannot be empty")
    }

    pub fn batch_too_large(requested: usize, max: usize) -> Self {
        Self::new(
            ErrorCode::ApiBatchTooLarge,
            format!(
                "Batch of {} addresses exceeds the maximum of {} for this caller",
                requested, max
            ),
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::ApiUnauthorized, "Invalid API key")
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::new(
            ErrorCode::ApiRateLimited,
            format!("Rate limit exceeded. Retry after {} seconds", retry_after_secs),
        )
    }

    pub fn payload_too_large() -> Self {
        Self::new(ErrorCode::ApiPayloadTooLarge, "Request body too large")
    }

    pub fn config_invalid(var: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", var, value),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;
