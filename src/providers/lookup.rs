//! Pointer registry lookup abstraction
//!
//! The resolver only ever talks to the chain through [`PointerLookup`], so a
//! fake can stand in for the REST service in tests.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

use crate::models::{ErrorCode, PointerType};
use crate::utils::constants::{POINTEE_PATH, POINTER_PATH};

/// Which side of the relationship is being asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupDirection {
    /// "Is this address a pointer?" → returns the pointee
    PointeeByPointer,
    /// "Does this base asset have a pointer?" → returns the pointer
    PointerByPointee,
}

impl LookupDirection {
    pub fn path(&self) -> &'static str {
        match self {
            Self::PointeeByPointer => POINTEE_PATH,
            Self::PointerByPointee => POINTER_PATH,
        }
    }

    /// Query parameter carrying the address being asked about
    pub fn address_param(&self) -> &'static str {
        match self {
            Self::PointeeByPointer => "pointer",
            Self::PointerByPointee => "pointee",
        }
    }
}

/// One logical remote query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupQuery<'a> {
    pub direction: LookupDirection,
    pub pointer_type: PointerType,
    pub address: &'a str,
}

/// Response shape shared by both endpoints
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PointerRecord {
    pub exists: bool,
    #[serde(default)]
    pub pointer: Option<String>,
    #[serde(default)]
    pub pointee: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
}

impl PointerRecord {
    /// The address on the other side of the relationship, if named
    pub fn counterpart(&self, direction: LookupDirection) -> Option<&str> {
        let side = match direction {
            LookupDirection::PointeeByPointer => &self.pointee,
            LookupDirection::PointerByPointee => &self.pointer,
        };
        side.as_deref().filter(|s| !s.is_empty())
    }
}

/// Why a lookup produced no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    Timeout,
    /// HTTP 429: systemic throttling, not a fact about the address
    RateLimited,
    HttpStatus(u16),
    Connection,
    InvalidResponse,
}

impl LookupFailure {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout => ErrorCode::LookupTimeout,
            Self::RateLimited => ErrorCode::LookupRateLimited,
            Self::HttpStatus(_) => ErrorCode::LookupHttpStatus,
            Self::Connection => ErrorCode::LookupConnectionFailed,
            Self::InvalidResponse => ErrorCode::LookupInvalidResponse,
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("request timed out"),
            Self::RateLimited => f.write_str("rate limited (HTTP 429)"),
            Self::HttpStatus(status) => write!(f, "HTTP {}", status),
            Self::Connection => f.write_str("connection failed"),
            Self::InvalidResponse => f.write_str("invalid response body"),
        }
    }
}

/// Result of one lookup. Transport problems are a value, never a panic or `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Registry reports `exists: true`
    Found(PointerRecord),
    /// Registry reports `exists: false`
    Absent,
    /// No usable answer; treated as a negative match by the resolver
    Unavailable(LookupFailure),
}

/// Pointer registry query service
#[async_trait]
pub trait PointerLookup: Send + Sync {
    async fn lookup(&self, query: LookupQuery<'_>) -> LookupOutcome;
}
