//! API Request/Response Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::LookupStatsSnapshot;
use crate::models::{AddressReport, AppError, AppResult};
use crate::utils::cache::CacheStats;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Request-level error body
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: &'static str,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.message.clone(),
            code: err.code_str(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ApiError::from(&self))).into_response()
    }
}

// ============================================
// Classification
// ============================================

/// JSON body for `POST /`
#[derive(Debug, Default, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
}

/// Query string for `GET /` and `POST /`; `addresses` is comma separated
#[derive(Debug, Default, Deserialize)]
pub struct ClassifyQuery {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub addresses: Option<String>,
}

/// What the caller asked to classify
#[derive(Debug, PartialEq, Eq)]
pub enum ClassifyInput {
    Single(String),
    Batch(Vec<String>),
}

impl ClassifyRequest {
    /// Merge body and query string. Body fields win, and a single
    /// `address` wins over `addresses`.
    pub fn into_input(self, query: ClassifyQuery) -> AppResult<ClassifyInput> {
        let address = self.address.or(query.address);
        let addresses = self.addresses.or_else(|| {
            query.addresses.map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(String::from)
                    .collect()
            })
        });

        match (address, addresses) {
            (Some(address), _) if address.trim().is_empty() => {
                Err(AppError::bad_request("address cannot be empty"))
            }
            (Some(address), _) => Ok(ClassifyInput::Single(address)),
            (None, Some(addresses)) if addresses.is_empty() => Err(AppError::empty_batch()),
            (None, Some(addresses)) => Ok(ClassifyInput::Batch(addresses)),
            (None, None) => Err(AppError::bad_request(
                "An address or an array of addresses is required",
            )),
        }
    }
}

/// Single classification response: the report itself, with the status
/// code of its failure if it has one
pub struct SingleReport(pub AddressReport);

impl IntoResponse for SingleReport {
    fn into_response(self) -> Response {
        let status = self
            .0
            .failure()
            .and_then(|f| StatusCode::from_u16(f.error_code.http_status()).ok())
            .unwrap_or(StatusCode::OK);
        (status, Json(self.0)).into_response()
    }
}

// ============================================
// Stats
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub cache: CacheStats,
    pub lookups: LookupStatsSnapshot,
    pub lookup_strategy: String,
    pub uptime_seconds: u64,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
