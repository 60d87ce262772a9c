//! API Request Handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use super::middleware::{RateLimitConfig, RateLimiter};
use super::types::*;
use crate::core::BatchCoordinator;
use crate::models::{AppError, AppResult, CallerTier, LookupStrategy, ServiceConfig};
use crate::providers::{ChainRestClient, PointerLookup};
use crate::utils::constants::APP_VERSION;

/// Shared application state
pub struct AppState {
    pub coordinator: BatchCoordinator,
    pub rate_limiter: RateLimiter,
    /// Inbound keys that unlock the trusted tier
    pub api_keys: HashSet<String>,
    pub lookup_strategy: LookupStrategy,
    pub max_body_bytes: usize,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: &ServiceConfig, lookup: Arc<dyn PointerLookup>) -> Self {
        Self {
            coordinator: BatchCoordinator::from_config(config, lookup),
            rate_limiter: RateLimiter::new(RateLimitConfig::per_minute(
                config.rate_limit_per_minute,
            )),
            api_keys: config.api_keys.clone(),
            lookup_strategy: config.lookup_strategy,
            max_body_bytes: config.max_body_bytes,
            start_time: Instant::now(),
        }
    }

    /// State backed by the real chain REST client
    pub fn from_config(config: &ServiceConfig) -> AppResult<Self> {
        let client = ChainRestClient::new(config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();

    let data = StatsData {
        cache: state.coordinator.cache().stats(),
        lookups: state.coordinator.resolver().stats(),
        lookup_strategy: state.lookup_strategy.as_str().to_string(),
        uptime_seconds: state.uptime_seconds(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Classification
// ============================================

/// `GET /{address}`; the path is percent-decoded, so `ibc%2FHASH` works
pub async fn classify_path(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> SingleReport {
    SingleReport(state.coordinator.resolve_one(&address).await)
}

/// `POST /` and `GET /`: one address or a list, from the body or query
pub async fn classify_request(
    State(state): State<Arc<AppState>>,
    tier: Option<Extension<CallerTier>>,
    Query(query): Query<ClassifyQuery>,
    body: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let tier = tier.map(|Extension(tier)| tier).unwrap_or(CallerTier::Anonymous);

    let body = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => ClassifyRequest::default(),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(AppError::payload_too_large());
        }
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "Rejected request body");
            return Err(AppError::bad_request(rejection.body_text()));
        }
    };

    match body.into_input(query)? {
        ClassifyInput::Single(address) => {
            Ok(SingleReport(state.coordinator.resolve_one(&address).await).into_response())
        }
        ClassifyInput::Batch(addresses) => {
            let reports = state.coordinator.resolve_batch(addresses, tier).await?;
            Ok(Json(reports).into_response())
        }
    }
}
