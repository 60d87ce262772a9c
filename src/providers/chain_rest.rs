//! Chain REST Client - pointer registry lookups
//!
//! Queries the chain's REST gateway:
//! - `GET /sei-protocol/seichain/evm/pointee?pointerType=N&pointer=ADDR`
//! - `GET /sei-protocol/seichain/evm/pointer?pointerType=N&pointee=ADDR`
//!
//! Every failure mode (timeout, connection error, non-2xx, undecodable body)
//! is logged with its reason and returned as `LookupOutcome::Unavailable`.
//! Nothing here retries; a failed lookup counts as "no match".

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use reqwest::StatusCode;
use std::time::Instant;
use tracing::{debug, warn};

use super::lookup::{LookupFailure, LookupOutcome, LookupQuery, PointerLookup, PointerRecord};
use crate::models::{AppError, AppResult, ErrorCode, ServiceConfig};
use crate::utils::constants::{API_KEY_HEADER, USER_AGENT as USER_AGENT_CONST};

/// HTTP client for the pointer registry endpoints
#[derive(Clone)]
pub struct ChainRestClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChainRestClient {
    pub fn new(config: &ServiceConfig) -> AppResult<Self> {
        Ok(Self {
            client: Self::build_client(config)?,
            base_url: config.rest_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_client(config: &ServiceConfig) -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        if let Some(key) = &config.rest_api_key {
            let mut value = HeaderValue::from_str(key).map_err(|e| {
                AppError::with_source(
                    ErrorCode::ConfigInvalidValue,
                    "API_KEY is not a valid header value",
                    e,
                )
            })?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.lookup_timeout)
            .gzip(true)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorCode::ConfigInvalidValue, "Failed to build HTTP client", e)
            })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify_transport_error(err: &reqwest::Error) -> LookupFailure {
        if err.is_timeout() {
            LookupFailure::Timeout
        } else if err.is_decode() {
            LookupFailure::InvalidResponse
        } else {
            LookupFailure::Connection
        }
    }
}

#[async_trait]
impl PointerLookup for ChainRestClient {
    async fn lookup(&self, query: LookupQuery<'_>) -> LookupOutcome {
        let url = format!("{}{}", self.base_url, query.direction.path());
        let start = Instant::now();

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("pointerType", query.pointer_type.code().to_string()),
                (query.direction.address_param(), query.address.to_string()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let failure = Self::classify_transport_error(&e);
                warn!(
                    address = %query.address,
                    pointer_type = %query.pointer_type,
                    endpoint = query.direction.path(),
                    code = failure.code().as_str(),
                    reason = %failure,
                    error = %e,
                    "⚠️ Pointer lookup failed"
                );
                return LookupOutcome::Unavailable(failure);
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(
                address = %query.address,
                pointer_type = %query.pointer_type,
                endpoint = query.direction.path(),
                rate_limited = true,
                "⏳ Chain REST rate limited (HTTP 429)"
            );
            return LookupOutcome::Unavailable(LookupFailure::RateLimited);
        }
        if !status.is_success() {
            warn!(
                address = %query.address,
                pointer_type = %query.pointer_type,
                endpoint = query.direction.path(),
                status = status.as_u16(),
                "⚠️ Pointer lookup returned error status"
            );
            return LookupOutcome::Unavailable(LookupFailure::HttpStatus(status.as_u16()));
        }

        match response.json::<PointerRecord>().await {
            Ok(record) => {
                debug!(
                    address = %query.address,
                    pointer_type = %query.pointer_type,
                    exists = record.exists,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Pointer lookup completed"
                );
                if record.exists {
                    LookupOutcome::Found(record)
                } else {
                    LookupOutcome::Absent
                }
            }
            Err(e) => {
                let failure = if e.is_timeout() {
                    LookupFailure::Timeout
                } else {
                    LookupFailure::InvalidResponse
                };
                warn!(
                    address = %query.address,
                    pointer_type = %query.pointer_type,
                    code = failure.code().as_str(),
                    reason = %failure,
                    error = %e,
                    "⚠️ Could not decode pointer lookup response"
                );
                LookupOutcome::Unavailable(failure)
            }
        }
    }
}
