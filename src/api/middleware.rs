//! API Middleware (Auth, Rate Limiting, Logging)

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::handlers::AppState;
use crate::models::{AppError, CallerTier};
use crate::utils::constants::{API_KEY_HEADER, CLEANUP_INTERVAL_SECS};

/// Rate limiter configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests per window
    pub requests_per_window: u32,
    pub window_duration: Duration,
}

impl RateLimitConfig {
    pub fn per_minute(requests: u32) -> Self {
        Self {
            requests_per_window: requests,
            window_duration: Duration::from_secs(60),
        }
    }
}

/// Fixed-window rate limiter keyed by API key or client IP
pub struct RateLimiter {
    requests: DashMap<String, (u32, Instant)>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: DashMap::new(),
            config,
        }
    }

    /// Check if request is allowed, returns (allowed, remaining, reset_seconds)
    pub fn check(&self, key: &str) -> (bool, u32, u64) {
        let now = Instant::now();

        let mut entry = self.requests.entry(key.to_string()).or_insert((0, now));

        // Reset window if expired
        if now.duration_since(entry.1) > self.config.window_duration {
            entry.0 = 0;
            entry.1 = now;
        }

        let reset_secs = self
            .config
            .window_duration
            .saturating_sub(now.duration_since(entry.1))
            .as_secs();

        if entry.0 >= self.config.requests_per_window {
            return (false, 0, reset_secs);
        }

        entry.0 += 1;
        let remaining = self.config.requests_per_window - entry.0;
        (true, remaining, reset_secs)
    }

    /// Drop windows that ended long ago, returning how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.requests.len();
        let window = self.config.window_duration;
        self.requests
            .retain(|_, (_, started)| now.duration_since(*started) < window * 2);
        before.saturating_sub(self.requests.len())
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

fn is_health_path(request: &Request) -> bool {
    request.uri().path() == "/health"
}

/// API key authentication middleware.
///
/// Known key → trusted tier, unknown key → 401, no key → anonymous tier.
/// The tier is attached to the request as an extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let tier = match api_key(request.headers()) {
        Some(key) if state.api_keys.contains(key) => CallerTier::Trusted,
        Some(_) if is_health_path(&request) => CallerTier::Anonymous,
        Some(_) => {
            warn!("Invalid API key attempted");
            return Err(AppError::unauthorized());
        }
        None => CallerTier::Anonymous,
    };

    request.extensions_mut().insert(tier);
    Ok(next.run(request).await)
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if is_health_path(&request) {
        return next.run(request).await;
    }

    // Known API key first, then client IP. Runs ahead of auth, so guesses
    // with unknown keys are throttled per IP.
    let headers = request.headers();
    let rate_key = api_key(headers)
        .filter(|key| state.api_keys.contains(*key))
        .map(|key| format!("key:{}", key))
        .unwrap_or_else(|| {
            let ip = headers
                .get("x-forwarded-for")
                .or_else(|| headers.get("x-real-ip"))
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .unwrap_or("unknown");
            format!("ip:{}", ip)
        });

    let (allowed, remaining, reset) = state.rate_limiter.check(&rate_key);

    let mut response = if allowed {
        next.run(request).await
    } else {
        warn!(key = %rate_key, "⏳ Rate limit exceeded");
        AppError::rate_limited(reset).into_response()
    };

    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
    headers.insert("X-RateLimit-Reset", HeaderValue::from(reset));
    response
}

/// Request logging middleware; tags each response with `x-request-id`
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4().to_string();

    let mut response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "Request completed"
    );

    response
}

/// Background sweep of expired cache entries and stale rate-limit windows
pub fn start_cleanup_task(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let expired = state.coordinator.cache().cleanup_expired();
            let windows = state.rate_limiter.cleanup();
            debug!(
                expired_entries = expired,
                rate_limit_windows = windows,
                "🧹 Cleanup pass finished"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_window() {
        let limiter = RateLimiter::new(RateLimitConfig::per_minute(2));

        let (allowed, remaining, reset) = limiter.check("ip:1.2.3.4");
        assert!(allowed);
        assert_eq!(remaining, 1);
        assert!(reset <= 60);
        let (allowed, remaining, _) = limiter.check("ip:1.2.3.4");
        assert!(allowed);
        assert_eq!(remaining, 0);
        let (allowed, remaining, _) = limiter.check("ip:1.2.3.4");
        assert!(!allowed);
        assert_eq!(remaining, 0);

        // other callers have their own window
        assert!(limiter.check("ip:5.6.7.8").0);
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn test_cleanup_keeps_fresh_windows() {
        let limiter = RateLimiter::new(RateLimitConfig::per_minute(10));
        limiter.check("key:alpha");
        assert_eq!(limiter.cleanup(), 0);
        assert!(!limiter.is_empty());
    }
}
