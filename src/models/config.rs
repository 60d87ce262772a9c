//! Service configuration
//!
//! Every knob is read from the environment with a default from
//! `utils/constants.rs`. Values that are present but unparsable are an
//! error, not a silent fallback.

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::errors::{AppError, AppResult};
use super::types::CallerTier;
use crate::utils::constants::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECS, DEFAULT_HOST,
    DEFAULT_LOOKUP_TIMEOUT_MS, DEFAULT_MAX_BATCH_ANONYMOUS, DEFAULT_MAX_BATCH_TRUSTED,
    DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT, DEFAULT_RATE_LIMIT_PER_MINUTE, DEFAULT_SEIREST,
};

/// How the resolver issues the candidate lookups for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupStrategy {
    /// All candidates at once, first positive in priority order wins
    #[default]
    Parallel,
    /// One at a time in priority order, stop at the first positive
    Sequential,
}

impl LookupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parallel => "parallel",
            Self::Sequential => "sequential",
        }
    }
}

impl FromStr for LookupStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parallel" => Ok(Self::Parallel),
            "sequential" => Ok(Self::Sequential),
            _ => Err(AppError::config_invalid("LOOKUP_STRATEGY", s)),
        }
    }
}

/// Batch size caps per caller tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub anonymous: usize,
    pub trusted: usize,
}

impl BatchLimits {
    pub fn for_tier(&self, tier: CallerTier) -> usize {
        match tier {
            CallerTier::Anonymous => self.anonymous,
            CallerTier::Trusted => self.trusted,
        }
    }
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            anonymous: DEFAULT_MAX_BATCH_ANONYMOUS,
            trusted: DEFAULT_MAX_BATCH_TRUSTED,
        }
    }
}

/// Configuration for the pointer service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Chain REST base URL
    pub rest_url: String,
    /// Outbound `x-api-key` for the chain REST service
    pub rest_api_key: Option<String>,
    /// Per-lookup timeout
    pub lookup_timeout: Duration,
    pub lookup_strategy: LookupStrategy,
    pub cache_max_entries: usize,
    pub cache_ttl: Duration,
    pub batch_limits: BatchLimits,
    /// Maximum addresses resolved concurrently within one batch
    pub batch_concurrency: usize,
    /// Inbound API keys that unlock the trusted tier
    pub api_keys: HashSet<String>,
    pub rate_limit_per_minute: u32,
    pub max_body_bytes: usize,
    pub host: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            rest_url: DEFAULT_SEIREST.to_string(),
            rest_api_key: None,
            lookup_timeout: Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
            lookup_strategy: LookupStrategy::default(),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            batch_limits: BatchLimits::default(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            api_keys: HashSet::new(),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Load from process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key/value source
    pub fn from_source<F>(get: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let rest_url = var("SEIREST")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.rest_url);

        // Key is never logged
        let rest_api_key = var("API_KEY");
        if rest_api_key.is_some() {
            info!("🔑 API_KEY configured for chain REST (key hidden)");
        }

        let lookup_timeout = parse_or(&var, "LOOKUP_TIMEOUT_MS", DEFAULT_LOOKUP_TIMEOUT_MS)
            .map(Duration::from_millis)?;
        let lookup_strategy = match var("LOOKUP_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => defaults.lookup_strategy,
        };

        let api_keys = var("POINTER_API_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            rest_url,
            rest_api_key,
            lookup_timeout,
            lookup_strategy,
            cache_max_entries: parse_or(&var, "CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?,
            cache_ttl: parse_or(&var, "CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)
                .map(Duration::from_secs)?,
            batch_limits: BatchLimits {
                anonymous: parse_or(&var, "MAX_BATCH_ANONYMOUS", DEFAULT_MAX_BATCH_ANONYMOUS)?,
                trusted: parse_or(&var, "MAX_BATCH_TRUSTED", DEFAULT_MAX_BATCH_TRUSTED)?,
            },
            batch_concurrency: parse_or(&var, "BATCH_CONCURRENCY", DEFAULT_BATCH_CONCURRENCY)?
                .max(1),
            api_keys,
            rate_limit_per_minute: parse_or(
                &var,
                "RATE_LIMIT_PER_MINUTE",
                DEFAULT_RATE_LIMIT_PER_MINUTE,
            )?,
            max_body_bytes: parse_or(&var, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_or(&var, "PORT", DEFAULT_PORT)?,
        })
    }
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::config_invalid(key, &raw)),
        None => Ok(default),
    }
}
