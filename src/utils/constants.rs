//! Constants Module - Single Source of Truth
//!
//! Address shapes, chain REST paths and service defaults used across the crate.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "SeiPointerApi";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for chain REST requests
pub const USER_AGENT: &str = concat!("SeiPointerApi/", env!("CARGO_PKG_VERSION"));

// ============================================
// ADDRESS SHAPES
// ============================================

pub const EVM_PREFIX: &str = "0x";
pub const EVM_ADDRESS_LEN: usize = 42;
pub const CW_PREFIX: &str = "sei1";
pub const CW_MIN_LEN: usize = 10;
pub const IBC_PREFIX: &str = "ibc/";
pub const FACTORY_PREFIX: &str = "factory/";

/// Upper bound on accepted address length
pub const MAX_ADDRESS_LEN: usize = 256;

/// Characters never accepted inside an address
pub const FORBIDDEN_ADDRESS_CHARS: [char; 7] = ['=', '[', ']', '{', '}', '<', '>'];

// ============================================
// NATIVE GAS TOKEN
// ============================================

/// Bank denom the EVM null address points to
pub const NATIVE_GAS_DENOM: &str = "usei";

// ============================================
// CHAIN REST
// ============================================

/// Default chain REST endpoint
pub const DEFAULT_SEIREST: &str = "https://rest.sei-apis.com";

/// Lookup a pointee by its pointer address
pub const POINTEE_PATH: &str = "/sei-protocol/seichain/evm/pointee";

/// Lookup a pointer by its pointee address
pub const POINTER_PATH: &str = "/sei-protocol/seichain/evm/pointer";

/// Header carrying the outbound chain REST key
pub const API_KEY_HEADER: &str = "x-api-key";

// ============================================
// SERVICE DEFAULTS
// ============================================

pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 500;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_MAX_BATCH_ANONYMOUS: usize = 25;
pub const DEFAULT_MAX_BATCH_TRUSTED: usize = 250;
pub const DEFAULT_BATCH_CONCURRENCY: usize = 16;
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 120;
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3003;

/// Interval for background cleanup of expired cache and rate-limit entries
pub const CLEANUP_INTERVAL_SECS: u64 = 60;

// ============================================
// SAMPLE ADDRESSES (CLI)
// ============================================

pub const SAMPLE_ADDRESSES: [&str; 3] = [
    "0x809FF4801aA5bDb33045d1fEC810D082490D63a4",
    "sei1eavtmc4y00a0ed8l9c7l0m7leesv3yetcptklv2kalz4tsgz02mqlvyea6",
    "ibc/CA6FBFAF399474A06263E10D0CE5AEBBE15189D6D4B2DD9ADE61007E68EB9DB0",
];
