//! Address format gate
//!
//! Purely syntactic: rejects anything that is not a recognizable EVM,
//! CosmWasm, IBC or factory address before it can reach the resolver.
//! Never touches the network.

use crate::models::{AddressFamily, AppError, AppResult};
use crate::utils::constants::{FORBIDDEN_ADDRESS_CHARS, MAX_ADDRESS_LEN};

/// Check whether `raw` is an address the resolver accepts
pub fn validate(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > MAX_ADDRESS_LEN {
        return false;
    }
    if raw.contains(&FORBIDDEN_ADDRESS_CHARS[..]) || raw.contains("..") {
        return false;
    }
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    AddressFamily::detect(raw) != AddressFamily::Unknown
}

/// Same gate as [`validate`], as a `Result` for `?` call sites
pub fn ensure_valid(raw: &str) -> AppResult<()> {
    if validate(raw) {
        Ok(())
    } else {
        Err(AppError::invalid_address(raw))
    }
}
