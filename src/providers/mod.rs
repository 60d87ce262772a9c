//! Providers Module - External Data Sources
//!
//! Pointer registry lookups against the chain REST gateway.

pub mod chain_rest;
pub mod lookup;

pub use chain_rest::*;
pub use lookup::*;
