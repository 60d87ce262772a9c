//! Utils Module - Helper Functions & Shared Utilities
//!
//! Cache, address validation, constants and logging setup.

pub mod cache;
pub mod constants;
pub mod logging;
pub mod validator;

pub use cache::*;
pub use validator::*;
