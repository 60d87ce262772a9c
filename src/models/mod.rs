//! Models Module - Data Structures & Configuration
//!
//! Domain types, error codes and service configuration.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
