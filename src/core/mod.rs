//! Core Module - Classification Engine
//!
//! Address classifier, resolution engine and batch coordinator.

pub mod batch;
pub mod classifier;
pub mod resolver;

pub use batch::*;
pub use classifier::*;
pub use resolver::*;
