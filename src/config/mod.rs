//! Application configuration and constants.
//!
//! This module provides:
//! - Portal endpoints, form bodies and network defaults
//! - CLI option types and parsing
//! - The library [`Config`]

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt, OutputFormat, Protocol};
