//! Error handling.
//!
//! Errors are categorized into:
//! - **Initialization**: logger and HTTP client setup
//! - **Portal**: authentication failure, missing content, transport failure
//! - **Structure**: a page lacks an anchor an extractor requires
//!
//! Nothing is retried; every error propagates to the caller as-is.

mod types;

// Re-export public API
pub use types::{InitializationError, PortalError, StructureError};
