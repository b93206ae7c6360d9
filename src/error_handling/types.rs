//! Error type definitions.
//!
//! This module defines all error types used throughout the client.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::models::CalendarMonth;
use crate::session::PageKind;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The subdomain does not form a valid portal URL.
    #[error("Portal URL error: {0}")]
    PortalUrlError(#[from] url::ParseError),
}

/// A required anchor, table, cell or value was missing from a page.
///
/// Extractors fail hard on these; only the documented per-row skips are
/// tolerated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A required element could not be found.
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    /// An element was found without a required attribute.
    #[error("<{element}> is missing its '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// A table row had fewer cells than expected.
    #[error("row {row} has no cell at index {index}")]
    MissingCell { row: usize, index: usize },

    /// A value was present but could not be interpreted.
    #[error("invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Errors surfaced by a [`Session`](crate::Session).
#[derive(Error, Debug)]
pub enum PortalError {
    /// The login redirect pointed back to the login form.
    #[error("Authentication failed: the portal redirected back to the login form")]
    AuthenticationFailure,

    /// The page request was redirected instead of returning content.
    #[error("Page '{0}' returned no content; the session is not logged in")]
    NotLoggedIn(PageKind),

    /// The page did not have the structure the extractor requires.
    #[error("Unexpected page structure: {0}")]
    UnexpectedStructure(#[from] StructureError),

    /// The requested calendar month has no representable `month_id`.
    #[error("Calendar month {0} is out of range")]
    InvalidMonth(CalendarMonth),

    /// Network, DNS, TLS or HTTP status failure from the transport.
    #[error("Transport error: {0}")]
    Transport(#[from] ReqwestError),

    /// A portal URL could not be built or a redirect target could not be resolved.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
