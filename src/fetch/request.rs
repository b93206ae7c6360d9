//! HTTP request building.
//!
//! This module provides the headers every portal request carries.

use reqwest::header::{HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};

/// Browser-like request headers.
///
/// The portal serves its regular HTML only to requests that look like they come
/// from a browser navigating the site.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Content type of the login and calendar-settings bodies.
    pub(crate) const FORM_CONTENT_TYPE: &'static str = "application/x-www-form-urlencoded";

    /// Applies the standard request headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        builder
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
    }

    /// Applies the standard headers plus the form content type.
    pub(crate) fn apply_form_to_request_builder(
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        Self::apply_to_request_builder(builder).header(
            CONTENT_TYPE,
            HeaderValue::from_static(Self::FORM_CONTENT_TYPE),
        )
    }
}
