//! HTTP redirect target resolution.

use reqwest::header::LOCATION;
use reqwest::Url;

/// Resolves a `Location` header value against the URL that produced it.
///
/// Absolute locations are returned as-is; relative ones are joined onto `base`.
///
/// # Errors
///
/// Returns an error if the location cannot be parsed even relative to `base`.
pub fn resolve_location(base: &Url, location: &str) -> Result<Url, url::ParseError> {
    Url::parse(location).or_else(|_| base.join(location))
}

/// Returns the absolute redirect target of a 3xx response.
///
/// Returns `Ok(None)` when the response is not a redirect, or is a redirect
/// without a `Location` header (logged; treated as ordinary content).
pub fn redirect_target(response: &reqwest::Response) -> Result<Option<Url>, url::ParseError> {
    let status = response.status();
    if !status.is_redirection() {
        return Ok(None);
    }
    match response.headers().get(LOCATION) {
        Some(loc) => {
            // Non-ASCII bytes are decoded lossily; the target path survives
            let loc = String::from_utf8_lossy(loc.as_bytes());
            resolve_location(response.url(), &loc).map(Some)
        }
        None => {
            // Redirect status but no Location header - this is unusual
            log::warn!(
                "Redirect status {} for {} but no Location header",
                status.as_u16(),
                response.url()
            );
            Ok(None)
        }
    }
}
