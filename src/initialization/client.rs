//! HTTP client initialization.
//!
//! This module builds the reqwest client the portal transport runs on.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS};
use crate::fetch::{InterceptMode, RedirectInterceptor};

/// Initializes the HTTP client for a portal session.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header and timeout from the configuration
/// - An in-memory cookie jar, so the portal session cookie set at login is sent
///   with every later request
/// - A redirect policy that stops at any redirect while `interceptor` is armed
///   and otherwise follows up to `MAX_REDIRECT_HOPS` hops
///
/// # Arguments
///
/// * `config` - Library configuration containing user-agent and timeout settings
/// * `interceptor` - Redirect interceptor shared with the session
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(
    config: &Config,
    interceptor: Arc<RedirectInterceptor>,
) -> Result<reqwest::Client, reqwest::Error> {
    let jar = Arc::new(Jar::default());

    let policy = Policy::custom(move |attempt| {
        if interceptor.mode() != InterceptMode::Disabled {
            // Hand the 3xx response back; the transport classifies its target.
            attempt.stop()
        } else if attempt.previous().len() > MAX_REDIRECT_HOPS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    });

    ClientBuilder::new()
        .cookie_provider(jar)
        .redirect(policy)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
}
