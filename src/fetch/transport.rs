//! HTTP transport.
//!
//! A [`Transport`] issues requests, keeps cookies across them, and reports a
//! redirect as an [`Exchange::Intercepted`] outcome whenever the shared
//! [`RedirectInterceptor`] asks for it. [`HttpTransport`] is the reqwest-backed
//! implementation used against the real portal.

use std::sync::Arc;

use log::debug;
use reqwest::Url;

use crate::error_handling::PortalError;
use crate::fetch::interceptor::{RedirectInterceptor, RedirectOutcome};
use crate::fetch::redirects::redirect_target;
use crate::fetch::request::RequestHeaders;

/// Result of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    /// The request produced content (after any followed redirects).
    Followed(String),
    /// A redirect was stopped and classified by the interceptor.
    Intercepted(RedirectOutcome),
}

/// Request/response collaborator of a [`Session`](crate::Session).
///
/// Implementations must keep cookies between calls and consult the session's
/// interceptor on every redirect instead of following it blindly.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Issues a GET request.
    async fn get(&self, url: &Url) -> Result<Exchange, PortalError>;

    /// Issues a POST with an `application/x-www-form-urlencoded` body.
    async fn post_form(&self, url: &Url, body: String) -> Result<Exchange, PortalError>;
}

/// reqwest-backed transport with an in-memory cookie jar.
///
/// The client must have been built by
/// [`init_client`](crate::initialization::init_client) with the same
/// interceptor, so that its redirect policy stops at redirects the
/// interceptor wants to see.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    interceptor: Arc<RedirectInterceptor>,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client, interceptor: Arc<RedirectInterceptor>) -> Self {
        Self {
            client,
            interceptor,
        }
    }

    async fn exchange(&self, request: reqwest::RequestBuilder) -> Result<Exchange, PortalError> {
        let response = request.send().await?;

        if let Some(target) = redirect_target(&response)? {
            if let Some(outcome) = self.interceptor.intercept(target.as_str()) {
                debug!(
                    "Intercepted {} redirect from {} to {}: {:?}",
                    response.status().as_u16(),
                    response.url(),
                    target,
                    outcome
                );
                return Ok(Exchange::Intercepted(outcome));
            }
        }

        let response = response.error_for_status()?;
        debug!("{} {}", response.status().as_u16(), response.url());
        Ok(Exchange::Followed(response.text().await?))
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Exchange, PortalError> {
        debug!("GET {}", url);
        let request = RequestHeaders::apply_to_request_builder(self.client.get(url.clone()));
        self.exchange(request).await
    }

    async fn post_form(&self, url: &Url, body: String) -> Result<Exchange, PortalError> {
        debug!("POST {}", url);
        let request =
            RequestHeaders::apply_form_to_request_builder(self.client.post(url.clone())).body(body);
        self.exchange(request).await
    }
}
