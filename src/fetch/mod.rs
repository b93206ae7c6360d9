//! HTTP plumbing: redirect interception, redirect target resolution and the
//! transport abstraction the session talks through.

pub mod interceptor;
mod redirects;
mod request;
pub mod transport;

pub use interceptor::{classify_login_redirect, InterceptMode, RedirectInterceptor, RedirectOutcome};
pub use redirects::resolve_location;
pub use transport::{Exchange, HttpTransport, Transport};
