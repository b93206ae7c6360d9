//! Authenticated portal session.
//!
//! A [`Session`] owns the portal origin, the transport, the redirect
//! interceptor, the page cache and the memoized portal timezone. Every
//! operation takes `&mut self`, so one session serves one logical operation at
//! a time; the interceptor relies on that.

mod cache;

use std::sync::Arc;

use log::{debug, info, warn};
use reqwest::Url;
use scraper::Html;

use crate::config::{
    Config, Protocol, CALENDAR_SETTINGS_BODY, CALENDAR_SETTINGS_PATH, LOGIN_BUTTON_FIELDS,
    LOGIN_NAME_FIELD, LOGIN_PATH, PASSWORD_FIELD, PORTAL_DOMAIN,
};
use crate::error_handling::{InitializationError, PortalError};
use crate::fetch::{
    Exchange, HttpTransport, InterceptMode, RedirectInterceptor, RedirectOutcome, Transport,
};
use crate::initialization::init_client;
use crate::models::{AssignmentRecord, CalendarEvent, CalendarMonth, ClassRecord, DropboxRecord};
use crate::parse::timezone::month_id;
use crate::parse::{
    extract_assignments, extract_classes, extract_dropbox, extract_events, infer_utc_offset,
};

pub use cache::{CachedPage, PageCache, PageKey, PageKind};

/// Builds `{scheme}://{subdomain}.schoolloop.com/`.
///
/// # Errors
///
/// Returns an error if the subdomain does not form a valid host.
pub fn portal_origin(subdomain: &str, protocol: Protocol) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{}://{}.{}/",
        protocol.scheme(),
        subdomain,
        PORTAL_DOMAIN
    ))
}

/// Form body of the login POST.
pub fn login_form_body(username: &str, password: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(LOGIN_NAME_FIELD, username)
        .append_pair(PASSWORD_FIELD, password)
        .extend_pairs(LOGIN_BUTTON_FIELDS)
        .finish()
}

/// A logged-in (or not yet logged-in) connection to one portal.
///
/// # Examples
///
/// ```no_run
/// use schoolloop::{Config, Session};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::new(&Config::default())?;
/// if session.login("jdoe", "secret").await? {
///     for class in session.class_list().await? {
///         println!("{}", class);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<T: Transport = HttpTransport> {
    origin: Url,
    transport: T,
    interceptor: Arc<RedirectInterceptor>,
    cache: PageCache,
    calendar_settings_applied: bool,
    utc_offset: Option<i32>,
}

impl Session<HttpTransport> {
    /// Creates a session against `{scheme}://{subdomain}.schoolloop.com`.
    ///
    /// # Errors
    ///
    /// Returns an error if the portal URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        let origin = portal_origin(&config.subdomain, config.protocol)?;
        let interceptor = Arc::new(RedirectInterceptor::new());
        let client = init_client(config, Arc::clone(&interceptor))?;
        let transport = HttpTransport::new(client, Arc::clone(&interceptor));
        Ok(Self::with_transport(origin, transport, interceptor))
    }
}

impl<T: Transport> Session<T> {
    /// Creates a session over an arbitrary transport.
    ///
    /// `interceptor` must be the one `transport` consults on redirects.
    pub fn with_transport(
        origin: Url,
        transport: T,
        interceptor: Arc<RedirectInterceptor>,
    ) -> Self {
        Self {
            origin,
            transport,
            interceptor,
            cache: PageCache::new(),
            calendar_settings_applied: false,
            utc_offset: None,
        }
    }

    /// Pages fetched so far.
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Portal UTC offset in standard time, once a calendar has been read.
    pub fn utc_offset(&self) -> Option<i32> {
        self.utc_offset
    }

    fn url(&self, path_and_query: &str) -> Result<Url, PortalError> {
        Ok(self.origin.join(path_and_query)?)
    }

    /// Submits the login form and reports whether the portal accepted it.
    ///
    /// The portal answers with a redirect either way; a redirect back to the
    /// login form is a rejection, any other redirect is a success. A response
    /// without a redirect is treated as a rejection.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<bool, PortalError> {
        let url = self.url(LOGIN_PATH)?;
        let body = login_form_body(username, password);

        let exchange = {
            let _armed = self.interceptor.arm(InterceptMode::LoginProbe);
            self.transport.post_form(&url, body).await?
        };

        let accepted = match exchange {
            Exchange::Intercepted(RedirectOutcome::AuthSuccess) => true,
            Exchange::Intercepted(RedirectOutcome::AuthFailure) => false,
            Exchange::Intercepted(RedirectOutcome::Target(target)) => {
                warn!("Login redirect to {} was captured instead of classified", target);
                false
            }
            Exchange::Followed(_) => {
                debug!("Login form answered without a redirect");
                false
            }
        };
        info!(
            "Login as '{}' on {} {}",
            username,
            self.origin,
            if accepted { "succeeded" } else { "failed" }
        );
        Ok(accepted)
    }

    /// Logs in, failing with `AuthenticationFailure` if the portal rejects the
    /// credentials.
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(), PortalError> {
        if self.login(username, password).await? {
            Ok(())
        } else {
            Err(PortalError::AuthenticationFailure)
        }
    }

    /// Whether the student home page currently returns content.
    ///
    /// Always goes to the network; the result is not cached.
    pub async fn login_status(&self) -> Result<bool, PortalError> {
        let key = PageKey::new(PageKind::Main, None);
        Ok(self.capture_get(&key).await?.is_some())
    }

    /// Returns the page for `(kind, params)`, fetching it on first use.
    ///
    /// A page answered with a redirect is cached as unloaded; callers treat it
    /// as "not logged in".
    pub async fn page(
        &mut self,
        kind: PageKind,
        params: Option<&str>,
    ) -> Result<&CachedPage, PortalError> {
        let key = PageKey::new(kind, params);
        let body = if self.cache.contains(&key) {
            debug!("Cache hit for {}", key.path_and_query());
            None
        } else {
            self.capture_get(&key).await?
        };
        // An existing entry wins, so a cache hit returns the stored page.
        Ok(self.cache.insert(CachedPage::new(key, body)))
    }

    /// Parsed document of a page, or `NotLoggedIn` if it came back as a redirect.
    pub async fn document(
        &mut self,
        kind: PageKind,
        params: Option<&str>,
    ) -> Result<&Html, PortalError> {
        self.page(kind, params)
            .await?
            .document
            .as_ref()
            .ok_or(PortalError::NotLoggedIn(kind))
    }

    async fn capture_get(&self, key: &PageKey) -> Result<Option<String>, PortalError> {
        let url = self.url(&key.path_and_query())?;
        let _armed = self.interceptor.arm(InterceptMode::Capture);
        match self.transport.get(&url).await? {
            Exchange::Followed(body) => Ok(Some(body)),
            Exchange::Intercepted(outcome) => {
                debug!("{} page redirected instead of loading: {:?}", key.kind, outcome);
                Ok(None)
            }
        }
    }

    /// Enables every calendar event category, once per session.
    pub async fn ensure_calendar_visibility(&mut self) -> Result<(), PortalError> {
        if self.calendar_settings_applied {
            return Ok(());
        }
        let url = self.url(CALENDAR_SETTINGS_PATH)?;
        {
            let _armed = self.interceptor.arm(InterceptMode::Capture);
            self.transport
                .post_form(&url, CALENDAR_SETTINGS_BODY.to_string())
                .await?;
        }
        self.calendar_settings_applied = true;
        debug!("Calendar settings applied");
        Ok(())
    }

    /// Classes listed on the student home page.
    pub async fn class_list(&mut self) -> Result<Vec<ClassRecord>, PortalError> {
        let document = self.document(PageKind::Main, None).await?;
        Ok(extract_classes(document)?)
    }

    /// Files submitted to the dropbox.
    pub async fn dropbox_files(&mut self) -> Result<Vec<DropboxRecord>, PortalError> {
        let document = self.document(PageKind::Dropbox, None).await?;
        Ok(extract_dropbox(document)?)
    }

    /// Current assignments, optionally only those of the class named `class_filter`.
    pub async fn assignment_list(
        &mut self,
        class_filter: Option<&str>,
    ) -> Result<Vec<AssignmentRecord>, PortalError> {
        let document = self.document(PageKind::Main, None).await?;
        let assignments = extract_assignments(document)?;
        Ok(match class_filter {
            Some(class_name) => assignments
                .into_iter()
                .filter(|assignment| assignment.class_name == class_name)
                .collect(),
            None => assignments,
        })
    }

    /// Events of `month`, or of the portal's current month when `None`.
    pub async fn calendar(
        &mut self,
        month: Option<CalendarMonth>,
    ) -> Result<Vec<CalendarEvent>, PortalError> {
        self.ensure_calendar_visibility().await?;
        let utc_offset = self.portal_utc_offset().await?;

        let params = month
            .map(|month| {
                month_id(month.year, month.month, utc_offset)
                    .map(|id| format!("month_id={}", id))
                    .ok_or(PortalError::InvalidMonth(month))
            })
            .transpose()?;

        let document = self.document(PageKind::Calendar, params.as_deref()).await?;
        Ok(extract_events(document, utc_offset)?)
    }

    /// Memoized portal offset, inferred from the default calendar page.
    async fn portal_utc_offset(&mut self) -> Result<i32, PortalError> {
        if let Some(offset) = self.utc_offset {
            return Ok(offset);
        }
        let document = self.document(PageKind::Calendar, None).await?;
        let offset = infer_utc_offset(document)?;
        info!("Portal timezone is UTC{:+}", offset);
        self.utc_offset = Some(offset);
        Ok(offset)
    }
}
