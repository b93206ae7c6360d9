//! Configuration constants.
//!
//! This module defines the portal endpoints, form bodies and network defaults
//! used throughout the client.

/// Second-level domain every School Loop portal lives under.
pub const PORTAL_DOMAIN: &str = "schoolloop.com";

/// Subdomain used when none is given on the command line or in the environment.
pub const DEFAULT_SUBDOMAIN: &str = "lhs-sfusd-ca";

// Portal paths
/// Login form target. Credentials are POSTed here.
pub const LOGIN_PATH: &str = "/portal/login?etarget=login_form";
/// Substring of a redirect target that means "back to the login form".
///
/// The portal answers a failed login by redirecting to the login page and a
/// successful one by redirecting to the student home page.
pub const LOGIN_PATH_MARKER: &str = "/portal/login";
/// Calendar settings endpoint (controls which event categories are shown).
pub const CALENDAR_SETTINGS_PATH: &str = "/calendar/setCalendarSettings";
/// Student home page: class list and current assignments.
pub const MAIN_PATH: &str = "/portal/student_home";
/// Dropbox listing of submitted files.
pub const DROPBOX_PATH: &str = "/student/drop_box";
/// Month grid of the calendar.
pub const CALENDAR_PATH: &str = "/calendar/month";

// Form fields
pub const LOGIN_NAME_FIELD: &str = "login_name";
pub const PASSWORD_FIELD: &str = "password";
/// Image-button coordinates the login form submits alongside the credentials.
pub const LOGIN_BUTTON_FIELDS: [(&str, &str); 2] = [("event.login.x", "0"), ("event.login.y", "0")];

/// Calendar settings body enabling assigned, due, public, group and personal events.
pub const CALENDAR_SETTINGS_BODY: &str =
    "assigned=true&due=true&public=true&ugroups=true&uevents=true&x=0&y=0";

// Network defaults
/// Per-request timeout in seconds.
/// The portal is slow; 30s leaves headroom for the calendar page.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirect hops to follow while interception is disabled.
/// Prevents infinite redirect loops.
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Environment variables backing the credential flags
pub const ENV_USERNAME: &str = "SCHOOLLOOP_USERNAME";
pub const ENV_PASSWORD: &str = "SCHOOLLOOP_PASSWORD";
pub const ENV_SUBDOMAIN: &str = "SCHOOLLOOP_SUBDOMAIN";
