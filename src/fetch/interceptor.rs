//! Redirect interception.
//!
//! The portal answers both the login form and ordinary page requests with a
//! redirect whose target is informative rather than navigational. Following it
//! costs an extra round trip on a very slow site, so the transport consults a
//! [`RedirectInterceptor`] on every redirect and, unless interception is
//! disabled, turns the target into a [`RedirectOutcome`] instead.
//!
//! The mode is a single flag owned by one session. It is not reentrant: two
//! operations arming the same interceptor at once is a caller error.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::config::LOGIN_PATH_MARKER;

/// How the next redirect is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InterceptMode {
    /// Follow redirects normally.
    Disabled = 0,
    /// Classify the target as a login success or failure.
    LoginProbe = 1,
    /// Stop at the redirect and hand its target back.
    Capture = 2,
}

impl InterceptMode {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => InterceptMode::LoginProbe,
            2 => InterceptMode::Capture,
            _ => InterceptMode::Disabled,
        }
    }
}

/// What an intercepted redirect meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Login redirect went anywhere but the login form.
    AuthSuccess,
    /// Login redirect went back to the login form.
    AuthFailure,
    /// Captured redirect target (absolute URL).
    Target(String),
}

/// Mode-driven redirect policy shared between a session and its transport.
#[derive(Debug, Default)]
pub struct RedirectInterceptor {
    // Atomic only because reqwest's redirect hook must be Send + Sync.
    mode: AtomicU8,
}

impl RedirectInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> InterceptMode {
        InterceptMode::from_u8(self.mode.load(Ordering::Relaxed))
    }

    /// Sets the mode directly. Prefer [`arm`](Self::arm), which disarms on drop.
    pub fn set_mode(&self, mode: InterceptMode) {
        self.mode.store(mode as u8, Ordering::Relaxed);
    }

    /// Arms the interceptor for the duration of the returned guard.
    ///
    /// Dropping the guard restores [`InterceptMode::Disabled`], including when
    /// the guarded exchange bails out early with `?`.
    pub fn arm(&self, mode: InterceptMode) -> ArmedInterceptor<'_> {
        self.set_mode(mode);
        ArmedInterceptor { interceptor: self }
    }

    /// Decides what to do with a redirect to `target`.
    ///
    /// Returns `None` when the redirect should be followed.
    pub fn intercept(&self, target: &str) -> Option<RedirectOutcome> {
        match self.mode() {
            InterceptMode::Disabled => None,
            InterceptMode::LoginProbe => Some(classify_login_redirect(target)),
            InterceptMode::Capture => Some(RedirectOutcome::Target(target.to_string())),
        }
    }
}

/// Guard returned by [`RedirectInterceptor::arm`].
#[derive(Debug)]
pub struct ArmedInterceptor<'a> {
    interceptor: &'a RedirectInterceptor,
}

impl Drop for ArmedInterceptor<'_> {
    fn drop(&mut self) {
        self.interceptor.set_mode(InterceptMode::Disabled);
    }
}

/// Any redirect back to the login path is a failure; anything else is a success.
pub fn classify_login_redirect(target: &str) -> RedirectOutcome {
    if target.contains(LOGIN_PATH_MARKER) {
        RedirectOutcome::AuthFailure
    } else {
        RedirectOutcome::AuthSuccess
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_disabled() {
        let interceptor = RedirectInterceptor::new();
        assert_eq!(interceptor.mode(), InterceptMode::Disabled);
        assert_eq!(
            interceptor.intercept("https://demo.schoolloop.com/portal/student_home"),
            None
        );
    }

    #[test]
    fn test_login_probe_failure_on_login_path() {
        let interceptor = RedirectInterceptor::new();
        let _armed = interceptor.arm(InterceptMode::LoginProbe);
        for target in [
            "https://demo.schoolloop.com/portal/login",
            "https://demo.schoolloop.com/portal/login?etarget=login_form&d=x",
            "/portal/login?etarget=login_form",
        ] {
            assert_eq!(
                interceptor.intercept(target),
                Some(RedirectOutcome::AuthFailure),
                "{} should be classified as a failure",
                target
            );
        }
    }

    #[test]
    fn test_login_probe_success_elsewhere() {
        let interceptor = RedirectInterceptor::new();
        let _armed = interceptor.arm(InterceptMode::LoginProbe);
        for target in [
            "https://demo.schoolloop.com/portal/student_home",
            "/portal/student_home?d=x",
            "https://demo.schoolloop.com/",
        ] {
            assert_eq!(
                interceptor.intercept(target),
                Some(RedirectOutcome::AuthSuccess),
                "{} should be classified as a success",
                target
            );
        }
    }

    #[test]
    fn test_capture_returns_target_verbatim() {
        let interceptor = RedirectInterceptor::new();
        let _armed = interceptor.arm(InterceptMode::Capture);
        let target = "https://demo.schoolloop.com/portal/login?return=%2Fstudent%2Fdrop_box";
        assert_eq!(
            interceptor.intercept(target),
            Some(RedirectOutcome::Target(target.to_string()))
        );
    }

    #[test]
    fn test_guard_disarms_on_drop() {
        let interceptor = RedirectInterceptor::new();
        {
            let _armed = interceptor.arm(InterceptMode::Capture);
            assert_eq!(interceptor.mode(), InterceptMode::Capture);
        }
        assert_eq!(interceptor.mode(), InterceptMode::Disabled);
    }

    #[test]
    fn test_guard_disarms_on_early_return() {
        fn probe(interceptor: &RedirectInterceptor) -> Result<(), &'static str> {
            let _armed = interceptor.arm(InterceptMode::LoginProbe);
            Err::<(), _>("transport failed")?;
            Ok(())
        }

        let interceptor = RedirectInterceptor::new();
        assert!(probe(&interceptor).is_err());
        assert_eq!(interceptor.mode(), InterceptMode::Disabled);
    }
}
