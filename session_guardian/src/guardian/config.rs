use std::time::Duration;

use crate::config::{
    GUARDIAN_CHECK_ON_START, GUARDIAN_MEMBER_ROLE, GUARDIAN_REFRESH_INTERVAL,
    GUARDIAN_SIGNIN_URL, GUARDIAN_VALIDATOR_TOLERANCE,
};
use crate::cookie::{
    ACCESS_TOKEN_COOKIE_NAME, CookieAttributes, MEMBER_COOKIE_NAME, REFRESH_TOKEN_COOKIE_NAME,
};
use crate::guardian::errors::GuardianError;
use crate::guardian::types::ValidationPolicy;

/// Everything a [`Guardian`](crate::Guardian) needs to know besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianSettings {
    pub refresh_interval: Duration,
    pub signin_url: String,
    pub role: String,
    pub refresh_cookie: String,
    pub access_cookie: String,
    pub member_cookie: String,
    pub cookie_attributes: CookieAttributes,
    pub validation_policy: ValidationPolicy,
    pub check_on_start: bool,
}

impl Default for GuardianSettings {
    fn default() -> Self {
        Self::from_env()
    }
}

impl GuardianSettings {
    /// Settings taken from the `GUARDIAN_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            refresh_interval: *GUARDIAN_REFRESH_INTERVAL,
            signin_url: GUARDIAN_SIGNIN_URL.to_string(),
            role: GUARDIAN_MEMBER_ROLE.to_string(),
            refresh_cookie: REFRESH_TOKEN_COOKIE_NAME.to_string(),
            access_cookie: ACCESS_TOKEN_COOKIE_NAME.to_string(),
            member_cookie: MEMBER_COOKIE_NAME.to_string(),
            cookie_attributes: CookieAttributes::default(),
            validation_policy: ValidationPolicy::from_tolerance(*GUARDIAN_VALIDATOR_TOLERANCE),
            check_on_start: *GUARDIAN_CHECK_ON_START,
        }
    }

    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    pub fn with_signin_url(mut self, signin_url: impl Into<String>) -> Self {
        self.signin_url = signin_url.into();
        self
    }

    pub fn with_cookie_attributes(mut self, cookie_attributes: CookieAttributes) -> Self {
        self.cookie_attributes = cookie_attributes;
        self
    }

    pub fn with_validation_policy(mut self, validation_policy: ValidationPolicy) -> Self {
        self.validation_policy = validation_policy;
        self
    }

    pub fn with_check_on_start(mut self, check_on_start: bool) -> Self {
        self.check_on_start = check_on_start;
        self
    }

    /// Whether a tick, which makes up to two requests in a row, can run past
    /// the next scheduled tick when each request takes up to `timeout`.
    pub(crate) fn tick_may_outlast_interval(&self, timeout: Duration) -> bool {
        timeout.saturating_mul(2) >= self.refresh_interval
    }

    pub(crate) fn validate(&self) -> Result<(), GuardianError> {
        if self.refresh_interval.is_zero() {
            return Err(GuardianError::InvalidSettings(
                "refresh interval must be positive".to_string(),
            ));
        }
        if self.signin_url.trim().is_empty() {
            return Err(GuardianError::InvalidSettings(
                "sign-in URL must not be empty".to_string(),
            ));
        }
        if self.role.trim().is_empty() {
            return Err(GuardianError::InvalidSettings(
                "role must not be empty".to_string(),
            ));
        }
        let cookies = [&self.refresh_cookie, &self.access_cookie, &self.member_cookie];
        if cookies.iter().any(|name| name.trim().is_empty()) {
            return Err(GuardianError::InvalidSettings(
                "cookie names must not be empty".to_string(),
            ));
        }
        if self.refresh_cookie == self.access_cookie {
            return Err(GuardianError::InvalidSettings(
                "refresh and access tokens need distinct cookies".to_string(),
            ));
        }
        Ok(())
    }
}
