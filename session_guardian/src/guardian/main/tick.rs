use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, watch};

use crate::authority::{
    Identity, TokenAuthority, ValidityProbe, probe_token_validity, refresh_access_token,
};
use crate::cookie::{CookieStore, get_cookie, set_cookie};
use crate::guardian::config::GuardianSettings;
use crate::guardian::errors::GuardianError;
use crate::guardian::types::{
    GuardianState, LogoutReason, RefreshFailure, TickOutcome, ValidationPolicy,
};
use crate::utils::redact_token;

use super::logout::{Redirector, terminate_session};

/// Keeps the member's access token fresh for as long as the refresh token is accepted.
///
/// Each [`tick`](Guardian::tick) validates the refresh token and, when it is
/// valid, renews the access token cookie. A missing or rejected refresh token
/// ends the session.
pub struct Guardian {
    cookies: Arc<dyn CookieStore>,
    authority: Arc<dyn TokenAuthority>,
    redirector: Arc<dyn Redirector>,
    settings: GuardianSettings,
    state: watch::Sender<GuardianState>,
    // Held for the whole tick so ticks never overlap.
    tick_lock: Mutex<TickMemory>,
}

#[derive(Debug, Default)]
struct TickMemory {
    consecutive_unknown: u32,
}

impl Guardian {
    pub fn new(
        cookies: Arc<dyn CookieStore>,
        authority: Arc<dyn TokenAuthority>,
        redirector: Arc<dyn Redirector>,
        settings: GuardianSettings,
    ) -> Result<Self, GuardianError> {
        settings.validate()?;
        let stall = authority
            .request_timeout()
            .filter(|timeout| settings.tick_may_outlast_interval(*timeout));
        if let Some(timeout) = stall {
            tracing::warn!(
                "Request timeout {:?} is too long for a refresh interval of {:?}, \
                 a stalled tick will delay the next one",
                timeout,
                settings.refresh_interval
            );
        }
        let (state, _) = watch::channel(GuardianState::Idle);

        Ok(Self {
            cookies,
            authority,
            redirector,
            settings,
            state,
            tick_lock: Mutex::new(TickMemory::default()),
        })
    }

    pub fn settings(&self) -> &GuardianSettings {
        &self.settings
    }

    pub fn state(&self) -> GuardianState {
        *self.state.borrow()
    }

    /// Watch state transitions as they happen.
    pub fn subscribe(&self) -> watch::Receiver<GuardianState> {
        self.state.subscribe()
    }

    /// Run one check/renew cycle.
    ///
    /// Returns [`TickOutcome::Skipped`] without doing anything if another tick
    /// is still in flight.
    pub async fn tick(&self) -> Result<TickOutcome, GuardianError> {
        let Ok(mut memory) = self.tick_lock.try_lock() else {
            tracing::debug!("Previous tick still running, skipping");
            return Ok(TickOutcome::Skipped);
        };
        self.run_tick(&mut memory).await
    }

    #[tracing::instrument(skip_all)]
    async fn run_tick(&self, memory: &mut TickMemory) -> Result<TickOutcome, GuardianError> {
        let cookies = self.cookies.as_ref();
        let refresh_token =
            get_cookie(cookies, &self.settings.refresh_cookie)?.filter(|t| !t.is_empty());
        let username =
            get_cookie(cookies, &self.settings.member_cookie)?.filter(|u| !u.is_empty());

        let Some(refresh_token) = refresh_token else {
            tracing::error!("Refresh token not found.");
            return Ok(self.logout(LogoutReason::MissingCredential));
        };

        self.transition(GuardianState::Checking);
        tracing::debug!("Checking refresh token {}", redact_token(&refresh_token));

        match probe_token_validity(self.authority.as_ref(), &refresh_token).await {
            ValidityProbe::Valid => memory.consecutive_unknown = 0,
            ValidityProbe::Invalid => {
                memory.consecutive_unknown = 0;
                tracing::error!("Refresh token is not valid.");
                self.transition(GuardianState::Invalid);
                return Ok(self.logout(LogoutReason::TokenInvalid));
            }
            ValidityProbe::Unknown(e) => {
                memory.consecutive_unknown += 1;
                if let Some(outcome) = self.defer_unknown(memory.consecutive_unknown) {
                    tracing::warn!(
                        "Validator unreachable ({}), {} consecutive tick(s), keeping session",
                        e,
                        memory.consecutive_unknown
                    );
                    return Ok(outcome);
                }
                memory.consecutive_unknown = 0;
                tracing::error!("Validator unreachable, treating refresh token as invalid.");
                self.transition(GuardianState::Invalid);
                return Ok(self.logout(LogoutReason::ValidatorUnreachable));
            }
        }

        self.transition(GuardianState::Refreshing);
        self.renew(username).await
    }

    /// `Some(Deferred)` while the policy still tolerates an unanswered check.
    fn defer_unknown(&self, consecutive_unknown: u32) -> Option<TickOutcome> {
        match self.settings.validation_policy {
            ValidationPolicy::FailClosed => None,
            ValidationPolicy::Tolerate { max_unknown_ticks } => {
                if consecutive_unknown > max_unknown_ticks {
                    return None;
                }
                self.transition(GuardianState::Idle);
                Some(TickOutcome::Deferred {
                    consecutive_unknown,
                })
            }
        }
    }

    async fn renew(&self, username: Option<String>) -> Result<TickOutcome, GuardianError> {
        let Some(username) = username else {
            tracing::error!("Member identity not found, cannot refresh access token.");
            return Ok(self.refresh_failed(RefreshFailure::MissingIdentity));
        };
        let identity = Identity::new(username, self.settings.role.as_str());

        let response = match refresh_access_token(self.authority.as_ref(), &identity).await {
            Ok(response) => response,
            Err(e) => return Ok(self.refresh_failed(RefreshFailure::Authority(e))),
        };

        let Some(access_token) = response.access_token() else {
            tracing::error!("New access token not received.");
            return Ok(self.refresh_failed(RefreshFailure::NoTokenInResponse));
        };

        if let Err(e) = set_cookie(
            self.cookies.as_ref(),
            &self.settings.access_cookie,
            access_token,
            &self.settings.cookie_attributes,
        ) {
            tracing::error!("Failed to store new access token: {}", e);
            self.transition(GuardianState::RefreshFailed);
            return Err(e.into());
        }

        tracing::info!("New access token: {}", redact_token(access_token));
        self.transition(GuardianState::Renewed);
        Ok(TickOutcome::Renewed { at: Utc::now() })
    }

    fn refresh_failed(&self, failure: RefreshFailure) -> TickOutcome {
        tracing::warn!("Access token not renewed: {}", failure);
        self.transition(GuardianState::RefreshFailed);
        TickOutcome::RefreshFailed(failure)
    }

    fn logout(&self, reason: LogoutReason) -> TickOutcome {
        terminate_session(
            self.cookies.as_ref(),
            self.redirector.as_ref(),
            &self.settings,
            reason,
        );
        self.transition(GuardianState::LoggedOut);
        TickOutcome::LoggedOut(reason)
    }

    fn transition(&self, next: GuardianState) {
        let previous = self.state.send_replace(next);
        tracing::debug!("Guardian state: {} -> {}", previous, next);
    }
}
