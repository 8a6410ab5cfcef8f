use std::fmt;

use chrono::{DateTime, Utc};

use crate::authority::AuthorityError;

/// Where the guardian is in its check/renew cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardianState {
    #[default]
    Idle,
    Checking,
    Refreshing,
    Renewed,
    RefreshFailed,
    Invalid,
    LoggedOut,
}

impl fmt::Display for GuardianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GuardianState::Idle => "idle",
            GuardianState::Checking => "checking",
            GuardianState::Refreshing => "refreshing",
            GuardianState::Renewed => "renewed",
            GuardianState::RefreshFailed => "refresh_failed",
            GuardianState::Invalid => "invalid",
            GuardianState::LoggedOut => "logged_out",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// No refresh token cookie.
    MissingCredential,
    /// The validator rejected the refresh token.
    TokenInvalid,
    /// The validator could not be reached, or not often enough under a tolerant policy.
    ValidatorUnreachable,
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoutReason::MissingCredential => write!(f, "refresh token not found"),
            LogoutReason::TokenInvalid => write!(f, "refresh token is not valid"),
            LogoutReason::ValidatorUnreachable => write!(f, "token validator unreachable"),
        }
    }
}

/// Why a tick that passed validation did not renew the access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// No username cookie to request a token for.
    MissingIdentity,
    /// The refresh endpoint answered without a new access token.
    NoTokenInResponse,
    Authority(AuthorityError),
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshFailure::MissingIdentity => write!(f, "member identity not found"),
            RefreshFailure::NoTokenInResponse => write!(f, "new access token not received"),
            RefreshFailure::Authority(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The access token cookie now holds a fresh token.
    Renewed { at: DateTime<Utc> },
    /// Still logged in, access token cookie untouched.
    RefreshFailed(RefreshFailure),
    /// The validator gave no answer and the policy allows waiting for the next tick.
    Deferred { consecutive_unknown: u32 },
    /// Token cookies cleared and the member redirected to sign-in.
    LoggedOut(LogoutReason),
    /// Another tick was still running.
    Skipped,
}

/// What to do when the validator cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Treat an unreachable validator as a rejected token.
    #[default]
    FailClosed,
    /// Allow up to `max_unknown_ticks` consecutive unanswered checks before logging out.
    Tolerate { max_unknown_ticks: u32 },
}

impl ValidationPolicy {
    pub fn from_tolerance(max_unknown_ticks: u32) -> Self {
        match max_unknown_ticks {
            0 => ValidationPolicy::FailClosed,
            n => ValidationPolicy::Tolerate {
                max_unknown_ticks: n,
            },
        }
    }
}

/// Why the guardian loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardianExit {
    Stopped,
    LoggedOut(LogoutReason),
}
