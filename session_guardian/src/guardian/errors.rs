use thiserror::Error;

use crate::cookie::CookieError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardianError {
    /// Error from the cookie store
    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}
