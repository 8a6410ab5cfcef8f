use std::fmt;

use serde::{Deserialize, Serialize};

use crate::authority::errors::AuthorityError;
use crate::utils::redact_token;

/// Body of `POST /auth/isTokenValid`.
#[derive(Serialize)]
pub(super) struct ValidateRequest<'a> {
    pub(super) token: &'a str,
}

/// Answer of the validation endpoint. A body without `valid` counts as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenValidity {
    #[serde(default)]
    pub valid: bool,
}

/// Who the access token is requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
        }
    }
}

/// Answer of the refresh endpoint.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub new_access_token: Option<String>,
    #[serde(default)]
    pub refreshed_token_type: Option<String>,
}

impl RefreshResponse {
    /// The new access token, if the response carries a non-empty one.
    pub fn access_token(&self) -> Option<&str> {
        self.new_access_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

impl fmt::Debug for RefreshResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshResponse")
            .field(
                "new_access_token",
                &self.new_access_token.as_deref().map(redact_token),
            )
            .field("refreshed_token_type", &self.refreshed_token_type)
            .finish()
    }
}

/// Three-way result of asking the validator about a refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidityProbe {
    Valid,
    Invalid,
    /// The validator could not give an answer.
    Unknown(AuthorityError),
}

impl ValidityProbe {
    /// Collapse into a yes/no answer, treating `Unknown` as invalid.
    pub fn fail_closed(&self) -> TokenValidity {
        TokenValidity {
            valid: matches!(self, ValidityProbe::Valid),
        }
    }
}

impl From<TokenValidity> for ValidityProbe {
    fn from(validity: TokenValidity) -> Self {
        if validity.valid {
            ValidityProbe::Valid
        } else {
            ValidityProbe::Invalid
        }
    }
}
