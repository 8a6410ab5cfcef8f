mod client;

pub use client::{HttpTokenAuthority, TokenAuthority};

use crate::authority::errors::AuthorityError;
use crate::authority::types::{Identity, RefreshResponse, TokenValidity, ValidityProbe};

/// Ask the authority about `refresh_token`, keeping "could not tell" apart from "invalid".
#[tracing::instrument(skip_all)]
pub async fn probe_token_validity(
    authority: &dyn TokenAuthority,
    refresh_token: &str,
) -> ValidityProbe {
    match authority.validate(refresh_token).await {
        Ok(validity) => {
            tracing::debug!("Validator answered valid={}", validity.valid);
            validity.into()
        }
        Err(e) => {
            tracing::error!("Error checking token validity: {}", e);
            ValidityProbe::Unknown(e)
        }
    }
}

/// Check `refresh_token` against the authority. Never fails: any error is
/// reported as `{ valid: false }`.
pub async fn check_token_validity(
    authority: &dyn TokenAuthority,
    refresh_token: &str,
) -> TokenValidity {
    probe_token_validity(authority, refresh_token)
        .await
        .fail_closed()
}

/// Request a new access token for `identity`. Errors are logged and returned to the caller.
#[tracing::instrument(skip_all, fields(username = %identity.username, role = %identity.role))]
pub async fn refresh_access_token(
    authority: &dyn TokenAuthority,
    identity: &Identity,
) -> Result<RefreshResponse, AuthorityError> {
    let response = authority.refresh(identity).await.map_err(|e| {
        tracing::error!("Error refreshing access token: {}", e);
        e
    })?;

    if let Some(token_type) = response.refreshed_token_type.as_deref() {
        tracing::debug!("Refreshed token type: {}", token_type);
    }
    Ok(response)
}
