mod config;
mod errors;
mod main;
mod types;

pub use config::{AUTH_SERVER_URL, HTTP_TIMEOUT};
pub use errors::AuthorityError;
pub use main::{
    HttpTokenAuthority, TokenAuthority, check_token_validity, probe_token_validity,
    refresh_access_token,
};
pub use types::{Identity, RefreshResponse, TokenValidity, ValidityProbe};
