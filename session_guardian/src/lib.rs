//! session_guardian - Keeps a member session alive from the client side
//!
//! The guardian periodically checks that the refresh token held in the cookie
//! store is still accepted by the auth service. While it is, the access token
//! cookie is renewed through the refresh endpoint. Once it is missing or
//! rejected, both token cookies are cleared and the member is redirected to
//! the sign-in page.
//!
//! The browser pieces are seams: cookies go through [`CookieStore`], the auth
//! service through [`TokenAuthority`] and the redirect through [`Redirector`].

mod authority;
mod config;
mod cookie;
mod guardian;
mod utils;


pub use config::{
    GUARDIAN_CHECK_ON_START, GUARDIAN_MEMBER_ROLE, GUARDIAN_REFRESH_INTERVAL,
    GUARDIAN_SIGNIN_URL, GUARDIAN_VALIDATOR_TOLERANCE,
};

pub use cookie::{
    ACCESS_TOKEN_COOKIE_NAME, CookieAttributes, CookieError, CookieJar, CookieStore,
    MEMBER_COOKIE_NAME, REFRESH_TOKEN_COOKIE_NAME, SameSite, clear_cookie, get_cookie,
    set_cookie,
};

pub use authority::{
    AUTH_SERVER_URL, AuthorityError, HTTP_TIMEOUT, HttpTokenAuthority, Identity,
    RefreshResponse, TokenAuthority, TokenValidity, ValidityProbe, check_token_validity,
    probe_token_validity, refresh_access_token,
};

pub use guardian::{
    Guardian, GuardianError, GuardianExit, GuardianHandle, GuardianSettings, GuardianState,
    LogoutReason, Redirector, RefreshFailure, TickOutcome, ValidationPolicy, spawn_guardian,
};
