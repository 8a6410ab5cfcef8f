mod config;
mod errors;
mod main;
mod types;

pub use config::{ACCESS_TOKEN_COOKIE_NAME, MEMBER_COOKIE_NAME, REFRESH_TOKEN_COOKIE_NAME};
pub use errors::CookieError;
pub use main::{CookieJar, clear_cookie, get_cookie, set_cookie};
pub use types::{CookieAttributes, CookieStore, SameSite};
