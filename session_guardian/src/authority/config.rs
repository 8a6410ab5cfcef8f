use std::sync::LazyLock;
use std::time::Duration;

use crate::config::parse_secs;

/// Base URL of the auth service exposing `/auth/isTokenValid` and `/auth/refresh`.
pub static AUTH_SERVER_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GUARDIAN_AUTH_SERVER_URL")
        .ok()
        .unwrap_or("http://localhost:9400".to_string())
});

/// Upper bound on a single request to the auth service.
pub static HTTP_TIMEOUT: LazyLock<Duration> = LazyLock::new(|| {
    Duration::from_secs(parse_secs(
        std::env::var("GUARDIAN_HTTP_TIMEOUT_SECS").ok(),
        30,
    ))
});

pub(super) const VALIDATE_PATH: &str = "auth/isTokenValid";
pub(super) const REFRESH_PATH: &str = "auth/refresh";
