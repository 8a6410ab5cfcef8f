//! Central configuration for the session_guardian crate

use std::sync::LazyLock;
use std::time::Duration;

/// Role sent to the refresh endpoint alongside the member's username.
/// Default: "member"
pub static GUARDIAN_MEMBER_ROLE: LazyLock<String> = LazyLock::new(member_role_from_env);

/// Where the member is sent once the session is terminated.
pub static GUARDIAN_SIGNIN_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GUARDIAN_SIGNIN_URL")
        .unwrap_or_else(|_| "https://chamazetu.com/signin/member".to_string())
});

/// Time between two guardian ticks. Default is 4 minutes.
pub static GUARDIAN_REFRESH_INTERVAL: LazyLock<Duration> =
    LazyLock::new(refresh_interval_from_env);

/// Number of consecutive ticks on which the validator may be unreachable
/// before the guardian gives up and logs out. 0 means fail closed.
pub static GUARDIAN_VALIDATOR_TOLERANCE: LazyLock<u32> =
    LazyLock::new(validator_tolerance_from_env);

/// Run the first tick as soon as the guardian starts instead of one interval later.
pub static GUARDIAN_CHECK_ON_START: LazyLock<bool> = LazyLock::new(|| {
    parse_flag(std::env::var("GUARDIAN_CHECK_ON_START").ok(), false)
});

fn member_role_from_env() -> String {
    std::env::var("GUARDIAN_MEMBER_ROLE")
        .ok()
        .filter(|role| !role.trim().is_empty())
        .unwrap_or_else(|| "member".to_string())
}

fn refresh_interval_from_env() -> Duration {
    Duration::from_secs(parse_secs(
        std::env::var("GUARDIAN_REFRESH_INTERVAL_SECS").ok(),
        240,
    ))
}

fn validator_tolerance_from_env() -> u32 {
    std::env::var("GUARDIAN_VALIDATOR_TOLERANCE")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Parse a positive number of seconds, falling back to `default` on absent,
/// invalid or zero input.
pub(crate) fn parse_secs(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

pub(crate) fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        Some(s) if matches!(s.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(s) if matches!(s.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
