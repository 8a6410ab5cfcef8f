use std::sync::LazyLock;

pub static REFRESH_TOKEN_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GUARDIAN_REFRESH_COOKIE_NAME")
        .ok()
        .unwrap_or("member_refresh_token".to_string())
});

pub static ACCESS_TOKEN_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GUARDIAN_ACCESS_COOKIE_NAME")
        .ok()
        .unwrap_or("member_access_token".to_string())
});

/// Cookie holding the signed-in member's username.
pub static MEMBER_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GUARDIAN_MEMBER_COOKIE_NAME")
        .ok()
        .unwrap_or("current_member".to_string())
});

