use std::time::Duration;

use serde_json::json;
use session_guardian::{
    AuthorityError, HttpTokenAuthority, Identity, TokenAuthority, ValidityProbe,
    check_token_validity, probe_token_validity, refresh_access_token,
};

use crate::common::{MockAuthServer, RefreshMode, ValidateMode, unreachable_base_url};

fn authority(base_url: &str) -> HttpTokenAuthority {
    HttpTokenAuthority::new(base_url, Duration::from_secs(5)).expect("valid base URL")
}

#[tokio::test]
async fn test_validate_accepted_and_unknown_tokens() {
    let server = MockAuthServer::start().await;
    server.accept_token("refresh-ok");
    let authority = authority(&server.base_url);

    assert!(check_token_validity(&authority, "refresh-ok").await.valid);
    assert!(!check_token_validity(&authority, "refresh-revoked").await.valid);
    assert_eq!(server.validate_calls(), 2);
}

#[tokio::test]
async fn test_validate_against_unreachable_server_fails_closed() {
    let authority = authority(&unreachable_base_url().await);

    assert!(!check_token_validity(&authority, "refresh-ok").await.valid);
    assert!(matches!(
        probe_token_validity(&authority, "refresh-ok").await,
        ValidityProbe::Unknown(AuthorityError::Transport(_))
    ));
}

#[tokio::test]
async fn test_validate_error_status_fails_closed() {
    let server = MockAuthServer::start().await;
    server.accept_token("refresh-ok");
    server.set_validate_mode(ValidateMode::Fail(http::StatusCode::INTERNAL_SERVER_ERROR));
    let authority = authority(&server.base_url);

    assert!(!check_token_validity(&authority, "refresh-ok").await.valid);
    assert_eq!(
        probe_token_validity(&authority, "refresh-ok").await,
        ValidityProbe::Unknown(AuthorityError::Protocol(
            http::StatusCode::INTERNAL_SERVER_ERROR
        ))
    );
    assert_eq!(server.validate_calls(), 2);
}

#[tokio::test]
async fn test_validate_garbage_body_fails_closed() {
    let server = MockAuthServer::start().await;
    server.accept_token("refresh-ok");
    server.set_validate_mode(ValidateMode::Garbage);
    let authority = authority(&server.base_url);

    assert!(!check_token_validity(&authority, "refresh-ok").await.valid);
    assert!(matches!(
        probe_token_validity(&authority, "refresh-ok").await,
        ValidityProbe::Unknown(AuthorityError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_refresh_sends_identity_and_returns_token() {
    let server = MockAuthServer::start().await;
    let authority = authority(&server.base_url);
    let identity = Identity::new("jane@example.com", "member");

    let response = refresh_access_token(&authority, &identity)
        .await
        .expect("refresh should succeed");

    assert_eq!(response.access_token(), Some("access-1"));
    assert_eq!(response.refreshed_token_type.as_deref(), Some("bearer"));
    assert_eq!(
        server.refresh_bodies(),
        vec![json!({ "username": "jane@example.com", "role": "member" })]
    );
}

#[tokio::test]
async fn test_refresh_error_status_is_protocol_error() {
    let server = MockAuthServer::start().await;
    server.set_refresh_mode(RefreshMode::Fail(http::StatusCode::BAD_REQUEST));
    let authority = authority(&server.base_url);

    let result = authority
        .refresh(&Identity::new("jane@example.com", "member"))
        .await;

    assert_eq!(
        result,
        Err(AuthorityError::Protocol(http::StatusCode::BAD_REQUEST))
    );
}

#[tokio::test]
async fn test_refresh_garbage_body_is_malformed() {
    let server = MockAuthServer::start().await;
    server.set_refresh_mode(RefreshMode::Garbage);
    let authority = authority(&server.base_url);

    let result = authority
        .refresh(&Identity::new("jane@example.com", "member"))
        .await;

    assert!(matches!(result, Err(AuthorityError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_refresh_unreachable_is_transport_error() {
    let authority = authority(&unreachable_base_url().await);

    let result =
        refresh_access_token(&authority, &Identity::new("jane@example.com", "member")).await;

    assert!(matches!(result, Err(AuthorityError::Transport(_))));
}
