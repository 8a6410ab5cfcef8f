use std::sync::Arc;
use std::time::Duration;

use session_guardian::{
    CookieJar, CookieStore, Guardian, GuardianExit, GuardianSettings, HttpTokenAuthority,
    LogoutReason, RefreshFailure, TickOutcome, spawn_guardian,
};

use crate::common::{MockAuthServer, RecordingRedirector, RefreshMode, unreachable_base_url};

const SIGNIN: &str = "https://chamazetu.com/signin/member";
const SIGNED_IN: &str = "current_member=jane@example.com; member_access_token=initial; member_refresh_token=refresh-ok";

struct Setup {
    jar: Arc<CookieJar>,
    redirector: Arc<RecordingRedirector>,
    guardian: Arc<Guardian>,
}

fn setup(base_url: &str, cookies: &str, settings: GuardianSettings) -> Setup {
    let jar = Arc::new(CookieJar::from_cookie_header(cookies).expect("valid cookie header"));
    let redirector = Arc::new(RecordingRedirector::default());
    let authority = Arc::new(
        HttpTokenAuthority::new(base_url, Duration::from_secs(5)).expect("valid base URL"),
    );
    let guardian = Guardian::new(
        jar.clone(),
        authority,
        redirector.clone(),
        settings.with_signin_url(SIGNIN),
    )
    .expect("valid settings");

    Setup {
        jar,
        redirector,
        guardian: Arc::new(guardian),
    }
}

#[tokio::test]
async fn test_ticks_renew_access_token_last_write_wins() {
    let server = MockAuthServer::start().await;
    server.accept_token("refresh-ok");
    let s = setup(&server.base_url, SIGNED_IN, GuardianSettings::from_env());

    assert!(matches!(
        s.guardian.tick().await.unwrap(),
        TickOutcome::Renewed { .. }
    ));
    assert_eq!(
        s.jar.get("member_access_token").unwrap(),
        Some("access-1".to_string())
    );

    assert!(matches!(
        s.guardian.tick().await.unwrap(),
        TickOutcome::Renewed { .. }
    ));
    assert_eq!(
        s.jar.get("member_access_token").unwrap(),
        Some("access-2".to_string())
    );
    assert!(s.redirector.locations().is_empty());
}

#[tokio::test]
async fn test_rejected_refresh_token_ends_session() {
    let server = MockAuthServer::start().await;
    let s = setup(&server.base_url, SIGNED_IN, GuardianSettings::from_env());

    let outcome = s.guardian.tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::LoggedOut(LogoutReason::TokenInvalid));
    assert_eq!(
        s.jar.cookie_string().unwrap(),
        "current_member=jane@example.com"
    );
    assert_eq!(s.redirector.locations(), vec![SIGNIN.to_string()]);
    assert!(server.refresh_bodies().is_empty());
}

#[tokio::test]
async fn test_missing_refresh_token_never_calls_server() {
    let server = MockAuthServer::start().await;
    let s = setup(
        &server.base_url,
        "current_member=jane@example.com; member_access_token=initial",
        GuardianSettings::from_env(),
    );

    let outcome = s.guardian.tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::LoggedOut(LogoutReason::MissingCredential));
    assert_eq!(server.validate_calls(), 0);
    assert!(server.refresh_bodies().is_empty());
    assert_eq!(s.jar.get("member_access_token").unwrap(), None);
}

#[tokio::test]
async fn test_refresh_endpoint_failure_keeps_cookies() {
    let server = MockAuthServer::start().await;
    server.accept_token("refresh-ok");
    server.set_refresh_mode(RefreshMode::Fail(http::StatusCode::INTERNAL_SERVER_ERROR));
    let s = setup(&server.base_url, SIGNED_IN, GuardianSettings::from_env());

    let outcome = s.guardian.tick().await.unwrap();

    assert!(matches!(
        outcome,
        TickOutcome::RefreshFailed(RefreshFailure::Authority(_))
    ));
    assert_eq!(s.jar.cookie_string().unwrap(), SIGNED_IN);
    assert!(s.redirector.locations().is_empty());
}

#[tokio::test]
async fn test_refresh_without_new_token_keeps_cookies() {
    let server = MockAuthServer::start().await;
    server.accept_token("refresh-ok");
    server.set_refresh_mode(RefreshMode::NoToken);
    let s = setup(&server.base_url, SIGNED_IN, GuardianSettings::from_env());

    let outcome = s.guardian.tick().await.unwrap();

    assert_eq!(
        outcome,
        TickOutcome::RefreshFailed(RefreshFailure::NoTokenInResponse)
    );
    assert_eq!(s.jar.cookie_string().unwrap(), SIGNED_IN);
}

#[tokio::test]
async fn test_unreachable_validator_fails_closed() {
    let s = setup(
        &unreachable_base_url().await,
        SIGNED_IN,
        GuardianSettings::from_env(),
    );

    let outcome = s.guardian.tick().await.unwrap();

    assert_eq!(
        outcome,
        TickOutcome::LoggedOut(LogoutReason::ValidatorUnreachable)
    );
    assert_eq!(s.redirector.locations(), vec![SIGNIN.to_string()]);
}

#[tokio::test]
async fn test_spawned_guardian_renews_until_stopped() {
    let server = MockAuthServer::start().await;
    server.accept_token("refresh-ok");
    let settings = GuardianSettings::from_env()
        .with_refresh_interval(Duration::from_millis(100))
        .with_check_on_start(true);
    let s = setup(&server.base_url, SIGNED_IN, settings);

    let handle = spawn_guardian(s.guardian.clone());

    let mut renewed = false;
    for _ in 0..50 {
        if s.jar.get("member_access_token").unwrap().as_deref() != Some("initial") {
            renewed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(renewed, "access token was never renewed");

    assert_eq!(handle.stop().await, GuardianExit::Stopped);
    assert!(s.redirector.locations().is_empty());
}
