use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session_guardian::{
    ACCESS_TOKEN_COOKIE_NAME, CookieJar, CookieStore, Guardian, GuardianExit, GuardianSettings,
    HttpTokenAuthority, Redirector, spawn_guardian,
};

/// Stands in for the browser: there is no page to leave, so the redirect is only reported.
struct TerminalRedirector;

impl Redirector for TerminalRedirector {
    fn redirect(&self, location: &str) {
        tracing::warn!("Session terminated, please sign in again at {}", location);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,session_guardian=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Cookies the member got at sign-in, e.g.
    // "member_refresh_token=...; member_access_token=...; current_member=jane@example.com"
    let cookie_header = std::env::var("GUARDIAN_COOKIES").unwrap_or_default();
    let jar = Arc::new(CookieJar::from_cookie_header(&cookie_header)?);

    let authority = Arc::new(HttpTokenAuthority::from_env()?);
    tracing::info!("Using auth service at {}", authority.validate_url());

    let settings = GuardianSettings::from_env();
    let guardian = Arc::new(Guardian::new(
        jar.clone(),
        authority,
        Arc::new(TerminalRedirector),
        settings,
    )?);

    let mut states = guardian.subscribe();
    let state_jar = jar.clone();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            match state_jar.cookie_string() {
                Ok(cookies) => tracing::debug!("State {} with cookies [{}]", state, cookies),
                Err(e) => tracing::error!("State {} but cookies unreadable: {}", state, e),
            }
        }
    });

    let handle = spawn_guardian(guardian);

    tokio::select! {
        exit = handle.wait() => match exit {
            GuardianExit::LoggedOut(reason) => tracing::info!("Guardian finished: {}", reason),
            GuardianExit::Stopped => tracing::info!("Guardian stopped"),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping guardian");
        }
    }

    if let Some(token) = jar.get(ACCESS_TOKEN_COOKIE_NAME.as_str())? {
        tracing::info!("Last access token length: {}", token.len());
    }

    Ok(())
}
