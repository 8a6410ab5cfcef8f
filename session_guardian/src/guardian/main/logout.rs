use crate::cookie::{CookieStore, clear_cookie};
use crate::guardian::config::GuardianSettings;
use crate::guardian::types::LogoutReason;

/// Sends the member somewhere else, ending the page the guardian runs in.
pub trait Redirector: Send + Sync {
    fn redirect(&self, location: &str);
}

/// Clear both token cookies, then redirect to the sign-in page.
///
/// The redirect happens even if a cookie could not be cleared.
pub(super) fn terminate_session(
    cookies: &dyn CookieStore,
    redirector: &dyn Redirector,
    settings: &GuardianSettings,
    reason: LogoutReason,
) {
    tracing::info!("Logging out user: {}", reason);

    for name in [&settings.access_cookie, &settings.refresh_cookie] {
        if let Err(e) = clear_cookie(cookies, name, &settings.cookie_attributes) {
            tracing::error!("Failed to clear cookie '{}': {}", name, e);
        }
    }

    redirector.redirect(&settings.signin_url);
}
