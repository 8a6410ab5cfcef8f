mod jar;
mod parse;

pub use jar::CookieJar;

use crate::cookie::errors::CookieError;
use crate::cookie::types::{CookieAttributes, CookieStore};

/// Read a cookie from the store. Never modifies it.
pub fn get_cookie(store: &dyn CookieStore, name: &str) -> Result<Option<String>, CookieError> {
    let value = store.get(name)?;
    if value.is_none() {
        tracing::debug!("No cookie '{}' found", name);
    }
    Ok(value)
}

/// Write a cookie, replacing any existing cookie of the same name.
pub fn set_cookie(
    store: &dyn CookieStore,
    name: &str,
    value: &str,
    attributes: &CookieAttributes,
) -> Result<(), CookieError> {
    store.set(name, value, attributes)?;
    tracing::debug!("Set cookie '{}'", name);
    Ok(())
}

/// Expire a cookie immediately (`Max-Age=0`).
pub fn clear_cookie(
    store: &dyn CookieStore,
    name: &str,
    attributes: &CookieAttributes,
) -> Result<(), CookieError> {
    store.clear(name, attributes)?;
    tracing::debug!("Cleared cookie '{}'", name);
    Ok(())
}
