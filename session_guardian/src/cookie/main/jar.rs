use std::sync::{Mutex, MutexGuard};

use crate::cookie::errors::CookieError;
use crate::cookie::types::{CookieAttributes, CookieDirective, CookieStore};

use super::parse::{cookie_value, parse_directive, validate_name, validate_value};

/// In-memory cookie store that behaves like `document.cookie`.
///
/// Directives are applied with [`CookieJar::apply`] and the visible cookie
/// string is rendered with [`CookieJar::cookie_string`]. A cookie is identified
/// by its name and path. Cookies keep their insertion order; overwriting a
/// cookie keeps its position.
#[derive(Debug, Default)]
pub struct CookieJar {
    entries: Mutex<Vec<StoredCookie>>,
}

#[derive(Debug, Clone)]
struct StoredCookie {
    name: String,
    value: String,
    attributes: CookieAttributes,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a jar from a `Cookie` header value such as `a=1; b=2`.
    pub fn from_cookie_header(header: &str) -> Result<Self, CookieError> {
        let jar = Self::new();
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            jar.apply(pair)?;
        }
        Ok(jar)
    }

    /// Apply a cookie directive the way a browser applies an assignment to `document.cookie`.
    pub fn apply(&self, directive: &str) -> Result<(), CookieError> {
        let directive = parse_directive(directive)?;
        self.store(directive)
    }

    /// The document cookie string: `name=value` pairs joined by `; `.
    pub fn cookie_string(&self) -> Result<String, CookieError> {
        let entries = self.lock()?;
        Ok(entries
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; "))
    }

    /// Attributes the cookie called `name` was last written with.
    pub fn attributes(&self, name: &str) -> Result<Option<CookieAttributes>, CookieError> {
        let entries = self.lock()?;
        Ok(entries
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.attributes.clone()))
    }

    pub fn len(&self) -> Result<usize, CookieError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CookieError> {
        Ok(self.lock()?.is_empty())
    }

    fn store(&self, directive: CookieDirective) -> Result<(), CookieError> {
        let mut entries = self.lock()?;
        let existing = entries.iter().position(|c| {
            c.name == directive.name && c.attributes.path == directive.attributes.path
        });

        if directive.is_expiry() {
            match existing {
                Some(index) => {
                    entries.remove(index);
                    tracing::debug!("Expired cookie {}", directive.name);
                }
                None => tracing::debug!(
                    "No cookie {} at path {} to expire",
                    directive.name,
                    directive.attributes.path
                ),
            }
            return Ok(());
        }

        let cookie = StoredCookie {
            name: directive.name,
            value: directive.value,
            attributes: directive.attributes,
        };
        match existing {
            Some(index) => entries[index] = cookie,
            None => entries.push(cookie),
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<StoredCookie>>, CookieError> {
        self.entries
            .lock()
            .map_err(|_| CookieError::Store("Cookie jar lock poisoned".to_string()))
    }
}

impl CookieStore for CookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        Ok(cookie_value(&self.cookie_string()?, name))
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        attributes: &CookieAttributes,
    ) -> Result<(), CookieError> {
        validate_name(name)?;
        validate_value(name, value)?;
        self.apply(&attributes.directive(name, value))
    }

    fn clear(&self, name: &str, attributes: &CookieAttributes) -> Result<(), CookieError> {
        validate_name(name)?;
        self.apply(&attributes.expired().directive(name, ""))
    }
}
