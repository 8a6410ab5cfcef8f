use std::fmt;

use crate::cookie::errors::CookieError;

/// Named key-value storage for cookies, shared between the guardian and the
/// rest of the application.
///
/// Operations are synchronous and each write is atomic per key.
pub trait CookieStore: Send + Sync {
    /// Value of the cookie called `name`, if present.
    fn get(&self, name: &str) -> Result<Option<String>, CookieError>;

    /// Write `name=value` with the given attributes, replacing any cookie of the same name.
    fn set(&self, name: &str, value: &str, attributes: &CookieAttributes)
    -> Result<(), CookieError>;

    /// Expire the cookie called `name` immediately. `attributes` must name the
    /// same path the cookie was written with.
    fn clear(&self, name: &str, attributes: &CookieAttributes) -> Result<(), CookieError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

impl SameSite {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

/// Attributes attached to a cookie when it is written.
///
/// The default is `Path=/; Secure; SameSite=Strict` with no `Max-Age`, which
/// is what every guardian-managed cookie uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub max_age: Option<i64>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            secure: true,
            http_only: false,
            same_site: SameSite::Strict,
            max_age: None,
        }
    }
}

impl CookieAttributes {
    /// The same attributes with `Max-Age=0`, used to expire a cookie.
    pub fn expired(&self) -> Self {
        Self {
            max_age: Some(0),
            ..self.clone()
        }
    }

    /// Render a cookie directive as assigned to `document.cookie` or sent in `Set-Cookie`.
    pub fn directive(&self, name: &str, value: &str) -> String {
        let mut cookie = format!("{name}={value}; Path={}", self.path);
        if self.secure {
            cookie.push_str("; Secure");
        }
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site));
        if let Some(max_age) = self.max_age {
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }
        cookie
    }
}

/// A parsed cookie directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CookieDirective {
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) attributes: CookieAttributes,
}

impl CookieDirective {
    /// A directive with a non-positive `Max-Age` deletes the cookie.
    pub(crate) fn is_expiry(&self) -> bool {
        matches!(self.attributes.max_age, Some(age) if age <= 0)
    }
}
