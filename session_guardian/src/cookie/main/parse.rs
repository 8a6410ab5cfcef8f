use headers::Header;
use http::HeaderValue;

use crate::cookie::errors::CookieError;
use crate::cookie::types::{CookieAttributes, CookieDirective, SameSite};

/// Look up `name` in a cookie string of the form `a=1; b=2`.
///
/// The first occurrence wins when a name appears more than once.
pub(crate) fn cookie_value(cookie_str: &str, name: &str) -> Option<String> {
    if cookie_str.trim().is_empty() {
        return None;
    }

    let header = HeaderValue::from_str(cookie_str)
        .inspect_err(|e| tracing::warn!("Unreadable cookie string: {e}"))
        .ok()?;
    let cookies = headers::Cookie::decode(&mut std::iter::once(&header))
        .inspect_err(|e| tracing::warn!("Failed to decode cookie string: {e}"))
        .ok()?;

    cookies.get(name).map(str::to_string)
}

/// Parse a directive such as `name=value; Max-Age=0; path=/; Secure; SameSite=Strict`.
///
/// Attribute names are case-insensitive. Unknown attributes are ignored, like
/// a browser does.
pub(crate) fn parse_directive(directive: &str) -> Result<CookieDirective, CookieError> {
    let mut parts = directive.split(';');
    let pair = parts.next().unwrap_or_default();

    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| CookieError::MalformedDirective(directive.to_string()))?;
    let name = name.trim();
    let value = value.trim();
    validate_name(name)?;
    validate_value(name, value)?;

    // Attributes not present in the directive do not fall back to Secure/Strict defaults.
    let mut attributes = CookieAttributes {
        secure: false,
        same_site: SameSite::Lax,
        ..CookieAttributes::default()
    };

    for attribute in parts.map(str::trim).filter(|attr| !attr.is_empty()) {
        let (key, val) = match attribute.split_once('=') {
            Some((key, val)) => (key.trim(), Some(val.trim())),
            None => (attribute, None),
        };

        match (key.to_ascii_lowercase().as_str(), val) {
            ("path", Some(path)) => attributes.path = path.to_string(),
            ("secure", _) => attributes.secure = true,
            ("httponly", _) => attributes.http_only = true,
            ("samesite", Some(same_site)) => {
                attributes.same_site = SameSite::parse(same_site).unwrap_or(SameSite::Lax);
            }
            ("max-age", Some(age)) => {
                let age = age.parse::<i64>().map_err(|_| {
                    CookieError::MalformedDirective(format!("Invalid Max-Age in {directive}"))
                })?;
                attributes.max_age = Some(age);
            }
            (other, _) => tracing::debug!("Ignoring cookie attribute {other} for {name}"),
        }
    }

    Ok(CookieDirective {
        name: name.to_string(),
        value: value.to_string(),
        attributes,
    })
}

/// Cookie names must be non-empty HTTP tokens.
pub(crate) fn validate_name(name: &str) -> Result<(), CookieError> {
    const SEPARATORS: &[char] = &[
        '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '[', ']', '?', '=', '{', '}',
    ];

    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_graphic() && !SEPARATORS.contains(&c));

    if valid {
        Ok(())
    } else {
        Err(CookieError::InvalidName(name.to_string()))
    }
}

pub(crate) fn validate_value(name: &str, value: &str) -> Result<(), CookieError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_graphic() && !matches!(c, ';' | ',' | '"' | '\\'));

    if valid {
        Ok(())
    } else {
        Err(CookieError::InvalidValue(name.to_string()))
    }
}
