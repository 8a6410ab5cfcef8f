use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CookieError {
    #[error("Invalid cookie name: {0:?}")]
    InvalidName(String),

    #[error("Invalid value for cookie {0}")]
    InvalidValue(String),

    #[error("Malformed cookie directive: {0}")]
    MalformedDirective(String),

    #[error("Cookie store error: {0}")]
    Store(String),
}
