use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// Network, DNS, TLS or timeout failure before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The auth service answered with a non-success status.
    #[error("Unexpected status: {0}")]
    Protocol(http::StatusCode),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for AuthorityError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Protocol(status),
            None if err.is_decode() => Self::MalformedResponse(err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AuthorityError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl From<url::ParseError> for AuthorityError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
