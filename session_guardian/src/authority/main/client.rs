use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::authority::config::{AUTH_SERVER_URL, HTTP_TIMEOUT, REFRESH_PATH, VALIDATE_PATH};
use crate::authority::errors::AuthorityError;
use crate::authority::types::{Identity, RefreshResponse, TokenValidity, ValidateRequest};

/// The remote authority that judges refresh tokens and issues access tokens.
#[async_trait]
pub trait TokenAuthority: Send + Sync {
    /// Ask whether `refresh_token` is still accepted.
    async fn validate(&self, refresh_token: &str) -> Result<TokenValidity, AuthorityError>;

    /// Request a new access token for `identity`.
    async fn refresh(&self, identity: &Identity) -> Result<RefreshResponse, AuthorityError>;

    /// Upper bound on a single request, when the authority enforces one.
    fn request_timeout(&self) -> Option<Duration> {
        None
    }
}

/// [`TokenAuthority`] backed by the auth service's JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpTokenAuthority {
    client: reqwest::Client,
    validate_url: Url,
    refresh_url: Url,
    timeout: Option<Duration>,
}

impl HttpTokenAuthority {
    /// Build an authority for `base_url` with a per-request `timeout`.
    ///
    /// The endpoints are resolved relative to `base_url`, so
    /// `https://api.example.com/v1` maps to `https://api.example.com/v1/auth/refresh`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthorityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| AuthorityError::Client(e.to_string()))?;
        Ok(Self {
            timeout: Some(timeout),
            ..Self::with_client(client, base_url)?
        })
    }

    /// Build an authority from `GUARDIAN_AUTH_SERVER_URL` and `GUARDIAN_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, AuthorityError> {
        Self::new(AUTH_SERVER_URL.as_str(), *HTTP_TIMEOUT)
    }

    /// Use a preconfigured client. Its timeout, if any, is not known to the guardian.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, AuthorityError> {
        let base = base_url_with_slash(base_url)?;
        Ok(Self {
            client,
            validate_url: base.join(VALIDATE_PATH)?,
            refresh_url: base.join(REFRESH_PATH)?,
            timeout: None,
        })
    }

    pub fn validate_url(&self) -> &Url {
        &self.validate_url
    }

    pub fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }

    async fn post_json<B, T>(&self, url: &Url, body: &B) -> Result<T, AuthorityError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered with status {}", url, status);
            return Err(AuthorityError::Protocol(status));
        }

        let response_body = response.text().await?;

        serde_json::from_str(&response_body).map_err(AuthorityError::from)
    }
}

#[async_trait]
impl TokenAuthority for HttpTokenAuthority {
    async fn validate(&self, refresh_token: &str) -> Result<TokenValidity, AuthorityError> {
        let body = ValidateRequest {
            token: refresh_token,
        };
        self.post_json(&self.validate_url, &body).await
    }

    async fn refresh(&self, identity: &Identity) -> Result<RefreshResponse, AuthorityError> {
        self.post_json(&self.refresh_url, identity).await
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn base_url_with_slash(base_url: &str) -> Result<Url, AuthorityError> {
    let mut base = Url::parse(base_url)?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(AuthorityError::InvalidUrl(format!(
            "Unsupported scheme in {base_url}"
        )));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}
