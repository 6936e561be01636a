//! OAuth access tokens.
//!
//! Two sources are supported: a pre-issued token from the environment, and
//! gcloud "authorized_user" application default credentials whose refresh
//! token is exchanged at the OAuth endpoint. Exchanged tokens are cached until
//! shortly before expiry; concurrent callers share one refresh.

use std::path::Path;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::{GoogleConfig, SCOPES};
use crate::error::{ClientError, ClientResult, api_error};

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Contents of an `authorized_user` credentials file.
#[derive(Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default)]
    pub quota_project_id: Option<String>,
}

impl std::fmt::Debug for AuthorizedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedUser")
            .field("client_id", &self.client_id)
            .field("quota_project_id", &self.quota_project_id)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    rest: serde_json::Value,
}

/// Where access tokens come from.
#[derive(Clone)]
pub enum Credentials {
    /// Fixed token; never refreshed.
    StaticToken(String),
    /// Refresh-token credentials from `gcloud auth application-default login`.
    AuthorizedUser(AuthorizedUser),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaticToken(_) => f.write_str("StaticToken(..)"),
            Self::AuthorizedUser(user) => f.debug_tuple("AuthorizedUser").field(user).finish(),
        }
    }
}

impl Credentials {
    /// Resolve credentials from config: a static token wins, then the
    /// credentials file.
    pub fn resolve(config: &GoogleConfig) -> ClientResult<Self> {
        if let Some(token) = config.access_token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(Self::StaticToken(token.trim().to_string()));
        }
        let path = config.resolve_credentials_path().ok_or_else(|| {
            ClientError::Credentials("no credentials file location could be determined".into())
        })?;
        Self::from_file(&path)
    }

    /// Load a credentials JSON file.
    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Credentials(format!(
                "cannot read {}: {e} (run `gcloud auth application-default login --scopes={}`)",
                path.display(),
                SCOPES.join(",")
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> ClientResult<Self> {
        let file: CredentialsFile = serde_json::from_str(raw)
            .map_err(|e| ClientError::Credentials(format!("invalid credentials JSON: {e}")))?;
        match file.kind.as_str() {
            "authorized_user" => {
                let user: AuthorizedUser = serde_json::from_value(file.rest).map_err(|e| {
                    ClientError::Credentials(format!("incomplete authorized_user credentials: {e}"))
                })?;
                Ok(Self::AuthorizedUser(user))
            }
            other => Err(ClientError::Credentials(format!(
                "unsupported credentials type '{other}' (expected authorized_user)"
            ))),
        }
    }

    /// Quota project embedded in the credentials file, if any.
    pub fn quota_project(&self) -> Option<&str> {
        match self {
            Self::StaticToken(_) => None,
            Self::AuthorizedUser(user) => user.quota_project_id.as_deref(),
        }
    }
}

/// Form body for a refresh-token grant. Scopes stay those granted at login.
fn refresh_form(user: &AuthorizedUser) -> [(&'static str, &str); 4] {
    [
        ("grant_type", "refresh_token"),
        ("client_id", user.client_id.as_str()),
        ("client_secret", user.client_secret.as_str()),
        ("refresh_token", user.refresh_token.as_str()),
    ]
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        self.refresh_at.is_none_or(|at| now < at)
    }
}

/// Hands out bearer tokens, refreshing as needed.
pub struct TokenSource {
    credentials: Credentials,
    token_url: String,
    http: reqwest::Client,
    cache: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("credentials", &self.credentials)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl TokenSource {
    pub fn new(credentials: Credentials, token_url: impl Into<String>, http: reqwest::Client) -> Self {
        let cache = match &credentials {
            Credentials::StaticToken(value) => Some(CachedToken {
                value: value.clone(),
                refresh_at: None,
            }),
            Credentials::AuthorizedUser(_) => None,
        };
        Self {
            credentials,
            token_url: token_url.into(),
            http,
            cache: Mutex::new(cache),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Current access token. The lock is held across the exchange so only
    /// one refresh is in flight.
    pub async fn token(&self) -> ClientResult<String> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref().filter(|c| c.is_fresh(Instant::now())) {
            return Ok(cached.value.clone());
        }

        let Credentials::AuthorizedUser(user) = &self.credentials else {
            return Err(ClientError::Credentials("static token unavailable".into()));
        };

        let fresh = self.exchange(user).await?;
        let value = fresh.value.clone();
        *cache = Some(fresh);
        Ok(value)
    }

    #[tracing::instrument(skip(self, user), name = "google.oauth.refresh")]
    async fn exchange(&self, user: &AuthorizedUser) -> ClientResult<CachedToken> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&refresh_form(user))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let err = api_error(status.as_u16(), &body);
            return Err(ClientError::Credentials(format!("token refresh failed: {err}")));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("token response: {e}")))?;
        let refresh_at = parsed
            .expires_in
            .map(|secs| Instant::now() + Duration::from_secs(secs).saturating_sub(EXPIRY_MARGIN));
        tracing::debug!(expires_in = ?parsed.expires_in, "access token refreshed");

        Ok(CachedToken {
            value: parsed.access_token,
            refresh_at,
        })
    }
}
