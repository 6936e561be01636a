//! Client configuration.
//!
//! Resolved once at startup (flags, then environment, then defaults) and
//! handed to [`crate::GoogleClient::new`].

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming a credentials JSON file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Environment variable carrying a ready-made OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
/// Environment variable naming the project billed for quota.
pub const QUOTA_PROJECT_ENV: &str = "GOOGLE_CLOUD_QUOTA_PROJECT_ID";

/// OAuth scopes covering all four resource kinds.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/documents",
    "https://www.googleapis.com/auth/presentations",
    "https://www.googleapis.com/auth/spreadsheets",
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Base URLs of the four APIs plus the OAuth token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub drive: String,
    pub docs: String,
    pub slides: String,
    pub sheets: String,
    pub token: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            drive: "https://www.googleapis.com".to_string(),
            docs: "https://docs.googleapis.com".to_string(),
            slides: "https://slides.googleapis.com".to_string(),
            sheets: "https://sheets.googleapis.com".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every API at one root, e.g. a local emulator or proxy.
    pub fn single_root(root: &str) -> Self {
        let root = root.trim_end_matches('/').to_string();
        Self {
            drive: root.clone(),
            docs: root.clone(),
            slides: root.clone(),
            sheets: root.clone(),
            token: format!("{root}/token"),
        }
    }
}

/// Everything needed to build a [`crate::GoogleClient`].
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Project billed for quota (`x-goog-user-project`).
    pub quota_project: Option<String>,
    /// Explicit credentials file; falls back to the gcloud ADC location.
    pub credentials_path: Option<PathBuf>,
    /// Pre-issued access token; skips the credentials file entirely.
    pub access_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    pub endpoints: Endpoints,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            quota_project: None,
            credentials_path: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
            endpoints: Endpoints::default(),
        }
    }
}

impl GoogleConfig {
    /// Read the standard environment variables.
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            quota_project: non_empty(QUOTA_PROJECT_ENV),
            credentials_path: non_empty(CREDENTIALS_ENV).map(PathBuf::from),
            access_token: non_empty(ACCESS_TOKEN_ENV),
            ..Self::default()
        }
    }

    pub fn with_quota_project(mut self, project: impl Into<String>) -> Self {
        self.quota_project = Some(project.into());
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Credentials file to load: the explicit one, else gcloud's ADC file.
    pub fn resolve_credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path.clone().or_else(default_adc_path)
    }
}

/// Where `gcloud auth application-default login` writes its credentials.
pub fn default_adc_path() -> Option<PathBuf> {
    #[cfg(windows)]
    let base = dirs::config_dir();
    #[cfg(not(windows))]
    let base = dirs::home_dir().map(|h| h.join(".config"));

    base.map(|b| b.join("gcloud").join("application_default_credentials.json"))
}
