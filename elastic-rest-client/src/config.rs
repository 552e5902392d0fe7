//! Configuration types for the ElasticRestClient.

use std::env;
use std::time::Duration;

use crate::errors::ElasticError;

/// Default engine URL.
pub const DEFAULT_ELASTIC_URL: &str = "http://localhost:9200";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the engine URL.
pub const ENV_URL: &str = "ELASTIC_URL";
/// Environment variable holding the basic-auth user name.
pub const ENV_USERNAME: &str = "ELASTIC_USERNAME";
/// Environment variable holding the basic-auth password.
pub const ENV_PASSWORD: &str = "ELASTIC_PASSWORD";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "ELASTIC_TIMEOUT_SECS";

/// Configuration for the ElasticRestClient.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the engine, e.g. `http://localhost:9200`.
    pub url: String,
    /// Basic-auth user name.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ELASTIC_URL)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config for the given URL without authentication.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set basic-auth credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load the config from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTIC_URL`: engine URL (default: http://localhost:9200)
    /// - `ELASTIC_USERNAME` / `ELASTIC_PASSWORD`: basic-auth credentials (optional)
    /// - `ELASTIC_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, ElasticError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the config through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ElasticError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_URL).unwrap_or_else(|| DEFAULT_ELASTIC_URL.to_string());
        let mut config = Self::new(url);

        match (lookup(ENV_USERNAME), lookup(ENV_PASSWORD)) {
            (Some(username), Some(password)) => {
                config = config.with_basic_auth(username, password);
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ElasticError::config(format!(
                    "{} and {} must be set together",
                    ENV_USERNAME, ENV_PASSWORD
                )));
            }
            (None, None) => {}
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ElasticError::config(format!("{} must be a number of seconds, got {:?}", ENV_TIMEOUT_SECS, raw))
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the URL parses and uses http(s).
    pub fn validate(&self) -> Result<(), ElasticError> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| ElasticError::config(format!("Invalid URL {:?}: {}", self.url, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ElasticError::config(format!(
                "Unsupported URL scheme {:?}",
                other
            ))),
        }
    }
}
