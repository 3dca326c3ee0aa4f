use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "v3.football.api-sports.io";
pub const HOST_VAR: &str = "RAPIDAPI_HOST";
pub const KEY_VAR: &str = "RAPIDAPI_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Https,
    /// Plain http, for local mirrors of the API
    Http,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

/// Host and credentials for every call. Both the url and the `x-rapidapi-*` headers come from
/// here, nothing is read from the environment once this exists.
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    key: String,
    pub scheme: Scheme,
    /// None means wait as long as the server takes
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            scheme: Scheme::default(),
            timeout: None,
        }
    }

    /// Reads `RAPIDAPI_KEY` (required) and `RAPIDAPI_HOST` (falls back to [DEFAULT_HOST]).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar(KEY_VAR))?;
        let host = match lookup(HOST_VAR) {
            Some(host) if !host.trim().is_empty() => host,
            _ => DEFAULT_HOST.to_string(),
        };
        let config = Self::new(host, key);
        config.validate()?;
        Ok(config)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Host must be a bare authority (no scheme, no path)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigError::Invalid {
                name: HOST_VAR,
                reason: String::from("host is empty"),
            });
        }
        if host.contains("://") || host.contains('/') {
            return Err(ConfigError::Invalid {
                name: HOST_VAR,
                reason: format!("expected a bare host name, got {}", host),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("key", &"<redacted>")
            .field("scheme", &self.scheme)
            .field("timeout", &self.timeout)
            .finish()
    }
}
