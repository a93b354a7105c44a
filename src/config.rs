//! Configuration types.
//!
//! Everything is read from the environment once at startup and then passed
//! down by reference. Nothing here is mutated after construction.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default extraction endpoint host.
pub const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev";

/// Settings for the extraction client.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Bearer token for the extraction API.
    pub api_key: SecretString,
    /// Scheme + host of the extraction API, without a trailing slash.
    pub base_url: String,
    /// Upper bound for each HTTP request.
    pub request_timeout: Duration,
    /// Delay between status polls for asynchronous extract jobs.
    pub poll_interval: Duration,
    /// Maximum number of status polls before giving up.
    pub max_polls: u32,
}

impl ExtractionConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_FIRECRAWL_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(1000),
            max_polls: 60,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Total time spent waiting on an asynchronous job before giving up.
    /// Saturates instead of overflowing.
    pub fn poll_budget(&self) -> Duration {
        self.poll_interval
            .checked_mul(self.max_polls)
            .unwrap_or(Duration::MAX)
    }

    /// Load from `FIRECRAWL_*` environment variables.
    ///
    /// `FIRECRAWL_API_KEY` is required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("FIRECRAWL_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("FIRECRAWL_API_KEY".to_string()))?;

        let mut config = Self::new(SecretString::from(api_key));

        if let Ok(base_url) = std::env::var("FIRECRAWL_BASE_URL") {
            url::Url::parse(&base_url).map_err(|e| ConfigError::InvalidValue {
                key: "FIRECRAWL_BASE_URL".to_string(),
                message: e.to_string(),
            })?;
            config = config.with_base_url(base_url);
        }

        let timeout_secs: u64 = parse_env("FIRECRAWL_TIMEOUT_SECS")?.unwrap_or(60);
        let poll_ms: u64 = parse_env("FIRECRAWL_POLL_INTERVAL_MS")?.unwrap_or(1000);
        let max_polls: u32 = parse_env("FIRECRAWL_MAX_POLLS")?.unwrap_or(60);

        Ok(config
            .with_request_timeout(Duration::from_secs(timeout_secs))
            .with_polling(Duration::from_millis(poll_ms), max_polls))
    }
}

/// When edits are forwarded to the submission callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Every committed edit notifies.
    #[default]
    Immediate,
    /// Edits stay local; only auto-fill and submit notify.
    OnSubmit,
}

impl std::str::FromStr for NotifyPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "on_submit" | "deferred" => Ok(Self::OnSubmit),
            other => Err(ConfigError::InvalidValue {
                key: "ONBOARD_NOTIFY_POLICY".to_string(),
                message: format!("expected `immediate` or `on_submit`, got `{other}`"),
            }),
        }
    }
}

/// Settings for the form session.
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    pub notify_policy: NotifyPolicy,
}

impl FormConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let notify_policy = match std::env::var("ONBOARD_NOTIFY_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => NotifyPolicy::default(),
        };
        Ok(Self { notify_policy })
    }
}

/// Settings for the HTTP front end.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_env("ONBOARD_HTTP_PORT")?.unwrap_or(8080),
        })
    }
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
