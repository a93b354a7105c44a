//! Error types for brand-onboard.

use std::time::Duration;

/// Top-level error type for the onboarding service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the extraction provider.
///
/// The controller treats every variant the same way (log and keep state);
/// the kinds exist so callers and logs can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {provider} failed: {reason}")]
    Request { provider: String, reason: String },

    #[error("Request to {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Extraction cancelled")]
    Cancelled,

    #[error("Authentication failed for provider {provider}")]
    Unauthorized { provider: String },

    #[error("Provider {provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Provider {provider} reported an error: {message}")]
    Api { provider: String, message: String },

    #[error("Malformed upstream response: {reason}")]
    MalformedResponse { reason: String },

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ExtractionError {
    /// Short machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Request { .. } => "request_failed",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Status { .. } => "http_status",
            Self::Api { .. } => "provider_error",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Decode(_) => "invalid_json",
        }
    }
}

/// Form editing errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Pricing tier {index} not found ({len} tiers)")]
    TierNotFound { index: usize, len: usize },
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
