//! Structured extraction of company data from a website.
//!
//! The `Extractor` trait is the seam between the form controller and the
//! remote URL-to-schema service. `FirecrawlClient` is the production
//! implementation; tests plug in stubs.

pub mod client;
pub mod schema;

pub use client::FirecrawlClient;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ExtractionError;
use crate::onboarding::model::{CompanyInfo, PartialThemeColors};

/// A service that turns a website URL into structured company data.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Provider name, used in logs and errors.
    fn provider_name(&self) -> &str;

    /// Extract the company profile (name, description, tiers, mission,
    /// audience) from `url`.
    async fn extract_company(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<CompanyInfo, ExtractionError>;

    /// Extract the brand colors used on `url`. Any color may be missing.
    async fn extract_colors(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<PartialThemeColors, ExtractionError>;
}

/// Check that `raw` is a syntactically valid absolute URL.
pub fn validate_url(raw: &str) -> Result<url::Url, ExtractionError> {
    url::Url::parse(raw.trim()).map_err(|e| ExtractionError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_are_valid() {
        assert!(validate_url("https://acme.example").is_ok());
        assert!(validate_url("  http://acme.example/pricing  ").is_ok());
    }

    #[test]
    fn relative_or_empty_urls_are_rejected() {
        for raw in ["", "acme.example", "/pricing", "not a url"] {
            let err = validate_url(raw).unwrap_err();
            assert!(
                matches!(err, ExtractionError::InvalidUrl { .. }),
                "{raw:?} should be invalid, got {err:?}"
            );
        }
    }
}
