//! Firecrawl `/v1/extract` client.
//!
//! Sends one extract request per call. If the service answers with an
//! asynchronous job id instead of data, the job status endpoint is polled
//! until the job settles. There is no retry on failure.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::onboarding::model::{CompanyInfo, PartialThemeColors};

use super::schema::{
    COLORS_PROMPT, COMPANY_PROMPT, colors_schema, company_schema, decode_colors, decode_company,
};
use super::{Extractor, validate_url};

const PROVIDER: &str = "firecrawl";

/// Maximum number of response body characters kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest<'a> {
    urls: [&'a str; 1],
    prompt: &'a str,
    allow_external_links: bool,
    schema: &'a Value,
}

/// Body of both the extract response and the job status response.
#[derive(Debug, Default, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

enum JobState {
    Done(Value),
    Pending,
}

impl ExtractResponse {
    fn into_job_state(self) -> Result<JobState, ExtractionError> {
        if self.success == Some(false) {
            return Err(ExtractionError::Api {
                provider: PROVIDER.to_string(),
                message: self.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        // A job status wins over whatever `data` holds: the status endpoint
        // sends `data: []` while a job is still processing.
        let Some(status) = self.status else {
            return match self.data {
                Some(data) if !data.is_null() => Ok(JobState::Done(data)),
                _ => Ok(JobState::Pending),
            };
        };

        match status.as_str() {
            "failed" | "cancelled" => Err(ExtractionError::Api {
                provider: PROVIDER.to_string(),
                message: self
                    .error
                    .unwrap_or_else(|| format!("extract job {status}")),
            }),
            "completed" => match self.data {
                Some(data) if !data.is_null() => Ok(JobState::Done(data)),
                _ => Err(ExtractionError::MalformedResponse {
                    reason: "completed job carried no data".to_string(),
                }),
            },
            _ => Ok(JobState::Pending),
        }
    }
}

/// HTTP client for the Firecrawl extract API.
pub struct FirecrawlClient {
    config: ExtractionConfig,
    client: reqwest::Client,
}

impl FirecrawlClient {
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ExtractionError::Request {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, client })
    }

    fn extract_url(&self) -> String {
        format!("{}/v1/extract", self.config.base_url)
    }

    fn status_url(&self, job_id: &str) -> String {
        format!("{}/v1/extract/{job_id}", self.config.base_url)
    }

    /// Run one extraction and return the raw `data` payload.
    async fn extract_raw(
        &self,
        url: &str,
        prompt: &str,
        schema: &Value,
        cancel: &CancellationToken,
    ) -> Result<Value, ExtractionError> {
        let url = url.trim();
        validate_url(url)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExtractionError::Cancelled),
            result = self.send_and_settle(url, prompt, schema) => result,
        }
    }

    async fn send_and_settle(
        &self,
        url: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<Value, ExtractionError> {
        let body = ExtractRequest {
            urls: [url],
            prompt,
            allow_external_links: false,
            schema,
        };

        tracing::info!(url, "Sending extract request");
        let response = self
            .client
            .post(self.extract_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let parsed = self.read_response(response).await?;
        let job_id = parsed.id.clone();

        match parsed.into_job_state()? {
            JobState::Done(data) => Ok(data),
            JobState::Pending => match job_id {
                Some(id) => self.poll_job(&id).await,
                None => Err(ExtractionError::MalformedResponse {
                    reason: "response had neither data nor a job id".to_string(),
                }),
            },
        }
    }

    async fn poll_job(&self, job_id: &str) -> Result<Value, ExtractionError> {
        tracing::debug!(job_id, "Extract job accepted, polling for result");

        for attempt in 1..=self.config.max_polls {
            tokio::time::sleep(self.config.poll_interval).await;

            let response = self
                .client
                .get(self.status_url(job_id))
                .bearer_auth(self.config.api_key.expose_secret())
                .send()
                .await
                .map_err(|e| self.request_error(e))?;

            match self.read_response(response).await?.into_job_state()? {
                JobState::Done(data) => {
                    tracing::debug!(job_id, attempt, "Extract job completed");
                    return Ok(data);
                }
                JobState::Pending => continue,
            }
        }

        tracing::warn!(job_id, max_polls = self.config.max_polls, "Extract job did not settle");
        Err(ExtractionError::Timeout {
            provider: PROVIDER.to_string(),
            timeout: self.config.poll_budget(),
        })
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
    ) -> Result<ExtractResponse, ExtractionError> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.request_error(e))?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ExtractionError::Unauthorized {
                provider: PROVIDER.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ExtractionError::Status {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        tracing::debug!(response = %text, "Extract response");
        Ok(serde_json::from_str(&text)?)
    }

    fn request_error(&self, e: reqwest::Error) -> ExtractionError {
        if e.is_timeout() {
            ExtractionError::Timeout {
                provider: PROVIDER.to_string(),
                timeout: self.config.request_timeout,
            }
        } else {
            ExtractionError::Request {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl Extractor for FirecrawlClient {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    async fn extract_company(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<CompanyInfo, ExtractionError> {
        let data = self
            .extract_raw(url, COMPANY_PROMPT, &company_schema(), cancel)
            .await?;
        decode_company(data)
    }

    async fn extract_colors(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<PartialThemeColors, ExtractionError> {
        let data = self
            .extract_raw(url, COLORS_PROMPT, &colors_schema(), cancel)
            .await?;
        decode_colors(data)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;

    fn client() -> FirecrawlClient {
        let config = ExtractionConfig::new(SecretString::from("fc-test"))
            .with_base_url("http://127.0.0.1:1");
        FirecrawlClient::new(config).unwrap()
    }

    #[test]
    fn endpoint_urls() {
        let c = client();
        assert_eq!(c.extract_url(), "http://127.0.0.1:1/v1/extract");
        assert_eq!(c.status_url("job-7"), "http://127.0.0.1:1/v1/extract/job-7");
        assert_eq!(c.provider_name(), "firecrawl");
    }

    #[test]
    fn request_body_uses_wire_names() {
        let schema = colors_schema();
        let body = ExtractRequest {
            urls: ["https://acme.example"],
            prompt: COLORS_PROMPT,
            allow_external_links: false,
            schema: &schema,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["urls"], json!(["https://acme.example"]));
        assert_eq!(value["allowExternalLinks"], false);
        assert_eq!(value["prompt"], COLORS_PROMPT);
        assert_eq!(value["schema"], schema);
    }

    #[test]
    fn inline_data_is_done() {
        let resp: ExtractResponse =
            serde_json::from_value(json!({ "success": true, "data": { "a": 1 } })).unwrap();
        assert!(matches!(resp.into_job_state(), Ok(JobState::Done(_))));
    }

    #[test]
    fn job_id_without_data_is_pending() {
        let resp: ExtractResponse =
            serde_json::from_value(json!({ "success": true, "id": "job-1" })).unwrap();
        assert!(matches!(resp.into_job_state(), Ok(JobState::Pending)));

        let resp: ExtractResponse = serde_json::from_value(
            json!({ "success": true, "status": "processing", "data": null }),
        )
        .unwrap();
        assert!(matches!(resp.into_job_state(), Ok(JobState::Pending)));
    }

    #[test]
    fn processing_job_with_empty_data_is_pending() {
        let resp: ExtractResponse = serde_json::from_value(
            json!({ "success": true, "status": "processing", "data": [] }),
        )
        .unwrap();
        assert!(matches!(resp.into_job_state(), Ok(JobState::Pending)));

        let resp: ExtractResponse = serde_json::from_value(
            json!({ "success": true, "status": "completed", "data": { "primary": "#000" } }),
        )
        .unwrap();
        assert!(matches!(resp.into_job_state(), Ok(JobState::Done(_))));
    }

    #[test]
    fn failure_flags_are_api_errors() {
        let resp: ExtractResponse =
            serde_json::from_value(json!({ "success": false, "error": "quota exceeded" })).unwrap();
        match resp.into_job_state() {
            Err(ExtractionError::Api { message, .. }) => assert_eq!(message, "quota exceeded"),
            _ => panic!("expected Api error"),
        }

        let resp: ExtractResponse =
            serde_json::from_value(json!({ "success": true, "status": "failed" })).unwrap();
        assert!(matches!(resp.into_job_state(), Err(ExtractionError::Api { .. })));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_sending() {
        let c = client();
        let err = c
            .extract_company("not a url", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let c = client();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = c
            .extract_colors("https://acme.example", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Cancelled));
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        let c = client();
        let err = c
            .extract_colors("https://acme.example", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(
            matches!(err, ExtractionError::Request { .. } | ExtractionError::Timeout { .. }),
            "Expected network error, got: {err:?}"
        );
    }
}
