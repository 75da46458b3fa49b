//! Anthropic Expert Analyst - ExpertAnalyst backed by the Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicAnalystConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_max_retries(2);
//!
//! let analyst = AnthropicExpertAnalyst::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ExpertAnalysisError, ExpertAnalyst, ExpertRequest, ExpertVerdict};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Retries beyond this are ignored.
const MAX_RETRIES: u32 = 10;

/// Longest single wait between attempts.
const MAX_RETRY_DELAY_SECS: u64 = 60;

const SYSTEM_PROMPT: &str = "You are the final expert reviewer of a multi-step investigation. \
Answer the analysis request using only the findings and evidence supplied.";

/// Configuration for the Anthropic analyst.
#[derive(Debug, Clone)]
pub struct AnthropicAnalystConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub max_tokens: u32,
}

impl AnthropicAnalystConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
            max_tokens: 4096,
        }
    }

    /// Builds from an already-wrapped key, e.g. straight from `AppConfig`.
    pub fn from_secret(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            ..Self::new(String::new())
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Clamped to 10.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.min(MAX_RETRIES);
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Expert analyst calling Anthropic's Messages API.
pub struct AnthropicExpertAnalyst {
    config: AnthropicAnalystConfig,
    client: Client,
}

impl AnthropicExpertAnalyst {
    pub fn new(config: AnthropicAnalystConfig) -> Result<Self, ExpertAnalysisError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ExpertAnalysisError::InvalidRequest(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn to_anthropic_request(&self, request: &ExpertRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.config.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            max_tokens: self.config.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.prompt(),
            }],
        }
    }

    async fn send_request(&self, request: &ExpertRequest) -> Result<Response, ExpertAnalysisError> {
        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&self.to_anthropic_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExpertAnalysisError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ExpertAnalysisError::network(format!("Connection failed: {}", e))
                } else {
                    ExpertAnalysisError::network(e.to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<ExpertVerdict, ExpertAnalysisError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status.as_u16(), body));
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ExpertAnalysisError::parse(format!("Failed to parse response: {}", e)))?;

        let text = collect_text(parsed.content);
        if text.trim().is_empty() {
            return Err(ExpertAnalysisError::parse("Response contained no text"));
        }

        Ok(ExpertVerdict::new(text, parsed.model))
    }

    fn status_error(status: u16, body: String) -> ExpertAnalysisError {
        match status {
            401 | 403 => ExpertAnalysisError::AuthenticationFailed,
            429 => ExpertAnalysisError::RateLimited {
                retry_after_secs: parse_retry_after(&body),
            },
            400 => ExpertAnalysisError::InvalidRequest(body),
            500..=599 => {
                ExpertAnalysisError::unavailable(format!("Server error {}: {}", status, body))
            }
            _ => ExpertAnalysisError::network(format!("Unexpected status {}: {}", status, body)),
        }
    }

    async fn attempt(&self, request: &ExpertRequest) -> Result<ExpertVerdict, ExpertAnalysisError> {
        let response = self.send_request(request).await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl ExpertAnalyst for AnthropicExpertAnalyst {
    async fn analyze(&self, request: ExpertRequest) -> Result<ExpertVerdict, ExpertAnalysisError> {
        let mut retry_count = 0;

        loop {
            match self.attempt(&request).await {
                Ok(verdict) => return Ok(verdict),
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    let delay = retry_delay(&err, retry_count);
                    tracing::warn!(
                        investigation_id = %request.investigation_id,
                        attempt = retry_count + 1,
                        delay_secs = delay.as_secs(),
                        error = %err,
                        "Expert analysis failed, retrying"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn analyst_name(&self) -> &str {
        &self.config.model
    }
}

/// Server-requested wait for rate limits, exponential backoff (1s, 2s, 4s, ...)
/// otherwise. Both capped at [`MAX_RETRY_DELAY_SECS`].
fn retry_delay(err: &ExpertAnalysisError, retry_count: u32) -> Duration {
    let secs = match err {
        ExpertAnalysisError::RateLimited { retry_after_secs } => u64::from(*retry_after_secs),
        _ => 1u64.checked_shl(retry_count).unwrap_or(u64::MAX),
    };
    Duration::from_secs(secs.min(MAX_RETRY_DELAY_SECS))
}

fn collect_text(blocks: Vec<ContentBlock>) -> String {
    blocks
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("")
}

/// Parses "try again in Ns" out of an error body; 60s otherwise.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = message.find("try again in ")?;
            let digits: String = message[idx + 13..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        })
        .unwrap_or(60)
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    system: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}
