//! HTTP client for the completion provider's messages API.
//!
//! The call is a single blocking request with no internal timeout override;
//! the provider enforces its own limits. Like the scrape client, this client
//! never retries.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sampling temperature used for analysis generations. Low, for consistent
/// structured output.
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Client for the completion provider.
///
/// Constructed once at process start and passed by reference; use
/// [`AnthropicClient::with_base_url`] to point at a mock server in tests.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl AnthropicClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str) -> Result<Self, AnalysisError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AnalysisError::Provider`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("creatordb/0.1 (creator-intelligence)")
            .build()?;

        let base_url =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| AnalysisError::Provider {
                status: 0,
                body: format!("invalid base URL '{base_url}': {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Sends one completion request and returns the text of the first
    /// content block.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Provider`] on a non-success status.
    /// - [`AnalysisError::Http`] on transport failure.
    /// - [`AnalysisError::Contract`] if the response carries no text.
    pub async fn complete(
        &self,
        model: &str,
        max_tokens: u32,
        prompt: &str,
    ) -> Result<String, AnalysisError> {
        let url = self
            .base_url
            .join("/v1/messages")
            .map_err(|e| AnalysisError::Provider {
                status: 0,
                body: format!("invalid messages URL: {e}"),
            })?;

        let request = MessagesRequest {
            model,
            max_tokens,
            temperature: TEMPERATURE,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::info!(model, prompt_chars = prompt.len(), "completion request");

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "completion provider error");
            return Err(AnalysisError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AnalysisError::Contract {
                reason: "completion contained no text content".to_string(),
                raw: String::new(),
            })
    }
}
