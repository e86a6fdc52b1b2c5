use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{CompletionRequest, CompletionResponse};
use crate::config::{CompletionConfig, RequestConfig};
use crate::error::{CompletionError, CompletionResult};

/// Client for the chat completions API
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl CompletionClient {
    /// Create a new completion client
    pub fn new(
        api_key: impl Into<String>,
        config: &CompletionConfig,
        request_config: &RequestConfig,
    ) -> CompletionResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(CompletionError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_ms: request_config.timeout_ms,
        })
    }

    /// Send one completion request; no retries
    pub async fn complete(&self, request: &CompletionRequest) -> CompletionResult<CompletionResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let start = Instant::now();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling completion API"
        );

        let result = self.execute(&url, request).await;
        match &result {
            Ok(response) => info!(
                model = %request.model,
                tokens = response.total_tokens(),
                latency_ms = start.elapsed().as_millis(),
                "Completion call succeeded"
            ),
            Err(e) => error!(
                model = %request.model,
                error = %e,
                latency_ms = start.elapsed().as_millis(),
                "Completion call failed"
            ),
        }
        result
    }

    async fn execute(
        &self,
        url: &str,
        request: &CompletionRequest,
    ) -> CompletionResult<CompletionResponse> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    CompletionError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
            })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = CompletionConfig {
            base_url: "https://api.openai.com/".to_string(),
            ..CompletionConfig::default()
        };

        let client = CompletionClient::new("test_key", &config, &RequestConfig::default());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "https://api.openai.com");
    }
}
