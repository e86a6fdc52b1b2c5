use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::types::{SearchRequest, SearchResponse};
use crate::config::{RequestConfig, SearchConfig};
use crate::error::{Outcome, SearchError, SearchResult};
use crate::thinking::{trace, StepType, ThinkingTracker};

/// Tool label used in thinking steps
pub const SEARCH_TOOL: &str = "web-search";

/// Returned when no search credential is configured
pub const SEARCH_UNAVAILABLE_TEXT: &str =
    "Web search is unavailable: no search API key is configured.";

/// Returned when the search succeeds with no hits
pub const SEARCH_NO_RESULTS_TEXT: &str = "No relevant web results were found.";

/// Client for the web search API.
///
/// Never returns an error: missing credentials and failures become
/// degraded text carried in an [`Outcome`].
#[derive(Clone)]
pub struct WebSearchClient {
    client: Client,
    search_url: String,
    config: SearchConfig,
    timeout_ms: u64,
}

impl WebSearchClient {
    /// Create a new search client
    pub fn new(config: &SearchConfig, request_config: &RequestConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(SearchError::Http)?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            config: config.clone(),
            timeout_ms: request_config.timeout_ms,
        })
    }

    /// Search the trusted domains for the question
    pub async fn search(&self, query: &str, tracker: Option<&ThinkingTracker>) -> Outcome<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            warn!("Web search skipped: no API key configured");
            trace(
                tracker,
                StepType::Result,
                || "Web search is unavailable - no search API key configured".to_string(),
                Some(SEARCH_TOOL),
            );
            return Outcome::Unavailable {
                value: SEARCH_UNAVAILABLE_TEXT.to_string(),
                reason: "search API key missing".to_string(),
            };
        };

        trace(
            tracker,
            StepType::Action,
            || format!("Searching the web for: {query}"),
            Some(SEARCH_TOOL),
        );

        let start = Instant::now();
        match self.execute(api_key, query).await {
            Ok(response) => {
                info!(
                    hits = response.results.len(),
                    latency_ms = start.elapsed().as_millis(),
                    "Web search succeeded"
                );
                match response.format(self.config.max_results) {
                    Some(text) => {
                        trace(
                            tracker,
                            StepType::Result,
                            || {
                                let shown = response.results.len().min(self.config.max_results);
                                format!("Found {shown} relevant web results")
                            },
                            Some(SEARCH_TOOL),
                        );
                        Outcome::Complete(text)
                    }
                    None => {
                        trace(
                            tracker,
                            StepType::Result,
                            || "No relevant web results found".to_string(),
                            Some(SEARCH_TOOL),
                        );
                        Outcome::Complete(SEARCH_NO_RESULTS_TEXT.to_string())
                    }
                }
            }
            Err(e) => {
                error!(
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "Web search failed"
                );
                trace(
                    tracker,
                    StepType::Result,
                    || format!("Web search error: {e}"),
                    Some(SEARCH_TOOL),
                );
                Outcome::Failed {
                    value: format!("Web search failed: {e}"),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn execute(&self, api_key: &str, query: &str) -> SearchResult<SearchResponse> {
        let augmented = if self.config.query_suffix.is_empty() {
            query.to_string()
        } else {
            format!("{} {}", query, self.config.query_suffix)
        };

        debug!(query = %augmented, "Calling web search");

        let request = SearchRequest::new(api_key, augmented)
            .with_max_results(self.config.max_results)
            .with_include_domains(self.config.include_domains.clone());

        let response = self
            .client
            .post(&self.search_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    SearchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_degrades_without_network() {
        let client =
            WebSearchClient::new(&SearchConfig::default(), &RequestConfig::default()).unwrap();
        let tracker = ThinkingTracker::new();

        let outcome = client.search("paracetamol", Some(&tracker)).await;

        assert!(matches!(outcome, Outcome::Unavailable { .. }));
        assert_eq!(outcome.value(), SEARCH_UNAVAILABLE_TEXT);
        let steps = tracker.steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].step_type, StepType::Result);
    }
}
