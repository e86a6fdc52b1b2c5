use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{CommitRequest, CommitResponse, GraphQuery, GraphResultSet};
use crate::config::{GraphConfig, RequestConfig};
use crate::error::{GraphError, GraphResult};
use crate::thinking::{trace, StepType, ThinkingTracker};

/// Tool label used in thinking steps
pub const GRAPH_TOOL: &str = "graph-database";

/// Client for the graph database transactional HTTP endpoint.
///
/// One attempt per call; failures are returned to the caller.
#[derive(Clone)]
pub struct GraphQueryClient {
    client: Client,
    commit_url: String,
    user: String,
    password: Option<String>,
    timeout_ms: u64,
}

impl GraphQueryClient {
    /// Create a new graph client
    pub fn new(config: &GraphConfig, request_config: &RequestConfig) -> GraphResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(GraphError::Http)?;

        Ok(Self {
            client,
            commit_url: format!(
                "{}/db/{}/tx/commit",
                config.base_url.trim_end_matches('/'),
                config.database
            ),
            user: config.user.clone(),
            password: config.password.clone(),
            timeout_ms: request_config.timeout_ms,
        })
    }

    /// Run one query and decode its rows
    pub async fn run(
        &self,
        query: &GraphQuery,
        tracker: Option<&ThinkingTracker>,
    ) -> GraphResult<GraphResultSet> {
        trace(
            tracker,
            StepType::Action,
            || format!("Running graph query: {}", query.text()),
            Some(GRAPH_TOOL),
        );

        let start = Instant::now();
        match self.execute(query.text()).await {
            Ok(rows) => {
                info!(
                    rows = rows.len(),
                    latency_ms = start.elapsed().as_millis(),
                    "Graph query succeeded"
                );
                trace(
                    tracker,
                    StepType::Result,
                    || format!("Found {} results in the graph database", rows.len()),
                    Some(GRAPH_TOOL),
                );
                Ok(rows)
            }
            Err(e) => {
                error!(
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "Graph query failed"
                );
                trace(
                    tracker,
                    StepType::Result,
                    || format!("Graph database error: {e}"),
                    Some(GRAPH_TOOL),
                );
                Err(e)
            }
        }
    }

    async fn execute(&self, statement: &str) -> GraphResult<GraphResultSet> {
        debug!(statement = %statement, "Sending graph query");

        let mut request = self
            .client
            .post(&self.commit_url)
            .header("Accept", "application/json")
            .json(&CommitRequest::single(statement));

        if let Some(password) = &self.password {
            request = request.basic_auth(&self.user, Some(password));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GraphError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                GraphError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GraphError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let body: CommitResponse =
            response
                .json()
                .await
                .map_err(|e| GraphError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        if let Some(first) = body.errors.first() {
            return Err(GraphError::Query {
                code: first.code.clone(),
                message: first.message.clone(),
            });
        }

        Ok(body.into_rows())
    }

    /// Full commit endpoint URL (for testing)
    pub fn commit_url(&self) -> &str {
        &self.commit_url
    }
}
