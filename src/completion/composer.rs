use tracing::{debug, warn};

use super::client::CompletionClient;
use super::types::{CompletionRequest, Message};
use crate::config::{CompletionConfig, RequestConfig};
use crate::error::{CompletionError, CompletionResult, Outcome};
use crate::graph::{render_rows, GraphRow};
use crate::orchestrator::AnswerResponse;
use crate::prompts::medical_system_prompt;
use crate::thinking::{trace, StepType, ThinkingTracker};

/// Tool label used in thinking steps
pub const COMPLETION_TOOL: &str = "completion-model";

/// Source labels reported in answers
pub const SOURCE_COMPLETION: &str = "completion-model";
pub const SOURCE_WEB: &str = "web-search";
pub const SOURCE_GRAPH: &str = "graph-database";

/// Answer text when no completion credential is configured
pub const COMPLETION_UNAVAILABLE_TEXT: &str =
    "The assistant service is unavailable: no completion API key is configured.";

/// Merges gathered context into a final answer via the completion API.
///
/// Always yields a well-formed [`AnswerResponse`]; a missing credential or
/// a failed call is reported through the [`Outcome`] variant.
#[derive(Clone)]
pub struct AnswerComposer {
    client: Option<CompletionClient>,
    config: CompletionConfig,
}

impl AnswerComposer {
    /// Create a composer; without an API key every answer is degraded
    pub fn new(config: &CompletionConfig, request_config: &RequestConfig) -> CompletionResult<Self> {
        let client = match &config.api_key {
            Some(key) => Some(CompletionClient::new(key.clone(), config, request_config)?),
            None => None,
        };

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    /// Compose an answer from the question and the gathered context
    pub async fn compose(
        &self,
        question: &str,
        web_context: &str,
        graph_rows: Option<&[GraphRow]>,
        tracker: Option<&ThinkingTracker>,
    ) -> Outcome<AnswerResponse> {
        let graph_results = graph_rows.map(<[GraphRow]>::to_vec);

        let Some(client) = &self.client else {
            warn!("Answer composition skipped: no completion API key configured");
            trace(
                tracker,
                StepType::Result,
                || "Service unavailable - no completion API key configured".to_string(),
                None,
            );
            return Outcome::Unavailable {
                value: AnswerResponse::degraded(COMPLETION_UNAVAILABLE_TEXT, graph_results),
                reason: "completion API key missing".to_string(),
            };
        };

        trace(
            tracker,
            StepType::Reasoning,
            || "Preparing the context for the completion model".to_string(),
            None,
        );

        let rows = graph_rows.unwrap_or_default();
        if !rows.is_empty() {
            trace(
                tracker,
                StepType::Reasoning,
                || format!("Combined {} graph results with web information", rows.len()),
                None,
            );
        }

        let context = build_context(web_context, rows);
        debug!(context_chars = context.len(), "Composed completion context");

        let request = CompletionRequest::new(
            &self.config.model,
            vec![
                Message::system(medical_system_prompt(&self.config.locale, &context)),
                Message::user(question),
            ],
        )
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens);

        trace(
            tracker,
            StepType::Action,
            || "Sending the question to the completion model for final analysis".to_string(),
            Some(COMPLETION_TOOL),
        );

        let result = client.complete(&request).await.and_then(|response| {
            let answer = response
                .text()
                .ok_or_else(|| CompletionError::InvalidResponse {
                    message: "Response contained no message content".to_string(),
                })?
                .to_string();
            Ok((answer, response.total_tokens()))
        });

        match result {
            Ok((answer, tokens)) => {
                trace(
                    tracker,
                    StepType::Conclusion,
                    || format!("Generated the final answer using {tokens} tokens"),
                    None,
                );
                let mut sources = vec![SOURCE_COMPLETION.to_string(), SOURCE_WEB.to_string()];
                if !rows.is_empty() {
                    sources.push(SOURCE_GRAPH.to_string());
                }
                Outcome::Complete(AnswerResponse {
                    answer,
                    sources,
                    token_usage: tokens,
                    graph_results,
                    parallel_results: None,
                    thinking_process: None,
                })
            }
            Err(e) => {
                trace(
                    tracker,
                    StepType::Result,
                    || format!("Completion error: {e}"),
                    None,
                );
                Outcome::Failed {
                    value: AnswerResponse::degraded(
                        format!("Sorry, an error occurred: {e}. Please try again later."),
                        graph_results,
                    ),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Web text first, then the flattened graph rows when there are any
fn build_context(web_context: &str, rows: &[GraphRow]) -> String {
    let mut context = format!("Web search context:\n{web_context}\n\n");
    if !rows.is_empty() {
        context.push_str(&format!(
            "Medical graph database context:\n{}\n\n",
            render_rows(rows)
        ));
    }
    context
}
