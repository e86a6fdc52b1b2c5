//! Request orchestration and response assembly.
//!
//! [`RequestOrchestrator`] picks an [`ExecutionMode`] from the request flags,
//! fans out to the graph database and web search, and hands the gathered
//! context to the [`AnswerComposer`]. Collaborators report through
//! [`Outcome`], so one failing source never aborts the others.

mod health;
pub(crate) mod types;

pub use health::*;
pub use types::*;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::completion::AnswerComposer;
use crate::error::{AppError, AppResult, Outcome};
use crate::graph::{
    GraphQuery, GraphQueryClient, GraphResultSet, HeuristicQueryGenerator, QueryGenerator,
    QueryOrigin,
};
use crate::search::WebSearchClient;
use crate::thinking::{trace, StepType, ThinkingTracker};

/// Top-level request handler
#[derive(Clone)]
pub struct RequestOrchestrator {
    graph: GraphQueryClient,
    search: WebSearchClient,
    composer: AnswerComposer,
    generator: Arc<dyn QueryGenerator>,
}

impl RequestOrchestrator {
    /// Create an orchestrator using the keyword heuristic for missing queries
    pub fn new(graph: GraphQueryClient, search: WebSearchClient, composer: AnswerComposer) -> Self {
        Self {
            graph,
            search,
            composer,
            generator: Arc::new(HeuristicQueryGenerator::new()),
        }
    }

    /// Replace the query generation strategy
    pub fn with_generator(mut self, generator: Arc<dyn QueryGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Answer one question
    pub async fn handle(&self, request: AskRequest) -> AppResult<AnswerResponse> {
        request.validate()?;

        let mode = ExecutionMode::from_request(&request);
        let request_id = Uuid::new_v4();
        let span = info_span!("ask", %request_id, ?mode);

        self.dispatch(request, mode).instrument(span).await
    }

    async fn dispatch(&self, request: AskRequest, mode: ExecutionMode) -> AppResult<AnswerResponse> {
        let start = Instant::now();
        let tracker = request.include_thinking.then(ThinkingTracker::new);
        let tracker = tracker.as_ref();
        let question = request.question.as_str();
        let mut calls = CallLog::default();

        let mut response = match mode {
            ExecutionMode::Plain => {
                let web = self.search.search(question, tracker).await;
                calls.record(&web);

                let composed = self
                    .composer
                    .compose(question, web.value(), None, tracker)
                    .await;
                calls.record(&composed);
                composed.into_value()
            }
            ExecutionMode::Graph => {
                let query = self.resolve_query(question, request.custom_query(), tracker);

                let rows = self.run_graph(&query, tracker).await;
                calls.record(&rows);
                let web = self.search.search(question, tracker).await;
                calls.record(&web);

                let composed = self
                    .composer
                    .compose(question, web.value(), Some(rows.value()), tracker)
                    .await;
                calls.record(&composed);
                composed.into_value()
            }
            ExecutionMode::Parallel => {
                trace(
                    tracker,
                    StepType::Reasoning,
                    || format!("Starting a parallel search for the question: \"{question}\""),
                    None,
                );
                trace(
                    tracker,
                    StepType::Action,
                    || "Running in parallel: graph database query + web search".to_string(),
                    None,
                );

                let query = self.resolve_query(question, request.custom_query(), tracker);

                let (rows, web) = tokio::join!(
                    self.run_graph(&query, tracker),
                    self.search.search(question, tracker)
                );
                calls.record(&rows);
                calls.record(&web);

                let composed = self
                    .composer
                    .compose(question, web.value(), Some(rows.value()), tracker)
                    .await;
                calls.record(&composed);

                let mut response = composed.into_value();
                response.parallel_results = Some(ParallelResults {
                    graph: rows.into_value(),
                    llm_web: response.answer.clone(),
                });
                response
            }
        };

        if let Some(message) = calls.all_failed() {
            return Err(AppError::UpstreamFailure { message });
        }

        if let Some(tracker) = tracker {
            debug!(steps = tracker.len(), "{}", tracker.formatted());
        }
        response.thinking_process = tracker.map(ThinkingTracker::steps);

        info!(
            sources = ?response.sources,
            tokens = response.token_usage,
            latency_ms = start.elapsed().as_millis(),
            "Request completed"
        );

        Ok(response)
    }

    /// Caller's query if given, otherwise one from the generator
    fn resolve_query(
        &self,
        question: &str,
        custom: Option<&str>,
        tracker: Option<&ThinkingTracker>,
    ) -> GraphQuery {
        if let Some(text) = custom {
            trace(
                tracker,
                StepType::Reasoning,
                || "Using the graph query supplied with the request".to_string(),
                None,
            );
            return GraphQuery::custom(text);
        }

        trace(
            tracker,
            StepType::Reasoning,
            || format!("Analyzing the question to generate a graph query: \"{question}\""),
            None,
        );

        let query = self.generator.generate(question);

        if let QueryOrigin::Generated(strategy) = query.origin() {
            trace(tracker, StepType::Reasoning, || strategy.describe(), None);
        }
        trace(
            tracker,
            StepType::Action,
            || format!("Generated graph query: {}", query.text()),
            None,
        );

        query
    }

    /// Graph branch: a failure becomes an empty row set
    async fn run_graph(
        &self,
        query: &GraphQuery,
        tracker: Option<&ThinkingTracker>,
    ) -> Outcome<GraphResultSet> {
        match self.graph.run(query, tracker).await {
            Ok(rows) => Outcome::Complete(rows),
            Err(e) => Outcome::Failed {
                value: Vec::new(),
                error: e.to_string(),
            },
        }
    }
}

/// Tracks downstream outcomes to detect a request where every call failed
#[derive(Debug, Default)]
struct CallLog {
    invoked: usize,
    failed: usize,
    last_error: Option<String>,
}

impl CallLog {
    fn record<T>(&mut self, outcome: &Outcome<T>) {
        self.invoked += 1;
        if let Some(error) = outcome.error() {
            self.failed += 1;
            self.last_error = Some(error.to_string());
        }
    }

    /// Last failure message when every invoked call failed
    fn all_failed(&self) -> Option<String> {
        if self.invoked > 0 && self.failed == self.invoked {
            self.last_error.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompletionConfig, GraphConfig, RequestConfig, SearchConfig};
    use crate::graph::MockQueryGenerator;

    // Nothing listens on the discard port, so graph calls fail fast.
    fn offline_orchestrator() -> RequestOrchestrator {
        let request = RequestConfig { timeout_ms: 2000 };
        let graph = GraphQueryClient::new(
            &GraphConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                ..GraphConfig::default()
            },
            &request,
        )
        .unwrap();
        let search = WebSearchClient::new(&SearchConfig::default(), &request).unwrap();
        let composer = AnswerComposer::new(&CompletionConfig::default(), &request).unwrap();
        RequestOrchestrator::new(graph, search, composer)
    }

    #[test]
    fn test_call_log_all_failed() {
        let mut log = CallLog::default();
        assert_eq!(log.all_failed(), None);

        log.record(&Outcome::<()>::Failed {
            value: (),
            error: "first".to_string(),
        });
        log.record(&Outcome::<()>::Failed {
            value: (),
            error: "second".to_string(),
        });
        assert_eq!(log.all_failed(), Some("second".to_string()));

        log.record(&Outcome::<()>::Unavailable {
            value: (),
            reason: "no key".to_string(),
        });
        assert_eq!(log.all_failed(), None);
    }

    #[tokio::test]
    async fn test_short_question_is_rejected() {
        let result = offline_orchestrator().handle(AskRequest::new("hi")).await;
        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_custom_query_skips_generator() {
        let mut generator = MockQueryGenerator::new();
        generator.expect_generate().times(0);

        let orchestrator = offline_orchestrator().with_generator(Arc::new(generator));
        let response = orchestrator
            .handle(
                AskRequest::new("Ce interacțiuni are paracetamolul?")
                    .with_custom_query("MATCH (d:Drug) RETURN d.name LIMIT 1")
                    .with_thinking(),
            )
            .await
            .unwrap();

        let steps = response.thinking_process.unwrap();
        assert!(steps
            .iter()
            .any(|s| s.content.contains("MATCH (d:Drug) RETURN d.name LIMIT 1")));
        assert_eq!(response.graph_results, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_generator_used_once_without_custom_query() {
        let mut generator = MockQueryGenerator::new();
        generator
            .expect_generate()
            .withf(|question| question == "Which drug helps with fever?")
            .times(1)
            .returning(|_| GraphQuery::custom("MATCH (n) RETURN n LIMIT 1"));

        let orchestrator = offline_orchestrator().with_generator(Arc::new(generator));
        let response = orchestrator
            .handle(AskRequest::new("Which drug helps with fever?").with_parallel())
            .await
            .unwrap();

        let parallel = response.parallel_results.unwrap();
        assert!(parallel.graph.is_empty());
        assert_eq!(parallel.llm_web, response.answer);
        assert!(response.thinking_process.is_none());
    }
}
