use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, AppResult};
use crate::graph::GraphResultSet;
use crate::thinking::ThinkingStep;

/// Minimum number of non-whitespace characters in a question
pub const MIN_QUESTION_CHARS: usize = 3;

/// Incoming question and its mode flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    /// Query the graph database
    #[serde(
        default,
        rename = "useNeo4j",
        alias = "useGraph",
        deserialize_with = "null_as_default"
    )]
    pub use_graph: bool,
    /// Caller-supplied graph query; implies graph mode
    #[serde(default, rename = "useCypher", alias = "customQuery", skip_serializing_if = "Option::is_none")]
    pub custom_query: Option<String>,
    /// Query graph and web concurrently
    #[serde(
        default,
        rename = "useParallelSearch",
        alias = "parallel",
        deserialize_with = "null_as_default"
    )]
    pub parallel: bool,
    /// Return the thinking process
    #[serde(
        default,
        rename = "includeThinking",
        alias = "includeTrace",
        deserialize_with = "null_as_default"
    )]
    pub include_thinking: bool,
}

/// Read an explicit JSON `null` the same as an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which sources a request consults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Web search then completion
    Plain,
    /// Graph query, then web search, then completion
    Graph,
    /// Graph query and web search concurrently, then completion
    Parallel,
}

/// Final answer returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    /// Discovery order, duplicates allowed
    pub sources: Vec<String>,
    pub token_usage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_results: Option<GraphResultSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_results: Option<ParallelResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_process: Option<Vec<ThinkingStep>>,
}

/// Per-branch results of a parallel request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelResults {
    pub graph: GraphResultSet,
    pub llm_web: String,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    pub fn with_graph(mut self) -> Self {
        self.use_graph = true;
        self
    }

    pub fn with_custom_query(mut self, query: impl Into<String>) -> Self {
        self.custom_query = Some(query.into());
        self
    }

    pub fn with_parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    pub fn with_thinking(mut self) -> Self {
        self.include_thinking = true;
        self
    }

    /// Custom query, ignoring blank strings
    pub fn custom_query(&self) -> Option<&str> {
        self.custom_query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
    }

    /// Reject questions shorter than [`MIN_QUESTION_CHARS`]
    pub fn validate(&self) -> AppResult<()> {
        let chars = self.question.chars().filter(|c| !c.is_whitespace()).count();
        if chars < MIN_QUESTION_CHARS {
            return Err(AppError::InvalidInput {
                message: "The question is too short. Please provide a detailed medical question."
                    .to_string(),
            });
        }
        Ok(())
    }
}

impl ExecutionMode {
    /// Parallel takes precedence over graph, graph over plain
    pub fn from_request(request: &AskRequest) -> Self {
        if request.parallel {
            ExecutionMode::Parallel
        } else if request.use_graph || request.custom_query().is_some() {
            ExecutionMode::Graph
        } else {
            ExecutionMode::Plain
        }
    }
}

impl AnswerResponse {
    /// Answer with explanatory text only: no sources, zero tokens
    pub fn degraded(answer: impl Into<String>, graph_results: Option<GraphResultSet>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            token_usage: 0,
            graph_results,
            parallel_results: None,
            thinking_process: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_names() {
        let request: AskRequest = serde_json::from_value(json!({
            "question": "Ce interacțiuni are paracetamolul?",
            "useNeo4j": true,
            "useCypher": "MATCH (n) RETURN n",
            "useParallelSearch": false,
            "includeThinking": true
        }))
        .unwrap();

        assert!(request.use_graph);
        assert_eq!(request.custom_query(), Some("MATCH (n) RETURN n"));
        assert!(!request.parallel);
        assert!(request.include_thinking);
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let request: AskRequest = serde_json::from_value(json!({"question": "abc"})).unwrap();
        assert!(!request.use_graph && !request.parallel && !request.include_thinking);
        assert!(request.custom_query.is_none());
    }

    #[test]
    fn test_null_flags_read_as_unset() {
        let request: AskRequest = serde_json::from_value(json!({
            "question": "What is ibuprofen?",
            "useNeo4j": null,
            "useCypher": null,
            "useParallelSearch": null,
            "includeThinking": null
        }))
        .unwrap();

        assert!(!request.use_graph && !request.parallel && !request.include_thinking);
        assert!(request.custom_query().is_none());
        assert_eq!(ExecutionMode::from_request(&request), ExecutionMode::Plain);

        let request: AskRequest = serde_json::from_value(json!({"question": null})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_mode_precedence() {
        let plain = AskRequest::new("question");
        assert_eq!(ExecutionMode::from_request(&plain), ExecutionMode::Plain);

        let graph = AskRequest::new("question").with_graph();
        assert_eq!(ExecutionMode::from_request(&graph), ExecutionMode::Graph);

        let custom = AskRequest::new("question").with_custom_query("MATCH (n) RETURN n");
        assert_eq!(ExecutionMode::from_request(&custom), ExecutionMode::Graph);

        let parallel = AskRequest::new("question").with_graph().with_parallel();
        assert_eq!(ExecutionMode::from_request(&parallel), ExecutionMode::Parallel);
    }

    #[test]
    fn test_blank_custom_query_is_ignored() {
        let request = AskRequest::new("question").with_custom_query("   ");
        assert_eq!(request.custom_query(), None);
        assert_eq!(ExecutionMode::from_request(&request), ExecutionMode::Plain);
    }

    #[test]
    fn test_validate_counts_non_whitespace() {
        assert!(AskRequest::new("hi").validate().is_err());
        assert!(AskRequest::new(" h  i ").validate().is_err());
        assert!(AskRequest::new("").validate().is_err());
        assert!(AskRequest::new("a b c").validate().is_ok());
        assert!(AskRequest::new("Ce?").validate().is_ok());
    }

    #[test]
    fn test_response_omits_absent_fields() {
        let response = AnswerResponse::degraded("unavailable", None);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["sources"], json!([]));
        assert_eq!(json["token_usage"], 0);
        assert!(json.get("graph_results").is_none());
        assert!(json.get("parallel_results").is_none());
        assert!(json.get("thinking_process").is_none());
    }
}
