use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{ApiError, SharedState};
use crate::graph::{GraphQuery, GraphResultSet};
use crate::orchestrator::{AnswerResponse, AskRequest};
use crate::thinking::{ThinkingStep, ThinkingTracker};

/// Body of `POST /cypher`
#[derive(Debug, Clone, Deserialize)]
pub struct CypherRequest {
    #[serde(default)]
    pub cypher: Option<String>,
    #[serde(
        default,
        rename = "includeThinking",
        deserialize_with = "crate::orchestrator::types::null_as_default"
    )]
    pub include_thinking: bool,
}

/// Response of `POST /cypher`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CypherResponse {
    pub results: GraphResultSet,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_process: Option<Vec<ThinkingStep>>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub assistant_ready: bool,
    pub graph_connected: bool,
    pub advanced_features: bool,
    pub thinking_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Handle `POST /` - answer a medical question
pub async fn ask(
    State(state): State<SharedState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let Json(request) = payload?;

    info!(
        parallel = request.parallel,
        graph = request.use_graph,
        custom_query = request.custom_query().is_some(),
        thinking = request.include_thinking,
        "Received question"
    );

    let response = state.orchestrator.handle(request).await?;
    Ok(Json(response))
}

/// Handle `POST /cypher` - run a caller-supplied graph query
pub async fn cypher(
    State(state): State<SharedState>,
    payload: Result<Json<CypherRequest>, JsonRejection>,
) -> Result<Json<CypherResponse>, ApiError> {
    let Json(request) = payload?;

    let Some(text) = request.cypher.filter(|c| !c.trim().is_empty()) else {
        return Err(ApiError::BadRequest("Graph query is missing".to_string()));
    };

    let tracker = request.include_thinking.then(ThinkingTracker::new);
    let results = state
        .graph
        .run(&GraphQuery::custom(text), tracker.as_ref())
        .await
        .map_err(|e| ApiError::Internal(format!("Graph query error: {e}")))?;

    Ok(Json(CypherResponse {
        count: results.len(),
        results,
        thinking_process: tracker.as_ref().map(ThinkingTracker::steps),
    }))
}

/// Handle `GET /health` - report graph reachability
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let report = state.health.check().await;
    let connected = report.graph_reachable;

    Json(HealthResponse {
        status: if connected { "healthy" } else { "limited" }.to_string(),
        assistant_ready: state.assistant_ready,
        graph_connected: connected,
        advanced_features: connected,
        thinking_enabled: true,
        error: report
            .error
            .map(|e| format!("Graph database connection failed: {e}")),
    })
}

/// Handle `GET /` - describe the service
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Medical assistant API with graph database, web search and thinking process",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/health": "GET - status check including graph database reachability",
            "/": "POST - medical questions with optional graph, parallel search and thinking",
            "/cypher": "POST - direct graph queries with optional thinking"
        },
        "features": [
            "Graph database integration",
            "Parallel search (graph database + web)",
            "Web search restricted to trusted medical domains",
            "Context-augmented answers",
            "Automatically generated graph queries",
            "Thinking process tracking"
        ]
    }))
}
