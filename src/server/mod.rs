//! HTTP surface of the assistant.
//!
//! This module provides:
//! - The axum [`router`] with CORS, request tracing and panic recovery
//! - Endpoint handlers for questions, raw graph queries and health
//! - Shared application state management

mod error;
mod handlers;

pub use error::*;
pub use handlers::*;

use std::any::Any;
use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::completion::AnswerComposer;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::graph::GraphQueryClient;
use crate::orchestrator::{HealthProbe, RequestOrchestrator};
use crate::search::WebSearchClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Question handler.
    pub orchestrator: RequestOrchestrator,
    /// Graph client for raw queries.
    pub graph: GraphQueryClient,
    /// Graph reachability check.
    pub health: HealthProbe,
    /// Whether a completion credential is configured.
    pub assistant_ready: bool,
}

impl AppState {
    /// Build every client from configuration
    pub fn new(config: &Config) -> AppResult<Self> {
        let graph = GraphQueryClient::new(&config.graph, &config.request)?;
        let search = WebSearchClient::new(&config.search, &config.request)?;
        let composer = AnswerComposer::new(&config.completion, &config.request)?;

        tracing::info!(
            graph_url = %config.graph.base_url,
            search_ready = config.search.api_key.is_some(),
            completion_ready = composer.is_ready(),
            "AppState initialized"
        );

        let assistant_ready = composer.is_ready();
        let orchestrator = RequestOrchestrator::new(graph.clone(), search, composer);
        let health = HealthProbe::new(graph.clone());

        Ok(Self {
            orchestrator,
            graph,
            health,
            assistant_ready,
        })
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

/// Build the HTTP router
pub fn router(state: SharedState) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::index).post(handlers::ask))
        .route("/health", get(handlers::health))
        .route("/cypher", post(handlers::cypher));

    with_middleware(routes).with_state(state)
}

/// Panic recovery, request tracing and CORS, outermost last
fn with_middleware<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Render a handler panic as a processing failure
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::from(AppError::Processing { message }).into_response()
}
