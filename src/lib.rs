//! # Medical Assistant
//!
//! An HTTP service that answers medical questions by combining a graph
//! database, a domain-restricted web search and an LLM completion API.
//!
//! ## Features
//!
//! - **Plain mode**: web search, then completion
//! - **Graph mode**: graph query, web search, then completion (sequential)
//! - **Parallel mode**: graph query and web search concurrently, then completion
//! - **Query generation**: keyword heuristic when no graph query is supplied
//! - **Thinking trace**: optional ordered log of reasoning/action/result/conclusion steps
//! - **Soft degradation**: missing credentials and failing sources produce
//!   explanatory text instead of errors
//!
//! ## Architecture
//!
//! ```text
//! HTTP client → axum router → RequestOrchestrator → Graph DB (HTTP)
//!                                      ↓           → Web search API
//!                               AnswerComposer     → Completion API
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use medical_assistant::{server, AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let state = Arc::new(AppState::new(&config)?);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, server::router(state)).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Completion API client and answer composition.
pub mod completion;
/// Configuration management.
pub mod config;
/// Error types, result aliases and the soft-failure [`Outcome`](error::Outcome).
pub mod error;
/// Graph database client and query generation.
pub mod graph;
/// Request orchestration and health probing.
pub mod orchestrator;
/// System prompts for the completion API.
pub mod prompts;
/// Web search client.
pub mod search;
/// HTTP router and handlers.
pub mod server;
/// Thinking process tracking.
pub mod thinking;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, SharedState};
