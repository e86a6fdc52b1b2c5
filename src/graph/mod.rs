//! Graph database access over the transactional HTTP endpoint.
//!
//! - [`GraphQueryClient`]: runs one query and decodes rows
//! - [`QueryGenerator`] / [`HeuristicQueryGenerator`]: fallback query synthesis

mod client;
mod query;
mod types;

pub use client::*;
pub use query::*;
pub use types::*;
