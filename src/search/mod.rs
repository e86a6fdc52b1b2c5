//! Domain-restricted web search client.

mod client;
mod types;

pub use client::*;
pub use types::*;
