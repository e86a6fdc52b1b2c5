//! Completion API client and the answer composer built on it.
//!
//! - [`CompletionClient`]: one chat-completion call per request
//! - [`AnswerComposer`]: merges web and graph context into a final answer

mod client;
mod composer;
mod types;

pub use client::*;
pub use composer::*;
pub use types::*;
