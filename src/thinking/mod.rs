//! Ordered trace of the steps taken while answering a question.
//!
//! A [`ThinkingTracker`] is created per request when the caller asks for
//! the thinking process. Components receive it as `Option<&ThinkingTracker>`
//! and skip tracing when it is `None`.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Kind of a recorded step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Reasoning,
    Action,
    Result,
    Conclusion,
}

/// A single entry of the thinking process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingStep {
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Append-only step log.
///
/// The parallel fan-out appends from two concurrently polled futures, so
/// the buffer sits behind a mutex. Each append is atomic; the relative
/// order of steps coming from different branches is not fixed.
#[derive(Debug, Default)]
pub struct ThinkingTracker {
    steps: Mutex<Vec<ThinkingStep>>,
}

impl ThinkingTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn add_step(&self, step_type: StepType, content: impl Into<String>, tool: Option<&str>) {
        let step = ThinkingStep {
            step_type,
            content: content.into(),
            tool: tool.map(str::to_string),
            timestamp: Utc::now().timestamp_millis(),
        };
        self.lock().push(step);
    }

    pub fn reasoning(&self, content: impl Into<String>) {
        self.add_step(StepType::Reasoning, content, None);
    }

    pub fn action(&self, content: impl Into<String>, tool: Option<&str>) {
        self.add_step(StepType::Action, content, tool);
    }

    pub fn result(&self, content: impl Into<String>, tool: Option<&str>) {
        self.add_step(StepType::Result, content, tool);
    }

    pub fn conclusion(&self, content: impl Into<String>) {
        self.add_step(StepType::Conclusion, content, None);
    }

    /// Snapshot of all steps in append order
    pub fn steps(&self) -> Vec<ThinkingStep> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Render the trace as a numbered, human-readable list
    pub fn formatted(&self) -> String {
        let mut out = String::from("Thinking process:\n\n");
        for (index, step) in self.lock().iter().enumerate() {
            let n = index + 1;
            match step.step_type {
                StepType::Reasoning => out.push_str(&format!("{n}. Analyzing: {}\n", step.content)),
                StepType::Action => {
                    out.push_str(&format!("{n}. Action: {}", step.content));
                    if let Some(tool) = &step.tool {
                        out.push_str(&format!(" (using {tool})"));
                    }
                    out.push('\n');
                }
                StepType::Result => out.push_str(&format!("{n}. Result: {}\n", step.content)),
                StepType::Conclusion => {
                    out.push_str(&format!("{n}. Conclusion: {}\n", step.content))
                }
            }
        }
        out
    }

    // A poisoned lock only means another append panicked; the Vec is still valid.
    fn lock(&self) -> MutexGuard<'_, Vec<ThinkingStep>> {
        self.steps.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Record a step only when a tracker is present.
pub(crate) fn trace(
    tracker: Option<&ThinkingTracker>,
    step_type: StepType,
    content: impl FnOnce() -> String,
    tool: Option<&str>,
) {
    if let Some(tracker) = tracker {
        tracker.add_step(step_type, content(), tool);
    }
}
