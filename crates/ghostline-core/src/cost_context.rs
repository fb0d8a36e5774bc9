//! Per-task cost context.
//!
//! The original system threads cost metadata through a process-wide mutable
//! global so that any code calling into the model client can tag its call
//! with project/task/workflow/chapter identifiers without changing every
//! function signature along the way. That global is replaced here with an
//! explicit, cheaply-`Clone`-able struct: callers construct one per
//! execution unit (one per background task, per spec §5) and pass it to
//! `ModelClient::invoke` and friends. Nothing in this crate, or any crate
//! downstream, reaches for thread-local or process-global state to recover
//! it.

use serde::{Deserialize, Serialize};

/// Identifies the scope a model call belongs to, for cost attribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostContext {
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub workflow_run_id: Option<String>,
    pub chapter_number: Option<u32>,
}

impl CostContext {
    pub fn new(workflow_run_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            task_id: None,
            workflow_run_id: Some(workflow_run_id.into()),
            chapter_number: None,
        }
    }

    /// Returns a copy of this context scoped to a specific chapter.
    pub fn for_chapter(&self, chapter_number: u32) -> Self {
        Self {
            chapter_number: Some(chapter_number),
            ..self.clone()
        }
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}
