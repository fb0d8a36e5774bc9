//! `Task` — the persisted record a background worker maintains alongside
//! the `WorkflowState` it mirrors (spec §4.12).

use chrono::{DateTime, Utc};
use ghostline_core::model::{Phase, WorkflowState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Queued,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub workflow_id: String,
    pub workflow_run_id: String,
    pub project_id: String,
    pub user_id: String,

    pub status: TaskStatus,
    pub progress: u8,
    pub current_step: String,

    pub error_message: Option<String>,
    pub conversation_log: Option<String>,

    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        task_id: impl Into<String>,
        workflow_id: impl Into<String>,
        workflow_run_id: impl Into<String>,
        project_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            workflow_id: workflow_id.into(),
            workflow_run_id: workflow_run_id.into(),
            project_id: project_id.into(),
            user_id: user_id.into(),
            status: TaskStatus::Pending,
            progress: 0,
            current_step: "pending".to_string(),
            error_message: None,
            conversation_log: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Mirrors a `WorkflowState` snapshot onto the task record (spec
    /// §4.12: "progress, current_step mirror WorkflowState").
    pub fn apply_state(&mut self, state: &WorkflowState) {
        self.progress = state.progress;
        self.current_step = format!("{:?}", state.phase);
        self.conversation_log = state.conversation_log_path.clone();

        self.status = match state.phase {
            Phase::Completed => {
                self.completed_at = Some(Utc::now());
                TaskStatus::Completed
            }
            Phase::Failed => {
                self.completed_at = Some(Utc::now());
                self.error_message = state.error.clone();
                TaskStatus::Failed
            }
            _ if state.pending_user_action.is_some() => TaskStatus::Paused,
            _ => TaskStatus::Running,
        };
    }

    pub fn mark_running(&mut self) {
        self.status = TaskStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error_message: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.error_message = Some(error_message.into());
        self.completed_at = Some(Utc::now());
    }

    pub fn mark_cancelled(&mut self) {
        self.status = TaskStatus::Cancelled;
        self.completed_at = Some(Utc::now());
    }
}
