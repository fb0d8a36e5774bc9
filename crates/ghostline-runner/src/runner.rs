//! `TaskRunner` (spec §4.12): owns one background task per generation
//! request, queuing `WorkflowOrchestrator::start`/`resume` calls onto a
//! `WorkerPool` and mirroring the resulting `WorkflowState` onto a
//! persisted `Task` record.

use std::sync::Arc;

use ghostline_core::model::WorkflowState;
use ghostline_orchestrator::{IngestedSource, OrchestratorError, WorkflowOrchestrator};
use tracing::{error, info};

use crate::errors::{RunnerError, RunnerResult};
use crate::pool::WorkerPool;
use crate::store::TaskStore;
use crate::task::{Task, TaskStatus};

pub struct StartRequest {
    pub task_id: String,
    pub workflow_id: String,
    pub project_id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub sources: Vec<IngestedSource>,
    pub writing_samples: Vec<String>,
    pub target_pages: Option<u32>,
    pub target_chapters: u32,
    pub words_per_page: u32,
}

pub struct ResumeRequest {
    pub task_id: String,
    pub workflow_id: String,
    pub title: String,
    pub description: String,
    pub approve_outline: bool,
    pub feedback: Option<String>,
}

pub struct TaskRunner {
    orchestrator: Arc<WorkflowOrchestrator>,
    tasks: Arc<dyn TaskStore>,
    pool: WorkerPool,
}

impl TaskRunner {
    pub fn new(orchestrator: Arc<WorkflowOrchestrator>, tasks: Arc<dyn TaskStore>, pool_size: usize) -> Self {
        Self {
            orchestrator,
            tasks,
            pool: WorkerPool::new(pool_size),
        }
    }

    /// Queues `start`; returns immediately with the task id the caller
    /// polls via `get_task`.
    pub fn start_task(&self, req: StartRequest) -> RunnerResult<String> {
        let task = Task::new(
            req.task_id.clone(),
            req.workflow_id.clone(),
            req.workflow_id.clone(),
            req.project_id.clone(),
            req.user_id.clone(),
        );
        self.tasks.insert(task)?;

        let return_id = req.task_id.clone();
        let orchestrator = Arc::clone(&self.orchestrator);
        let tasks = Arc::clone(&self.tasks);

        self.pool.submit(move || {
            let task_id = req.task_id.clone();
            if bail_if_cancelled(&tasks, &task_id) {
                return;
            }
            mark_running(&tasks, &task_id);

            let result = orchestrator.start(
                &req.workflow_id,
                &req.project_id,
                &req.user_id,
                &req.title,
                &req.description,
                req.sources,
                req.writing_samples,
                req.target_pages,
                req.target_chapters,
                req.words_per_page,
            );
            apply_result(&tasks, &task_id, result);
        });

        Ok(return_id)
    }

    /// Queues `resume`; the prior `start` must have completed so a
    /// checkpoint exists for `workflow_id`.
    pub fn resume_task(&self, req: ResumeRequest) -> RunnerResult<String> {
        let mut task = self.tasks.get(&req.task_id)?;
        if matches!(task.status, TaskStatus::Cancelled) {
            return Err(RunnerError::Cancelled(req.task_id));
        }
        task.status = TaskStatus::Queued;
        self.tasks.update(task)?;

        let return_id = req.task_id.clone();
        let orchestrator = Arc::clone(&self.orchestrator);
        let tasks = Arc::clone(&self.tasks);

        self.pool.submit(move || {
            let task_id = req.task_id.clone();
            if bail_if_cancelled(&tasks, &task_id) {
                return;
            }
            mark_running(&tasks, &task_id);

            let result = orchestrator.resume(
                &req.workflow_id,
                &req.title,
                &req.description,
                req.approve_outline,
                req.feedback,
            );
            apply_result(&tasks, &task_id, result);
        });

        Ok(return_id)
    }

    /// Best-effort: flips a flag a queued job checks before it starts.
    /// A job already mid-flight inside `WorkflowOrchestrator` runs to
    /// completion (spec §5 names node boundaries as the check points, and
    /// the orchestrator's chapter loop is the smallest granularity this
    /// runner observes between node calls).
    pub fn cancel_task(&self, task_id: &str) -> RunnerResult<()> {
        self.tasks.request_cancel(task_id)
    }

    pub fn get_task(&self, task_id: &str) -> RunnerResult<Task> {
        self.tasks.get(task_id)
    }
}

fn bail_if_cancelled(tasks: &Arc<dyn TaskStore>, task_id: &str) -> bool {
    if !tasks.is_cancel_requested(task_id).unwrap_or(false) {
        return false;
    }
    if let Ok(mut task) = tasks.get(task_id) {
        task.mark_cancelled();
        let _ = tasks.update(task);
    }
    true
}

fn mark_running(tasks: &Arc<dyn TaskStore>, task_id: &str) {
    if let Ok(mut task) = tasks.get(task_id) {
        task.mark_running();
        let _ = tasks.update(task);
    }
}

fn apply_result(tasks: &Arc<dyn TaskStore>, task_id: &str, result: Result<WorkflowState, OrchestratorError>) {
    let Ok(mut task) = tasks.get(task_id) else {
        return;
    };
    match result {
        Ok(state) => {
            task.apply_state(&state);
            info!(task_id, status = ?task.status, progress = task.progress, "task updated");
        }
        Err(err) => {
            error!(task_id, error = %err, "task failed");
            task.mark_failed(err.to_string());
        }
    }
    let _ = tasks.update(task);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use ghostline_agents::{Agent, AgentRole};
    use ghostline_core::config::{GhostlineConfig, ModelConfig};
    use ghostline_core::model::Provider;
    use ghostline_cost::{CostLedger, SqliteCostLedger};
    use ghostline_embed::mock::HashEmbeddingBackend;
    use ghostline_embed::Embedder;
    use ghostline_modelclient::mock::MockProvider;
    use ghostline_modelclient::ModelClient;
    use ghostline_orchestrator::checkpoint::MemCheckpointSaver;
    use ghostline_orchestrator::{CheckpointSaver, WorkflowAgents};
    use ghostline_retrieval::{ChunkStore, InMemoryChunkStore};

    use super::*;
    use crate::store::InMemoryTaskStore;

    fn agent(name: &str, role: AgentRole, response: &str) -> Agent {
        let ledger: Arc<dyn CostLedger> = Arc::new(SqliteCostLedger::open_in_memory().unwrap());
        let client = ModelClient::new(
            Arc::new(MockProvider::succeeding(Provider::Anthropic, response)),
            None,
            ModelConfig::default(),
            ledger,
            false,
        );
        Agent::new(name, role, client)
    }

    const OUTLINE_JSON: &str = r#"{
        "title": "Deep Work",
        "premise": "Focus is the new superpower.",
        "chapters": [
            {"number": 1, "title": "Intro", "summary": "An intro chapter about focus.", "key_points": ["focus"], "estimated_words": 500}
        ],
        "themes": ["focus"],
        "target_audience": "professionals"
    }"#;

    fn test_orchestrator() -> Arc<WorkflowOrchestrator> {
        let agents = WorkflowAgents {
            outline_planner: agent("Planner", AgentRole::OutlinePlanner, OUTLINE_JSON),
            outline_critic: agent("Critic", AgentRole::OutlineCritic, r#"{"approved": true, "feedback": []}"#),
            content_drafter: agent(
                "Drafter",
                AgentRole::ContentDrafter,
                r#"Focus is a superpower [citation: notes.txt - "deep work requires focus"]."#,
            ),
            voice_editor: agent("VoiceEditor", AgentRole::VoiceEditor, "edited"),
            fact_checker: agent(
                "FactChecker",
                AgentRole::FactChecker,
                r#"{"accuracy_score": 0.95, "summary": "ok", "findings": [], "unsupported_claims": [], "low_confidence_citations": [], "claim_mappings": []}"#,
            ),
            cohesion_analyst: agent(
                "CohesionAnalyst",
                AgentRole::CohesionAnalyst,
                r#"{"cohesion_score": 0.9, "issues": [], "strengths": [], "summary": "flows well"}"#,
            ),
            voice_analyst: agent(
                "VoiceAnalyst",
                AgentRole::VoiceAnalyst,
                r#"{"common_phrases": [], "sentence_starters": [], "transition_words": [], "style_description": "plainspoken"}"#,
            ),
        };
        let store: Arc<dyn ChunkStore> = Arc::new(InMemoryChunkStore::new(vec![]));
        let embedder = Embedder::new(Box::new(HashEmbeddingBackend::new(16)), 16, true);
        let checkpoints: Arc<dyn CheckpointSaver> = Arc::new(MemCheckpointSaver::new());
        Arc::new(WorkflowOrchestrator::new(store, embedder, agents, checkpoints, GhostlineConfig::default()))
    }

    fn wait_until_done(runner: &TaskRunner, task_id: &str) -> Task {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let task = runner.get_task(task_id).unwrap();
            if !matches!(task.status, TaskStatus::Pending | TaskStatus::Queued | TaskStatus::Running) {
                return task;
            }
            if Instant::now() > deadline {
                panic!("task {task_id} did not finish in time: {task:?}");
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn start_task_pauses_at_outline_review() {
        let tasks: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
        let runner = TaskRunner::new(test_orchestrator(), Arc::clone(&tasks), 2);

        let task_id = runner
            .start_task(StartRequest {
                task_id: "t1".into(),
                workflow_id: "wf-1".into(),
                project_id: "proj-1".into(),
                user_id: "user-1".into(),
                title: "Deep Work".into(),
                description: "about focus".into(),
                sources: vec![],
                writing_samples: vec![],
                target_pages: None,
                target_chapters: 1,
                words_per_page: 250,
            })
            .unwrap();

        let task = wait_until_done(&runner, &task_id);
        assert_eq!(task.status, TaskStatus::Paused);
        assert_eq!(task.progress, 30);
    }

    #[test]
    fn cancel_before_resume_marks_cancelled() {
        let tasks: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
        let runner = TaskRunner::new(test_orchestrator(), Arc::clone(&tasks), 2);

        let task_id = runner
            .start_task(StartRequest {
                task_id: "t1".into(),
                workflow_id: "wf-1".into(),
                project_id: "proj-1".into(),
                user_id: "user-1".into(),
                title: "Deep Work".into(),
                description: "about focus".into(),
                sources: vec![],
                writing_samples: vec![],
                target_pages: None,
                target_chapters: 1,
                words_per_page: 250,
            })
            .unwrap();
        wait_until_done(&runner, &task_id);

        runner.cancel_task(&task_id).unwrap();
        runner
            .resume_task(ResumeRequest {
                task_id: task_id.clone(),
                workflow_id: "wf-1".into(),
                title: "Deep Work".into(),
                description: "about focus".into(),
                approve_outline: true,
                feedback: None,
            })
            .unwrap();

        let task = wait_until_done(&runner, &task_id);
        assert_eq!(task.status, TaskStatus::Cancelled);
    }
}
