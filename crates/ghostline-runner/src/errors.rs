use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Orchestrator(#[from] ghostline_orchestrator::OrchestratorError),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("task {0} was cancelled before it ran")]
    Cancelled(String),
}

pub type RunnerResult<T> = Result<T, RunnerError>;
