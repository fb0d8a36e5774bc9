use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CheckpointResult<T> = Result<T, CheckpointError>;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error(transparent)]
    Agent(#[from] ghostline_agents::AgentError),

    #[error(transparent)]
    Outline(#[from] ghostline_outline::OutlineError),

    #[error(transparent)]
    Chapter(#[from] ghostline_chapter::ChapterError),

    #[error(transparent)]
    Retrieval(#[from] ghostline_retrieval::RetrievalError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("no checkpoint found for workflow {0}")]
    NotFound(String),

    #[error("outline not yet approved for workflow {0}")]
    NotApproved(String),

    #[error("outline critic never approved within bounds (strict mode)")]
    OutlineNotApproved,

    #[error("quality gate failed for chapter {chapter} (strict mode)")]
    QualityGateFailed { chapter: u32 },
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

impl OrchestratorError {
    /// Maps onto the CLI driver's exit codes (spec §6): 2 for a
    /// strict-mode quality-gate failure, 3 for a strict-mode
    /// agent/provider failure, 1 for anything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestratorError::QualityGateFailed { .. } | OrchestratorError::OutlineNotApproved => 2,
            OrchestratorError::Agent(_) => 3,
            OrchestratorError::Outline(ghostline_outline::OutlineError::Agent(_)) => 3,
            OrchestratorError::Chapter(ghostline_chapter::ChapterError::Agent(_)) => 3,
            _ => 1,
        }
    }
}
