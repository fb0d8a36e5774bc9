use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutlineError {
    #[error(transparent)]
    Agent(#[from] ghostline_agents::AgentError),
}

pub type OutlineResult<T> = Result<T, OutlineError>;
