use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model call failed: {0}")]
    Model(#[from] ghostline_modelclient::ModelError),

    #[error("agent response was not valid JSON after tolerant parsing: {0}")]
    MalformedJson(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
